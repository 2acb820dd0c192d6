//! Display numbers for TOEIC questions.
//!
//! Numbering follows the fixed test layout (1-6, 7-31, 32-70, 71-100,
//! 101-130, 131-146, 147-175) and does not depend on storage order. Grading
//! never uses these numbers.

const PART_STARTS: [u32; 7] = [1, 7, 32, 71, 101, 131, 147];

pub(crate) const STANDARD_PART7_GROUP_SIZES: [u32; 10] = [3, 3, 3, 3, 3, 3, 3, 3, 2, 3];
pub(crate) const ALTERNATE_PART7_GROUP_SIZES: [u32; 5] = [5, 5, 5, 5, 5];

/// Group-size distribution used for part 7, the only part whose groups differ in size.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Part7Layout {
    #[default]
    Standard,
    Alternate,
    Custom(Vec<u32>),
}

impl Part7Layout {
    /// Layout matching the group sizes actually stored for an exam.
    pub(crate) fn from_group_sizes(sizes: &[u32]) -> Self {
        if sizes == STANDARD_PART7_GROUP_SIZES {
            Self::Standard
        } else if sizes == ALTERNATE_PART7_GROUP_SIZES {
            Self::Alternate
        } else {
            Self::Custom(sizes.to_vec())
        }
    }

    pub(crate) fn group_sizes(&self) -> &[u32] {
        match self {
            Self::Standard => &STANDARD_PART7_GROUP_SIZES,
            Self::Alternate => &ALTERNATE_PART7_GROUP_SIZES,
            Self::Custom(sizes) => sizes.as_slice(),
        }
    }
}

/// First question number of a part; unknown parts start at 1.
pub(crate) fn start_number(part: i32) -> u32 {
    usize::try_from(part)
        .ok()
        .and_then(|part| part.checked_sub(1))
        .and_then(|index| PART_STARTS.get(index).copied())
        .unwrap_or(1)
}

fn fixed_group_size(part: i32) -> Option<u32> {
    match part {
        3 | 4 => Some(3),
        6 => Some(4),
        _ => None,
    }
}

/// Number for a question using the standard part 7 layout.
///
/// `group_order` and `position` are 1-based; for ungrouped parts `position`
/// is the position within the part and `group_order` is ignored.
pub(crate) fn question_number(part: i32, group_order: u32, position: u32) -> u32 {
    question_number_in_layout(part, group_order, position, &Part7Layout::Standard)
}

pub(crate) fn question_number_in_layout(
    part: i32,
    group_order: u32,
    position: u32,
    part7: &Part7Layout,
) -> u32 {
    let start = start_number(part);
    let position_offset = position.saturating_sub(1);
    let preceding_groups = group_order.saturating_sub(1);

    if let Some(size) = fixed_group_size(part) {
        return start + preceding_groups * size + position_offset;
    }

    if part == 7 {
        let offset: u32 = part7.group_sizes().iter().take(preceding_groups as usize).sum();
        return start + offset + position_offset;
    }

    start + position_offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ungrouped_parts_count_from_their_start() {
        assert_eq!(question_number(1, 0, 3), 3);
        assert_eq!(question_number(1, 7, 3), 3);
        assert_eq!(question_number(2, 0, 1), 7);
        assert_eq!(question_number(2, 0, 25), 31);
        assert_eq!(question_number(5, 0, 30), 130);
    }

    #[test]
    fn fixed_size_groups() {
        assert_eq!(question_number(3, 1, 1), 32);
        assert_eq!(question_number(3, 5, 2), 45);
        assert_eq!(question_number(3, 13, 3), 70);
        assert_eq!(question_number(4, 10, 3), 100);
        assert_eq!(question_number(6, 1, 1), 131);
        assert_eq!(question_number(6, 4, 4), 146);
    }

    #[test]
    fn numbering_is_deterministic() {
        assert_eq!(question_number(3, 5, 2), question_number(3, 5, 2));
    }

    #[test]
    fn standard_part7_uses_uneven_distribution() {
        assert_eq!(question_number(7, 1, 1), 147);
        assert_eq!(question_number(7, 9, 1), 171);
        assert_eq!(question_number(7, 9, 2), 172);
        assert_eq!(question_number(7, 10, 1), 173);
        assert_eq!(question_number(7, 10, 3), 175);
        assert_eq!(Part7Layout::Standard.group_sizes().iter().sum::<u32>(), 29);
    }

    #[test]
    fn alternate_part7_layout() {
        let layout = Part7Layout::Alternate;
        assert_eq!(layout.group_sizes().iter().sum::<u32>(), 25);
        assert_eq!(question_number_in_layout(7, 2, 1, &layout), 152);
        assert_eq!(question_number_in_layout(7, 5, 5, &layout), 171);
    }

    #[test]
    fn layout_is_derived_from_stored_sizes() {
        assert_eq!(
            Part7Layout::from_group_sizes(&[3, 3, 3, 3, 3, 3, 3, 3, 2, 3]),
            Part7Layout::Standard
        );
        assert_eq!(Part7Layout::from_group_sizes(&[5, 5, 5, 5, 5]), Part7Layout::Alternate);

        let custom = Part7Layout::from_group_sizes(&[2, 4]);
        assert_eq!(question_number_in_layout(7, 2, 1, &custom), 149);
    }

    #[test]
    fn out_of_range_parts_start_at_one() {
        assert_eq!(start_number(0), 1);
        assert_eq!(start_number(8), 1);
        assert_eq!(start_number(-3), 1);
        assert_eq!(question_number(9, 2, 4), 4);
    }

    #[test]
    fn zero_positions_do_not_underflow() {
        assert_eq!(question_number(3, 0, 0), 32);
        assert_eq!(question_number(7, 0, 0), 147);
    }
}
