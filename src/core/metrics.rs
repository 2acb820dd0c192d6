use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::core::config::Settings;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub(crate) fn init(settings: &Settings) -> anyhow::Result<()> {
    if !settings.telemetry().prometheus_enabled || PROM_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let _ = PROM_HANDLE.set(handle);
    Ok(())
}

pub(crate) fn render() -> Option<String> {
    PROM_HANDLE.get().map(|handle| handle.render())
}

pub(crate) fn record_session_created() {
    metrics::counter!("exam_sessions_created_total").increment(1);
}

pub(crate) fn record_session_decode_failure() {
    metrics::counter!("exam_session_decode_failures_total").increment(1);
}

pub(crate) fn record_submission(total_score: u32) {
    metrics::counter!("exam_submissions_total").increment(1);
    metrics::histogram!("exam_total_score").record(f64::from(total_score));
}
