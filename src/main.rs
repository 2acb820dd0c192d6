#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = toeic_exam_engine::run().await {
        eprintln!("toeic-exam-engine fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
