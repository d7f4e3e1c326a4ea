#[tokio::main]
async fn main() {
    if let Err(e) = symptom_triage::run().await {
        tracing::error!("Startup failed: {e}");
        eprintln!("symptom-triage: {e}");
        std::process::exit(1);
    }
}
