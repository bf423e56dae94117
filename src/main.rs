#[tokio::main]
async fn main() {
    if let Err(e) = symptom_checker_lib::run().await {
        tracing::error!("Symptom checker failed: {e}");
        eprintln!("symptom-checker: {e}");
        std::process::exit(1);
    }
}
