#[tokio::main]
async fn main() {
    if let Err(e) = app_schema_cli::cli::run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
