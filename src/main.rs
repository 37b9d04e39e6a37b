use secret_vault::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists. This must happen before any config is read
    // from the environment.
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    cli::run_cli().await
}
