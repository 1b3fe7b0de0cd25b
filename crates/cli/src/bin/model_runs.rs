use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    model_runs_cli::main_entry().await
}
