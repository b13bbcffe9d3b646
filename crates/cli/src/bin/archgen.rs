use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    archgen_cli::main_entry().await
}
