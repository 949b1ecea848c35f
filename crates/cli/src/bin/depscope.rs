use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    depscope_cli::main_entry().await
}
