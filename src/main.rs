use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    procsync::cli::run().await
}
