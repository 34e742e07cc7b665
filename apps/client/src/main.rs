#[tokio::main]
async fn main() -> anyhow::Result<()> {
    spelling_client::run().await
}
