#[tokio::main]
async fn main() -> anyhow::Result<()> {
    landmark_guide::run().await
}
