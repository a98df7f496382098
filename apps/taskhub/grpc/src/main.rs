#[tokio::main]
async fn main() -> eyre::Result<()> {
    taskhub_grpc::run().await
}
