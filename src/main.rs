mod app;
mod catalogue;
mod cli;
mod configuration;
mod rest;
mod storage;
mod tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
