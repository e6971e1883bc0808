use anyhow::Context;
use swipecity_server::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = Config::from_env().context("reading configuration")?;
    swipecity_server::serve(config).await
}
