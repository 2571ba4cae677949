use blog_feed::config::Config;
use blog_feed::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    server::init_logging();

    let config = Config::load()?;
    server::start_server(config).await
}
