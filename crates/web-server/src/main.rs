use tracing_subscriber::{EnvFilter, FmtSubscriber};

// This main function is the entry point when running `cargo run -p web-server`.
// It loads the configuration and hands over to the crate's library.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = configuration::load_config()?;
    web_server::run_server(config).await
}
