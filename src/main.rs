mod app;
mod cli;
mod diagram;
mod dot;
mod render;
mod topology;

use cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Cli::from_args().into_config();
    let written = app::run(config).await?;

    for path in written {
        println!("{}", path.display());
    }

    Ok(())
}
