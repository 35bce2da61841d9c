use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "taller-server",
    about = "Admin console API for the taller work-tracking subsystem",
    version
)]
struct Cli {
    /// Data root; records live under <root>/.taller/
    #[arg(long, env = "TALLER_ROOT", default_value = ".")]
    root: PathBuf,

    /// Port to listen on
    #[arg(long, env = "TALLER_PORT", default_value_t = 3141)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    taller_server::serve(cli.root, cli.port).await
}
