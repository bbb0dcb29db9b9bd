use anyhow::Context;
use clap::{Parser, ValueEnum};
use scim_gate::config::Config;
use scim_gate::proxy::ProxyServer;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "scim-gate", version, about = "Policy gateway for SCIM 2.0 directories")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "SCIM_GATE_CONFIG", default_value = "scim-gate.yaml")]
    config: PathBuf,

    /// Listen port, overriding `server.port`
    #[arg(short, long, env = "SCIM_GATE_PORT")]
    port: Option<u16>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    init_logging(args.log_format);

    let mut config = Config::read_file(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config
        .validate()
        .with_context(|| format!("Invalid config file {}", args.config.display()))?;

    info!(
        "Starting scim-gate {} with {}",
        env!("CARGO_PKG_VERSION"),
        args.config.display()
    );
    let server = ProxyServer::new(config).context("Failed to initialize gateway")?;

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
            Ok(())
        }
    }
}
