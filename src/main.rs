use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use wasmserve::banner;
use wasmserve::config::Config;
use wasmserve::server::HttpServer;

#[derive(Parser)]
#[command(name = "wasmserve")]
#[command(about = "Local development server for cross-origin-isolated WebAssembly apps")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    #[arg(short, long, default_value = "wasmserve.toml")]
    config: String,

    /// Directory to serve assets from
    #[arg(short, long, default_value = ".")]
    root: String,

    #[arg(short, long, default_value = "8081")]
    port: u16,

    #[arg(short = 't', long)]
    test_config: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    if args.test_config {
        let config = Config::load(&args.config)?;
        info!("Configuration file {} is valid", args.config);
        config.validate()?;
        println!("Configuration test successful");
        return Ok(());
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            // Running without a config file is the normal dev case
            tracing::debug!("No configuration loaded ({}), using defaults", e);
            Config::default_with_root_port(&args.root, args.port)
        }
    };

    let addresses = config.listen_addresses()?;
    banner::print_banner(&config, &addresses);

    let server = HttpServer::new(Arc::new(config))?;
    server.run().await?;

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "wasmserve=debug"
    } else {
        "wasmserve=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    Ok(())
}
