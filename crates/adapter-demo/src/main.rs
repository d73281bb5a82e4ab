use std::path::PathBuf;
use std::sync::Arc;

use adapter_demo::{App, DemoConfig};
use anyhow::{Context, Result};
use clap::Parser;
use ledger_rpc::HttpRpcClient;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use wallet_adapter::InjectedWallet;

/// Terminal demo for the wallet adapter.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cluster to submit to: mainnet-beta, devnet or testnet.
    #[arg(long)]
    cluster: Option<String>,

    /// RPC endpoint; overrides the cluster's public API.
    #[arg(long)]
    rpc_url: Option<String>,

    /// URL of the wallet provider to connect to.
    #[arg(long)]
    provider_url: Option<String>,

    /// Solana CLI keypair file to use as the injected wallet.
    #[arg(long)]
    keypair: Option<PathBuf>,
}

fn load_config(cli: Cli) -> Result<DemoConfig> {
    let mut config = DemoConfig::from_env().context("invalid environment")?;
    if let Some(cluster) = cli.cluster {
        config = config.with_cluster(&cluster)?;
    }
    if cli.rpc_url.is_some() {
        config.rpc_url = cli.rpc_url;
    }
    if let Some(url) = cli.provider_url {
        config.provider_url = url;
    }
    if cli.keypair.is_some() {
        config.keypair = cli.keypair;
    }
    Ok(config)
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = load_config(Cli::parse())?;
    log::debug!("{config:?}");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    let result = runtime.block_on(run(config));
    // The stdin reader may still be parked in a blocking read.
    runtime.shutdown_background();
    result
}

async fn run(config: DemoConfig) -> Result<()> {
    let network = config.rpc_url();
    log::info!("using {network}");
    let rpc = HttpRpcClient::with_config(&network, config.rpc)
        .with_context(|| format!("bad RPC endpoint {network}"))?;
    let timeouts = rpc.config();
    log::info!(
        "confirming within {:?}, polling every {:?}",
        timeouts.confirm_timeout,
        timeouts.poll_interval
    );
    let injected = InjectedWallet::from_keypair_file(config.keypair.as_deref());

    let app = App::new(network, config.provider_url, Arc::new(rpc), injected);

    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut stdout = std::io::stdout();
    app.run(rx, &mut stdout).await?;
    Ok(())
}
