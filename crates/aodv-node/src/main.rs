use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use aodv_core::message::UserData;
use aodv_node::command::{Command, parse_command};
use aodv_node::{LineMedium, Medium, Node, NodeConfig, NodeError, NodeHandle, UdpMedium};

#[derive(Parser)]
#[command(name = "aodv-node", about = "AODV mesh routing node")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "/etc/aodv/config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match NodeConfig::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load config from {}: {e}", cli.config.display());
            std::process::exit(1);
        }
    };

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        aodv_node::logging::init_json(&config.logging.level);
    } else {
        aodv_node::logging::init(&config.logging.level);
    }

    let served = match config.medium.connect_addr() {
        Ok(Some(addr)) => match LineMedium::connect(addr).await {
            Ok(medium) => serve(&config, medium).await,
            Err(e) => Err(e),
        },
        Ok(None) => match bind_udp(&config).await {
            Ok(medium) => serve(&config, medium).await,
            Err(e) => Err(e),
        },
        Err(e) => Err(e),
    };
    if let Err(e) = served {
        tracing::error!("node failed: {e}");
        std::process::exit(1);
    }
}

async fn bind_udp(config: &NodeConfig) -> Result<UdpMedium, NodeError> {
    UdpMedium::bind(config.medium.bind_addr()?, config.medium.peer_addrs()?).await
}

async fn serve<M: Medium + 'static>(config: &NodeConfig, medium: M) -> Result<(), NodeError> {
    let mut node = Node::new(config, medium)?;
    let handle = node.handle();

    if let Some(mut notifications) = node.take_notifications() {
        tokio::spawn(async move {
            while let Some(notification) = notifications.recv().await {
                println!("{notification}");
            }
        });
    }

    let signal_handle = handle.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received SIGINT, shutting down");
        signal_handle.shutdown().await;
    });

    tokio::spawn(run_commands(handle, spawn_stdin_reader()));

    node.run().await;
    Ok(())
}

/// Read stdin on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

async fn run_commands(handle: NodeHandle, mut lines: mpsc::Receiver<String>) {
    while let Some(line) = lines.recv().await {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("invalid command: {e}");
                continue;
            }
        };
        let result = match command {
            Command::Send { destination, text } => handle
                .send(UserData::new(destination, text.into_bytes()))
                .await
                .map(|outcome| tracing::debug!(?outcome, "queued")),
            Command::Routes => handle.routes().await.map(|dump| print!("{dump}")),
            Command::Address(address) => handle.set_address(address).await,
            Command::Quit => {
                handle.shutdown().await;
                break;
            }
        };
        if let Err(e) = result {
            eprintln!("command failed: {e}");
        }
    }
}
