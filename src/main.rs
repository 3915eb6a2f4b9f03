//! Ledger-Sim CLI
//!
//! Runs one full simulation: a network of mining peers, a client
//! broadcasting random transactions, one mining thread per peer, and a
//! column-formatted report of how the chains converged.

use clap::Parser;
use ledger_sim::core::{
    Tunables, DEFAULT_BLOCK_CAPACITY, DEFAULT_DIFFICULTY, DEFAULT_NUM_SPRINTS,
};
use ledger_sim::network::{Client, Network};
use ledger_sim::report;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ledger-sim")]
#[command(version = "0.1.0")]
#[command(about = "A peer-to-peer proof-of-work ledger simulator", long_about = None)]
struct Cli {
    /// Number of mining peers to join the network
    #[arg(short, long, default_value_t = 4)]
    nodes: usize,

    /// Number of random transactions to broadcast before mining
    #[arg(short, long, default_value_t = 100)]
    transactions: usize,

    /// Number of mining sprints per peer
    #[arg(short, long, default_value_t = DEFAULT_NUM_SPRINTS)]
    sprints: u32,

    /// Length of one mining sprint in seconds
    #[arg(long, default_value_t = 5.0)]
    sprint_secs: f64,

    /// Proof-of-work difficulty (leading zero hex digits)
    #[arg(short, long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: usize,

    /// Maximum transactions per mined block
    #[arg(short, long, default_value_t = DEFAULT_BLOCK_CAPACITY)]
    capacity: usize,

    /// Report output path
    #[arg(short, long, default_value = "blocks_result.txt")]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let tunables = Tunables {
        difficulty: cli.difficulty,
        block_capacity: cli.capacity,
    };
    let network = Network::new(tunables);
    let peers: Vec<_> = (0..cli.nodes).map(|_| network.join()).collect();

    // One client, e.g. a wallet provider, submits the workload
    let client = Client::new(&network);
    let mut rng = rand::thread_rng();
    for _ in 0..cli.transactions {
        client.send_transaction(format!("Tx #{:04}", rng.gen_range(0..1000)));
    }

    // Full nodes get to work, one thread per peer
    let sprint = Duration::from_secs_f64(cli.sprint_secs);
    let handles: Vec<_> = peers
        .iter()
        .map(|peer| {
            let peer = Arc::clone(peer);
            let sprints = cli.sprints;
            thread::spawn(move || peer.mine_for(sprints, sprint))
        })
        .collect();

    for (idx, handle) in handles.into_iter().enumerate() {
        match handle.join() {
            Ok(Ok(mined)) => log::info!("node {idx} mined {mined} blocks"),
            Ok(Err(e)) => log::error!("node {idx} mining failed: {e}"),
            Err(_) => log::error!("node {idx} mining thread panicked"),
        }
    }

    for (idx, peer) in peers.iter().enumerate() {
        println!("N{idx} chain length:\t{}", peer.chain_snapshot().len());
    }

    if let Err(e) = report::write_report(&cli.output, &peers, network.tunables()) {
        eprintln!("failed to write report: {e}");
        std::process::exit(1);
    }
    println!("Report written to {}", cli.output.display());
}
