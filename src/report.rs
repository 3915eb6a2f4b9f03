//! Plain-text simulation report
//!
//! Renders every peer's canonical chain side by side as fixed-width columns
//! of truncated block JSON, followed by each peer's leftover pending
//! transactions. Meant for eyeballing how the network converged after a
//! mining run.

use crate::core::{Block, Chain, Transaction, Tunables};
use crate::network::Peer;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

/// Width of one report column
const CELL_WIDTH: usize = 35;

/// Separator between columns
const CELL_SEP: &str = "\t|\t";

fn pad(text: &str) -> String {
    format!("{text:<CELL_WIDTH$}")
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// Number of lines one block cell occupies
fn cell_height(tunables: &Tunables) -> usize {
    // JSON frame and field lines plus one line per transaction slot
    9 + tunables.block_capacity
}

/// Render one block (or an empty slot) as padded report lines
///
/// Hashes are truncated to difficulty + 10 characters so the interesting
/// leading zeros stay visible without flooding the column.
pub fn block_cell_lines(block: Option<&Block>, tunables: &Tunables) -> Vec<String> {
    let Some(block) = block else {
        return vec![pad(""); cell_height(tunables)];
    };

    let hash_limit = tunables.difficulty + 10;
    let value = serde_json::json!({
        "hash": truncate(block.hash().unwrap_or(""), hash_limit),
        "height": block.height(),
        "nonce": block.nonce(),
        "previous_hash": truncate(block.previous_hash(), hash_limit),
        "timestamp": block.timestamp(),
        "transactions": block.transactions(),
    });
    let rendered = serde_json::to_string_pretty(&value).unwrap_or_default();
    rendered.lines().map(pad).collect()
}

/// Write the full multi-column report for the given peers
pub fn write_report<P: AsRef<Path>>(
    path: P,
    peers: &[Arc<Peer>],
    tunables: &Tunables,
) -> io::Result<()> {
    let chains: Vec<Chain> = peers.iter().map(|p| p.chain_snapshot()).collect();
    let pools: Vec<Vec<Transaction>> = peers.iter().map(|p| p.pending_snapshot()).collect();

    let mut out = BufWriter::new(File::create(path)?);

    for idx in 0..peers.len() {
        write!(out, "{}{}", pad(&format!("Node {idx}")), CELL_SEP)?;
    }
    writeln!(out)?;

    // One row of block cells per height, aligned across peers
    let max_len = chains.iter().map(|c| c.len()).max().unwrap_or(0);
    let height = cell_height(tunables);
    for row in 0..max_len {
        let cells: Vec<Vec<String>> = chains
            .iter()
            .map(|chain| block_cell_lines(chain.get(row), tunables))
            .collect();
        for line in 0..height {
            for cell in &cells {
                let text = cell.get(line).map(String::as_str).unwrap_or("");
                write!(out, "{}{}", pad(text), CELL_SEP)?;
            }
            writeln!(out)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", "_".repeat(43 * peers.len().max(1)))?;

    // Leftover pending transactions, count first
    for pool in &pools {
        write!(out, "{}{}", pad(&pool.len().to_string()), CELL_SEP)?;
    }
    writeln!(out)?;

    let max_txs = pools.iter().map(|p| p.len()).max().unwrap_or(0);
    for row in 0..max_txs {
        for pool in &pools {
            let text = pool.get(row).map(Transaction::id).unwrap_or("");
            write!(out, "{}{}", pad(text), CELL_SEP)?;
        }
        writeln!(out)?;
    }

    out.flush()
}
