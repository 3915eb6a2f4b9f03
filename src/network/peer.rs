//! Mining peer
//!
//! A peer owns one ledger behind its own lock and runs the mining
//! orchestration loop: bounded proof-of-work sprints interleaved with
//! network-wide fork choice (external consensus).
//!
//! Lock ordering: the network registry lock is always taken before any
//! ledger lock, and no ledger lock is ever held across a sprint or across a
//! registry-lock acquisition.

use crate::core::{Block, Chain, Ledger, LedgerError, Transaction};
use crate::mining::pow;
use crate::network::registry::NetworkInner;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// A mining full node holding its own copy of the ledger
pub struct Peer {
    id: u64,
    ledger: Mutex<Ledger>,
    network: Weak<NetworkInner>,
}

impl Peer {
    pub(crate) fn new(id: u64, ledger: Ledger, network: Weak<NetworkInner>) -> Self {
        Self {
            id,
            ledger: Mutex::new(ledger),
            network,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn ledger(&self) -> &Mutex<Ledger> {
        &self.ledger
    }

    /// Read-only deep copy of the canonical chain
    pub fn chain_snapshot(&self) -> Chain {
        self.ledger.lock().chain().clone()
    }

    /// Read-only deep copy of the pending-transaction pool
    pub fn pending_snapshot(&self) -> Vec<Transaction> {
        self.ledger.lock().pending().to_vec()
    }

    /// Network-wide fork choice
    ///
    /// Under the registry lock, scan all peers for the greatest canonical
    /// tip height strictly above our own (first-found wins ties). If one
    /// exists, snapshot its chain under that peer's ledger lock, reconcile
    /// our pending pool against it and adopt it. Returns whether an adoption
    /// occurred.
    pub fn external_consensus(&self) -> Result<bool, LedgerError> {
        let Some(network) = self.network.upgrade() else {
            return Ok(false);
        };
        let registry = network.registry.lock();

        let local_height = self.ledger.lock().chain().tip().height();
        let mut best: Option<(u64, Arc<Peer>)> = None;
        for peer in registry.iter() {
            if peer.id == self.id {
                continue;
            }
            let height = peer.ledger.lock().chain().tip().height();
            if height > local_height && best.as_ref().map_or(true, |(h, _)| height > *h) {
                best = Some((height, Arc::clone(peer)));
            }
        }
        let Some((_, source)) = best else {
            return Ok(false);
        };

        // Snapshot under the source's ledger lock, then mutate our own.
        // A chain never shrinks, so the strictly-longer precondition read
        // during the scan still holds here.
        let snapshot = source.ledger.lock().chain().clone();
        let mut ledger = self.ledger.lock();
        ledger.adopt_chain(&snapshot)?;
        log::info!(
            "peer {}: adopted chain of length {} from peer {}",
            self.id,
            snapshot.len(),
            source.id
        );
        Ok(true)
    }

    /// Mine in bounded sprints, reacting to longer peer chains in between
    ///
    /// One session builds a candidate block from the front of the pending
    /// pool on top of the current tip. Each sprint first re-checks external
    /// consensus: an adoption abandons the candidate and restarts the
    /// session with the remaining budget. A found proof is admitted against
    /// the tip the candidate was built on, the mined batch is dropped, and
    /// internal consensus runs once before the next session starts.
    ///
    /// Returns the number of blocks successfully mined and admitted.
    pub fn mine_for(&self, num_sprints: u32, sprint: Duration) -> Result<u32, LedgerError> {
        let mut remaining = num_sprints;
        let mut mined = 0u32;

        'session: while remaining > 0 {
            self.external_consensus()?;

            let (mut candidate, base, difficulty) = {
                let ledger = self.ledger.lock();
                if ledger.pending().is_empty() {
                    return Ok(mined);
                }
                let base = ledger.chain().tip().clone();
                let candidate = Block::new(
                    base.height() + 1,
                    ledger.select_mining_batch(),
                    Utc::now().timestamp_millis(),
                    base.hash().expect("canonical blocks are sealed"),
                );
                (candidate, base, ledger.tunables().difficulty)
            };

            while remaining > 0 {
                // News of a longer chain makes the candidate stale
                if self.external_consensus()? {
                    continue 'session;
                }

                match pow::mine(&candidate, Some(sprint), difficulty) {
                    Some(proof) => {
                        remaining -= 1;
                        candidate.set_nonce(proof.nonce);
                        {
                            let mut ledger = self.ledger.lock();
                            match ledger.admit(candidate, &proof.hash, &base) {
                                Ok(()) => {
                                    ledger.drop_mined_front();
                                    mined += 1;
                                }
                                Err(e) => {
                                    log::warn!("peer {}: mined block rejected: {e}", self.id)
                                }
                            }
                            // A concurrently-filed fork may have just become
                            // longer than the canonical chain
                            ledger.internal_consensus();
                        }
                        continue 'session;
                    }
                    None => remaining -= 1,
                }
            }
        }
        Ok(mined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Tunables;
    use crate::network::registry::Network;

    fn test_network() -> Network {
        Network::new(Tunables {
            difficulty: 1,
            block_capacity: 3,
        })
    }

    #[test]
    fn test_mine_for_empty_pool_is_a_no_op() {
        let network = test_network();
        let peer = network.join();

        let mined = peer.mine_for(5, Duration::from_secs(1)).unwrap();

        assert_eq!(mined, 0);
        assert_eq!(peer.chain_snapshot().len(), 1);
    }

    #[test]
    fn test_mine_for_zero_sprints() {
        let network = test_network();
        let peer = network.join();
        network.broadcast(Transaction::new("Tx #0001"));

        assert_eq!(peer.mine_for(0, Duration::from_secs(1)).unwrap(), 0);
        assert_eq!(peer.chain_snapshot().len(), 1);
    }

    #[test]
    fn test_mine_for_confirms_pending_batch() {
        let network = test_network();
        let peer = network.join();
        for id in ["Tx #0001", "Tx #0002", "Tx #0003"] {
            network.broadcast(Transaction::new(id));
        }

        let mined = peer.mine_for(5, Duration::from_secs(5)).unwrap();

        assert!(mined >= 1);
        let chain = peer.chain_snapshot();
        assert_eq!(chain.len(), 2);
        assert!(chain.is_valid());
        assert_eq!(chain.tip().transactions().len(), 3);
        assert!(peer.pending_snapshot().is_empty());
    }

    #[test]
    fn test_external_consensus_adopts_longer_peer_chain() {
        let network = test_network();
        let alice = network.join();
        let bob = network.join();

        for id in ["Tx #0001", "Tx #0002", "Tx #0003"] {
            network.broadcast(Transaction::new(id));
        }
        assert!(alice.mine_for(5, Duration::from_secs(5)).unwrap() >= 1);

        // Bob is behind and must adopt Alice's chain
        assert!(bob.external_consensus().unwrap());
        assert_eq!(bob.chain_snapshot().len(), 2);
        assert_eq!(bob.chain_snapshot(), alice.chain_snapshot());
        // The adopted block confirms Bob's copy of the broadcast batch
        assert!(bob.pending_snapshot().is_empty());

        // Nothing further to adopt
        assert!(!bob.external_consensus().unwrap());
    }

    #[test]
    fn test_external_consensus_without_peers() {
        let network = test_network();
        let peer = network.join();
        assert!(!peer.external_consensus().unwrap());
    }
}
