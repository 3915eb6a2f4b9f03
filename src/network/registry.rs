//! Network: peer registry and broadcast channel
//!
//! The network is the only resource multiple actors write to: peers join it
//! and clients broadcast transactions through it. A single registry lock
//! serializes registrations, broadcasts and external-consensus scans, so a
//! peer is never read mid-registration or mid-broadcast.

use crate::core::{Ledger, Transaction, Tunables};
use crate::network::peer::Peer;
use parking_lot::Mutex;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub(crate) struct NetworkInner {
    pub(crate) registry: Mutex<Vec<Arc<Peer>>>,
    pub(crate) tunables: Tunables,
    next_peer_id: AtomicU64,
}

/// Registry of mining peers and transaction broadcast channel
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone)]
pub struct Network {
    inner: Arc<NetworkInner>,
}

impl Network {
    /// Create an empty network with the given shared tunables
    pub fn new(tunables: Tunables) -> Self {
        Self {
            inner: Arc::new(NetworkInner {
                registry: Mutex::new(Vec::new()),
                tunables,
                next_peer_id: AtomicU64::new(0),
            }),
        }
    }

    /// The tunables every ledger on this network shares
    pub fn tunables(&self) -> &Tunables {
        &self.inner.tunables
    }

    /// Join the network as a new mining peer
    ///
    /// The first peer starts from genesis; later peers obtain their initial
    /// chain snapshot by deep-copying a uniformly random existing peer's
    /// ledger, atomically under that ledger's lock.
    pub fn join(&self) -> Arc<Peer> {
        let mut registry = self.inner.registry.lock();

        let ledger = if registry.is_empty() {
            Ledger::new(self.inner.tunables)
        } else {
            let source = rand::thread_rng().gen_range(0..registry.len());
            registry[source].ledger().lock().clone()
        };

        let id = self.inner.next_peer_id.fetch_add(1, Ordering::Relaxed);
        let peer = Arc::new(Peer::new(id, ledger, Arc::downgrade(&self.inner)));
        registry.push(Arc::clone(&peer));
        log::info!("peer {} joined ({} peers registered)", id, registry.len());
        peer
    }

    /// Deliver a transaction to every registered peer's pending pool
    ///
    /// There is no funds or admission model, so broadcasting always
    /// succeeds.
    pub fn broadcast(&self, tx: Transaction) -> bool {
        let registry = self.inner.registry.lock();
        for peer in registry.iter() {
            peer.ledger().lock().add_transaction(tx.clone());
        }
        log::debug!("broadcast {} to {} peers", tx, registry.len());
        true
    }

    pub fn peer_count(&self) -> usize {
        self.inner.registry.lock().len()
    }

    /// Snapshot of the current peer registry (for reporting)
    pub fn peers(&self) -> Vec<Arc<Peer>> {
        self.inner.registry.lock().clone()
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new(Tunables::default())
    }
}
