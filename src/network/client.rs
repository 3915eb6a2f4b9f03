//! Transaction-submitting client
//!
//! A client is a thin submission wrapper over the network's broadcast
//! channel, e.g. a wallet provider. Transactions carry no financial data, so
//! submission cannot fail for lack of funds.

use crate::core::Transaction;
use crate::network::registry::Network;

/// Submits transactions to the network
pub struct Client {
    network: Network,
}

impl Client {
    pub fn new(network: &Network) -> Self {
        Self {
            network: network.clone(),
        }
    }

    /// Broadcast a transaction to every peer's pending pool
    pub fn send_transaction(&self, tx: impl Into<Transaction>) -> bool {
        self.network.broadcast(tx.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Transaction, Tunables};

    #[test]
    fn test_send_transaction_broadcasts() {
        let network = Network::new(Tunables::default());
        let peer = network.join();
        let client = Client::new(&network);

        assert!(client.send_transaction("Tx #0007"));
        assert_eq!(peer.pending_snapshot(), vec![Transaction::new("Tx #0007")]);
    }
}
