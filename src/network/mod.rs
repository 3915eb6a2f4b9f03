//! In-process peer network
//!
//! There is no real transport: peers live in one process and communicate
//! through the network's registry and broadcast channel, each running its
//! mining loop on its own thread.

pub mod client;
pub mod peer;
pub mod registry;

pub use client::Client;
pub use peer::Peer;
pub use registry::Network;
