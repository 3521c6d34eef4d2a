//! In-process medium with an explicit link topology.
//!
//! Stations attached to a [`MemoryHub`] hear each other only when linked,
//! which makes multi-hop topologies reproducible inside a single test.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use aodv_core::types::NodeAddress;

use crate::error::NodeError;
use crate::medium::{Datagram, Medium, check_frame_size};

#[derive(Default)]
struct HubState {
    stations: BTreeMap<NodeAddress, mpsc::UnboundedSender<Datagram>>,
    links: BTreeSet<(NodeAddress, NodeAddress)>,
}

/// Shared radio channel for [`MemoryMedium`] stations.
#[derive(Clone, Default)]
pub struct MemoryHub {
    state: Arc<Mutex<HubState>>,
}

impl MemoryHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a station. Its frames reach only the stations it is linked to.
    pub async fn attach(&self, station: NodeAddress) -> MemoryMedium {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().await.stations.insert(station, tx);
        MemoryMedium {
            station,
            state: Arc::clone(&self.state),
            rx: Mutex::new(rx),
        }
    }

    /// Make `a` and `b` hear each other.
    pub async fn link(&self, a: NodeAddress, b: NodeAddress) {
        let mut state = self.state.lock().await;
        state.links.insert((a, b));
        state.links.insert((b, a));
    }

    /// Break the link between `a` and `b`.
    pub async fn unlink(&self, a: NodeAddress, b: NodeAddress) {
        let mut state = self.state.lock().await;
        state.links.remove(&(a, b));
        state.links.remove(&(b, a));
    }
}

/// One station on a [`MemoryHub`].
pub struct MemoryMedium {
    station: NodeAddress,
    state: Arc<Mutex<HubState>>,
    rx: Mutex<mpsc::UnboundedReceiver<Datagram>>,
}

impl MemoryMedium {
    pub fn station(&self) -> NodeAddress {
        self.station
    }
}

impl Medium for MemoryMedium {
    async fn transmit(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
        frame: &[u8],
    ) -> Result<(), NodeError> {
        check_frame_size(frame)?;
        let state = self.state.lock().await;
        let neighbors = state
            .links
            .range((self.station, NodeAddress::new(0))..=(self.station, NodeAddress::BROADCAST))
            .map(|&(_, neighbor)| neighbor);
        for neighbor in neighbors {
            if let Some(tx) = state.stations.get(&neighbor) {
                // A detached receiver is a station that went away.
                let _ = tx.send(Datagram {
                    source,
                    destination,
                    frame: frame.to_vec(),
                });
            }
        }
        Ok(())
    }

    async fn receive(&self) -> Result<Datagram, NodeError> {
        self.rx.lock().await.recv().await.ok_or(NodeError::Stopped)
    }
}
