//! UDP emulation of the shared radio channel.
//!
//! Every transmission is sent to each configured peer as one datagram laid out
//! as `source(2) | destination(2) | frame`, both addresses big-endian. Peers
//! that are not the addressee still hear the datagram, as on a real radio.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use aodv_core::types::NodeAddress;

use crate::error::NodeError;
use crate::medium::{Datagram, MAX_FRAME_SIZE, Medium, check_frame_size};

const ADDRESS_HEADER_SIZE: usize = 4;

/// One byte past the largest valid datagram, so truncation is detectable.
const RECV_BUFFER_SIZE: usize = ADDRESS_HEADER_SIZE + MAX_FRAME_SIZE + 1;

/// A medium that fans each frame out to a fixed list of UDP peers.
pub struct UdpMedium {
    socket: UdpSocket,
    peers: Vec<SocketAddr>,
}

impl UdpMedium {
    /// Bind the local socket.
    pub async fn bind(bind_addr: SocketAddr, peers: Vec<SocketAddr>) -> Result<Self, NodeError> {
        let socket = UdpSocket::bind(bind_addr).await?;
        tracing::info!(bind = %socket.local_addr()?, peers = peers.len(), "UDP medium bound");
        Ok(Self { socket, peers })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, NodeError> {
        Ok(self.socket.local_addr()?)
    }

    #[must_use]
    pub fn peers(&self) -> &[SocketAddr] {
        &self.peers
    }
}

/// Prefix `frame` with the link-layer address header.
pub fn pack_datagram(source: NodeAddress, destination: NodeAddress, frame: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(ADDRESS_HEADER_SIZE + frame.len());
    out.extend_from_slice(&source.get().to_be_bytes());
    out.extend_from_slice(&destination.get().to_be_bytes());
    out.extend_from_slice(frame);
    out
}

/// Split a received datagram into its addresses and frame.
///
/// Returns `None` when the datagram is too short to hold the header.
pub fn unpack_datagram(raw: &[u8]) -> Option<Datagram> {
    if raw.len() < ADDRESS_HEADER_SIZE {
        return None;
    }
    Some(Datagram {
        source: NodeAddress::new(u16::from_be_bytes([raw[0], raw[1]])),
        destination: NodeAddress::new(u16::from_be_bytes([raw[2], raw[3]])),
        frame: raw[ADDRESS_HEADER_SIZE..].to_vec(),
    })
}

impl Medium for UdpMedium {
    async fn transmit(
        &self,
        source: NodeAddress,
        destination: NodeAddress,
        frame: &[u8],
    ) -> Result<(), NodeError> {
        check_frame_size(frame)?;
        let datagram = pack_datagram(source, destination, frame);
        for peer in &self.peers {
            // One unreachable peer must not silence the rest.
            if let Err(e) = self.socket.send_to(&datagram, *peer).await {
                tracing::warn!(%peer, "UDP send failed: {e}");
            }
        }
        Ok(())
    }

    async fn receive(&self) -> Result<Datagram, NodeError> {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let (n, from) = self.socket.recv_from(&mut buf).await?;
            if n == RECV_BUFFER_SIZE {
                tracing::warn!(%from, "oversized datagram dropped");
                continue;
            }
            match unpack_datagram(&buf[..n]) {
                Some(datagram) => return Ok(datagram),
                None => tracing::debug!(%from, len = n, "runt datagram dropped"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_layout() {
        let raw = pack_datagram(NodeAddress::new(0x0102), NodeAddress::BROADCAST, &[0xAA, 0xBB]);
        assert_eq!(raw, vec![0x01, 0x02, 0xFF, 0xFF, 0xAA, 0xBB]);

        let datagram = unpack_datagram(&raw).unwrap();
        assert_eq!(datagram.source, NodeAddress::new(0x0102));
        assert!(datagram.destination.is_broadcast());
        assert_eq!(datagram.frame, vec![0xAA, 0xBB]);
    }

    #[test]
    fn test_unpack_runt() {
        assert!(unpack_datagram(&[0x00, 0x01, 0x00]).is_none());
        let empty_frame = unpack_datagram(&[0, 1, 0, 2]).unwrap();
        assert!(empty_frame.frame.is_empty());
    }

    #[tokio::test]
    async fn test_loopback_between_two_sockets() {
        let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let receiver = UdpMedium::bind(any, Vec::new()).await.unwrap();
        let sender = UdpMedium::bind(any, vec![receiver.local_addr().unwrap()])
            .await
            .unwrap();

        sender
            .transmit(NodeAddress::new(1), NodeAddress::new(2), b"frame")
            .await
            .unwrap();
        let heard = receiver.receive().await.unwrap();
        assert_eq!(heard.source, NodeAddress::new(1));
        assert_eq!(heard.destination, NodeAddress::new(2));
        assert_eq!(heard.frame, b"frame".to_vec());
    }

    #[tokio::test]
    async fn test_oversized_frame_refused_not_truncated() {
        let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let receiver = UdpMedium::bind(any, Vec::new()).await.unwrap();
        let sender = UdpMedium::bind(any, vec![receiver.local_addr().unwrap()])
            .await
            .unwrap();

        let big = vec![0x41u8; MAX_FRAME_SIZE + 79];
        let err = sender
            .transmit(NodeAddress::new(1), NodeAddress::new(2), &big)
            .await
            .unwrap_err();
        assert!(matches!(err, NodeError::FrameTooLarge { size: 1103, .. }));

        // A frame at the limit still arrives whole.
        let full = vec![0x42u8; MAX_FRAME_SIZE];
        sender
            .transmit(NodeAddress::new(1), NodeAddress::new(2), &full)
            .await
            .unwrap();
        assert_eq!(receiver.receive().await.unwrap().frame, full);
    }

    #[tokio::test]
    async fn test_raw_oversized_datagram_is_skipped() {
        let any: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let receiver = UdpMedium::bind(any, Vec::new()).await.unwrap();
        let target = receiver.local_addr().unwrap();
        let raw = UdpSocket::bind(any).await.unwrap();

        let oversized = pack_datagram(NodeAddress::new(1), NodeAddress::new(2), &[0u8; 1100]);
        raw.send_to(&oversized, target).await.unwrap();
        let fits = pack_datagram(NodeAddress::new(1), NodeAddress::new(2), b"ok");
        raw.send_to(&fits, target).await.unwrap();

        assert_eq!(receiver.receive().await.unwrap().frame, b"ok".to_vec());
    }
}
