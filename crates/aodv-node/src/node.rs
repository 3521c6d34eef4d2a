//! The node actor and its handle.
//!
//! One tokio task owns the routing engine. Frames heard on the medium,
//! application sends, diagnostic queries and fired retries all reach it as
//! [`NodeEvent`]s on a single channel, so engine entry points never interleave.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use aodv_core::message::{UserData, encode};
use aodv_core::types::NodeAddress;
use aodv_routing::{AodvRouter, DataOutcome, ProtocolTiming, RetryTask};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::ingest::ingest_frame;
use crate::medium::{Datagram, MAX_FRAME_SIZE, Medium};
use crate::runtime::{NodeCallback, Notification, TokioClock, TokioScheduler};

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// The routing engine as wired inside a node.
pub type NodeRouter = AodvRouter<NodeCallback, TokioScheduler, TokioClock>;

/// Events delivered to the actor.
#[derive(Debug)]
pub(crate) enum NodeEvent {
    Inbound(Datagram),
    Send {
        data: UserData,
        reply: oneshot::Sender<Result<DataOutcome, NodeError>>,
    },
    SetAddress(NodeAddress),
    Routes(oneshot::Sender<String>),
    RetryFired(RetryTask),
    Shutdown,
}

/// An AODV node bound to a medium.
pub struct Node<M> {
    router: NodeRouter,
    medium: Arc<M>,
    events_tx: mpsc::Sender<NodeEvent>,
    events_rx: mpsc::Receiver<NodeEvent>,
    notifications: Option<mpsc::UnboundedReceiver<Notification>>,
}

impl<M: Medium> Node<M> {
    /// Create a node from configuration. Must be called inside a tokio runtime.
    pub fn new(config: &NodeConfig, medium: M) -> Result<Self, NodeError> {
        let address = config.node.address()?;
        Ok(Self::with_clock(
            config.protocol.to_timing(),
            address,
            medium,
            TokioClock::new(),
        ))
    }

    pub fn with_clock(
        timing: ProtocolTiming,
        address: Option<NodeAddress>,
        medium: M,
        clock: TokioClock,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (notify_tx, notify_rx) = mpsc::unbounded_channel();

        let mut router = AodvRouter::new(
            timing,
            NodeCallback::new(notify_tx),
            TokioScheduler::new(events_tx.clone()),
            clock,
        );
        if let Some(address) = address {
            router.set_address(address);
        }

        Self {
            router,
            medium: Arc::new(medium),
            events_tx,
            events_rx,
            notifications: Some(notify_rx),
        }
    }

    /// A cloneable handle for talking to the running node.
    pub fn handle(&self) -> NodeHandle {
        NodeHandle {
            events: self.events_tx.clone(),
        }
    }

    /// Take the stream of deliveries and unreachable reports. Yields `None`
    /// after the first call.
    pub fn take_notifications(&mut self) -> Option<mpsc::UnboundedReceiver<Notification>> {
        self.notifications.take()
    }

    pub fn router(&self) -> &NodeRouter {
        &self.router
    }

    /// Drop the notification receiver if nobody took it, so undelivered
    /// notifications do not pile up for the life of the node.
    fn release_unclaimed_notifications(&mut self) {
        if self.notifications.take().is_some() {
            tracing::debug!("notifications not taken; discarding them");
        }
    }

    /// Run the event loop until [`NodeHandle::shutdown`] is called.
    ///
    /// Notifications must be taken before this is called.
    pub async fn run(mut self) {
        self.release_unclaimed_notifications();
        let receive_task = self.spawn_receive_loop();
        tracing::info!(address = ?self.router.address(), "node running");

        while let Some(event) = self.events_rx.recv().await {
            match event {
                NodeEvent::Inbound(datagram) => {
                    self.handle_inbound(datagram);
                    self.flush().await;
                }
                NodeEvent::Send { data, reply } => {
                    let dest = data.destination();
                    let result = self.router.process_user_data(data).map_err(NodeError::from);
                    if let Ok(outcome) = &result {
                        tracing::debug!(%dest, ?outcome, "user data submitted");
                    }
                    self.flush().await;
                    let _ = reply.send(result);
                }
                NodeEvent::SetAddress(address) => {
                    tracing::info!(%address, "address set");
                    self.router.set_address(address);
                }
                NodeEvent::Routes(reply) => {
                    let _ = reply.send(self.router.routes_dump().to_string());
                }
                NodeEvent::RetryFired(task) => {
                    let dest = task.destination();
                    match self.router.run_retry(task) {
                        Ok(outcome) => tracing::debug!(%dest, ?outcome, "retry ran"),
                        Err(e) => tracing::warn!(%dest, "retry failed: {e}"),
                    }
                    self.flush().await;
                }
                NodeEvent::Shutdown => {
                    tracing::info!("shutdown requested");
                    break;
                }
            }
        }

        receive_task.abort();
        tracing::info!("node stopped");
    }

    fn spawn_receive_loop(&self) -> JoinHandle<()> {
        let medium = Arc::clone(&self.medium);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            loop {
                match medium.receive().await {
                    Ok(datagram) => {
                        if events.send(NodeEvent::Inbound(datagram)).await.is_err() {
                            break;
                        }
                    }
                    Err(NodeError::Stopped) => break,
                    Err(e) => tracing::warn!("medium receive failed: {e}"),
                }
            }
            tracing::debug!("receive loop finished");
        })
    }

    fn handle_inbound(&mut self, datagram: Datagram) {
        let Some(local) = self.router.address() else {
            tracing::trace!("no local address; frame ignored");
            return;
        };
        if datagram.source == local || !datagram.is_for(local) {
            return;
        }
        tracing::trace!(
            from = %datagram.source,
            frame = %hex::encode(&datagram.frame),
            "frame heard"
        );
        match ingest_frame(&mut self.router, datagram.source, &datagram.frame) {
            Ok(ingested) => tracing::debug!(from = %datagram.source, ?ingested, "frame processed"),
            Err(NodeError::Packet(e)) => {
                tracing::warn!(from = %datagram.source, "undecodable frame dropped: {e}");
            }
            Err(e) => tracing::warn!(from = %datagram.source, "frame dropped: {e}"),
        }
    }

    /// Transmit everything the engine queued during the last event.
    async fn flush(&mut self) {
        let outbox = self.router.callback_mut().drain_outbox();
        let Some(source) = self.router.address() else {
            return;
        };
        for (message, destination) in outbox {
            let frame = encode(&message);
            tracing::trace!(%destination, frame = %hex::encode(&frame), "transmit");
            if let Err(e) = self.medium.transmit(source, destination, &frame).await {
                tracing::warn!(%destination, "transmit failed: {e}");
            }
        }
    }
}

/// Cloneable handle to a running [`Node`].
#[derive(Debug, Clone)]
pub struct NodeHandle {
    events: mpsc::Sender<NodeEvent>,
}

impl NodeHandle {
    async fn post(&self, event: NodeEvent) -> Result<(), NodeError> {
        self.events.send(event).await.map_err(|_| NodeError::Stopped)
    }

    /// Submit user data for delivery. Resolves once the engine has decided
    /// what to do with it and any resulting frames are on the medium;
    /// delivery itself may happen later. Data too large for one frame is
    /// refused up front.
    pub async fn send(&self, data: UserData) -> Result<DataOutcome, NodeError> {
        if data.encoded_len() > MAX_FRAME_SIZE {
            return Err(NodeError::FrameTooLarge {
                size: data.encoded_len(),
                max: MAX_FRAME_SIZE,
            });
        }
        let (reply, rx) = oneshot::channel();
        self.post(NodeEvent::Send { data, reply }).await?;
        rx.await.map_err(|_| NodeError::Stopped)?
    }

    pub async fn set_address(&self, address: NodeAddress) -> Result<(), NodeError> {
        self.post(NodeEvent::SetAddress(address)).await
    }

    /// The route table rendered as text.
    pub async fn routes(&self) -> Result<String, NodeError> {
        let (reply, rx) = oneshot::channel();
        self.post(NodeEvent::Routes(reply)).await?;
        rx.await.map_err(|_| NodeError::Stopped)
    }

    pub async fn shutdown(&self) {
        if self.post(NodeEvent::Shutdown).await.is_err() {
            tracing::debug!("node already stopped");
        }
    }
}
