//! Connection event router.
//!
//! One task owns the [`RoomRegistry`] and applies every input in arrival
//! order: client requests, connection drops and resumes, and timer notices.
//! Timer tasks only ever send into this queue, so room state has a single
//! writer and needs no locks.

mod dispatch;
mod outlets;


use std::time::Duration;

use tandem_common::ConnectionId;
use tandem_config::RoomsConfig;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, Interval};
use tracing::{debug, info};

use crate::protocol::{ClientEvent, ServerEvent};
use crate::room::{Expired, InactivityMonitor, RoomRegistry};

pub use outlets::Lapsed;
use outlets::Outlets;

/// Queue depth for router inputs and timer notices.
const QUEUE_CAPACITY: usize = 1024;

/// Room timing knobs, usually taken from [`RoomsConfig`].
#[derive(Debug, Clone)]
pub struct RouterConfig {
    pub inactivity_timeout: Duration,
    pub recovery_window: Duration,
    pub recovery_buffer: usize,
    pub prune_interval: Option<Duration>,
}

impl From<&RoomsConfig> for RouterConfig {
    fn from(rooms: &RoomsConfig) -> Self {
        Self {
            inactivity_timeout: rooms.inactivity_timeout(),
            recovery_window: rooms.recovery_window(),
            recovery_buffer: rooms.recovery_buffer,
            prune_interval: rooms.prune_interval(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::from(&RoomsConfig::default())
    }
}

impl RouterConfig {
    /// Capacity for a connection's outbound channel: room for a full
    /// recovery flush plus ordinary traffic.
    pub fn outbound_capacity(&self) -> usize {
        self.recovery_buffer + 64
    }
}

/// Everything the router reacts to besides its own timers.
#[derive(Debug)]
pub enum RouterInput {
    /// A socket finished its handshake. `resume` names the identity it asks
    /// to pick up; the granted identity comes back on `reply`.
    Attach {
        resume: Option<ConnectionId>,
        sink: mpsc::Sender<ServerEvent>,
        reply: oneshot::Sender<ConnectionId>,
    },
    Client {
        conn: ConnectionId,
        event: ClientEvent,
    },
    /// The client closed its socket on purpose.
    Closed { conn: ConnectionId },
    /// The socket was lost without a close; the identity may come back.
    Dropped { conn: ConnectionId },
}

/// Receivers the router's timers report into.
pub struct TimerQueues {
    pub expired: mpsc::Receiver<Expired>,
    pub lapsed: mpsc::Receiver<Lapsed>,
}

pub struct Router {
    registry: RoomRegistry,
    outlets: Outlets,
    prune_interval: Option<Duration>,
}

impl Router {
    pub fn new(config: &RouterConfig) -> (Self, TimerQueues) {
        let (expired_tx, expired) = mpsc::channel(QUEUE_CAPACITY);
        let (lapsed_tx, lapsed) = mpsc::channel(QUEUE_CAPACITY);

        let router = Self {
            registry: RoomRegistry::new(InactivityMonitor::new(
                config.inactivity_timeout,
                expired_tx,
            )),
            outlets: Outlets::new(config.recovery_window, config.recovery_buffer, lapsed_tx),
            prune_interval: config.prune_interval,
        };
        (router, TimerQueues { expired, lapsed })
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// Forget empty rooms. Returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let pruned = self.registry.prune();
        if pruned > 0 {
            info!(pruned, remaining = self.registry.len(), "Pruned empty rooms");
        }
        pruned
    }

    /// Process inputs and timer notices until every [`RouterHandle`] is gone.
    pub async fn run(mut self, mut inputs: mpsc::Receiver<RouterInput>, mut timers: TimerQueues) {
        let mut prune_tick = self
            .prune_interval
            .map(|every| tokio::time::interval_at(Instant::now() + every, every));

        loop {
            tokio::select! {
                input = inputs.recv() => match input {
                    Some(input) => self.handle(input),
                    None => break,
                },
                Some(fired) = timers.expired.recv() => self.on_expired(fired),
                Some(lapsed) = timers.lapsed.recv() => self.on_lapsed(lapsed),
                _ = next_tick(&mut prune_tick) => {
                    self.prune();
                }
            }
        }

        debug!("Router stopped");
    }
}

async fn next_tick(tick: &mut Option<Interval>) {
    match tick {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Cloneable sender side of a running router.
#[derive(Clone)]
pub struct RouterHandle {
    tx: mpsc::Sender<RouterInput>,
    outbound_capacity: usize,
}

impl RouterHandle {
    /// Register a socket. Returns the granted identity, or `None` if the
    /// router has stopped.
    pub async fn attach(
        &self,
        resume: Option<ConnectionId>,
        sink: mpsc::Sender<ServerEvent>,
    ) -> Option<ConnectionId> {
        let (reply, granted) = oneshot::channel();
        let queued = self
            .send(RouterInput::Attach {
                resume,
                sink,
                reply,
            })
            .await;
        if !queued {
            return None;
        }
        granted.await.ok()
    }

    /// Queue an input. Returns `false` if the router has stopped.
    pub async fn send(&self, input: RouterInput) -> bool {
        self.tx.send(input).await.is_ok()
    }

    pub fn outbound_capacity(&self) -> usize {
        self.outbound_capacity
    }
}

/// Start a router task on the current runtime.
pub fn spawn_router(config: RouterConfig) -> RouterHandle {
    let (tx, inputs) = mpsc::channel(QUEUE_CAPACITY);
    let (router, timers) = Router::new(&config);
    tokio::spawn(router.run(inputs, timers));

    info!(
        inactivity_secs = config.inactivity_timeout.as_secs(),
        recovery_secs = config.recovery_window.as_secs(),
        "Router started"
    );

    RouterHandle {
        tx,
        outbound_capacity: config.outbound_capacity(),
    }
}
