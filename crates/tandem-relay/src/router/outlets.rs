//! Outbound delivery and the connection recovery window.
//!
//! A live connection has a channel into its socket task. A connection that
//! dropped abruptly is held detached for the recovery window: events meant
//! for it are buffered, and a resume within the window reattaches the
//! identity and flushes the buffer.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use tandem_common::ConnectionId;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::protocol::ServerEvent;

/// A detached connection's recovery window ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lapsed {
    pub conn: ConnectionId,
    pub generation: u64,
}

struct Detached {
    generation: u64,
    buffer: VecDeque<ServerEvent>,
    timer: JoinHandle<()>,
}

impl Drop for Detached {
    fn drop(&mut self) {
        self.timer.abort();
    }
}

pub(crate) struct Outlets {
    live: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    detached: HashMap<ConnectionId, Detached>,
    window: Duration,
    buffer_limit: usize,
    next_generation: u64,
    lapsed_tx: mpsc::Sender<Lapsed>,
}

impl Outlets {
    pub(crate) fn new(window: Duration, buffer_limit: usize, lapsed_tx: mpsc::Sender<Lapsed>) -> Self {
        Self {
            live: HashMap::new(),
            detached: HashMap::new(),
            window,
            buffer_limit: buffer_limit.max(1),
            next_generation: 0,
            lapsed_tx,
        }
    }

    pub(crate) fn attach(&mut self, conn: ConnectionId, sink: mpsc::Sender<ServerEvent>) {
        self.live.insert(conn, sink);
    }

    pub(crate) fn is_detached(&self, conn: &ConnectionId) -> bool {
        self.detached.contains_key(conn)
    }

    /// Queue `event` for `conn`. Never blocks.
    pub(crate) fn send(&mut self, conn: &ConnectionId, event: ServerEvent) {
        if let Some(sink) = self.live.get(conn) {
            match sink.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) => {
                    warn!(conn = %conn, ?event, "Outbound queue full, dropping event");
                }
                Err(TrySendError::Closed(_)) => {
                    debug!(conn = %conn, "Outbound queue closed");
                }
            }
            return;
        }

        if let Some(detached) = self.detached.get_mut(conn) {
            if detached.buffer.len() >= self.buffer_limit {
                detached.buffer.pop_front();
                warn!(conn = %conn, "Recovery buffer full, dropping oldest event");
            }
            detached.buffer.push_back(event);
            return;
        }

        debug!(conn = %conn, "No outlet for connection, event discarded");
    }

    /// Move `conn` from live to detached and start its recovery timer.
    /// Returns `false` when recovery is disabled; the connection is then
    /// simply gone.
    pub(crate) fn detach(&mut self, conn: &ConnectionId) -> bool {
        self.live.remove(conn);
        if self.window.is_zero() {
            return false;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let window = self.window;
        let lapsed_tx = self.lapsed_tx.clone();
        let lapsed = Lapsed {
            conn: conn.clone(),
            generation,
        };
        let timer = tokio::spawn(async move {
            tokio::time::sleep(window).await;
            let _ = lapsed_tx.send(lapsed).await;
        });

        self.detached.insert(
            conn.clone(),
            Detached {
                generation,
                buffer: VecDeque::new(),
                timer,
            },
        );
        true
    }

    /// Reattach a detached `conn` to `sink`, flushing anything buffered.
    /// Returns `false` if `conn` was not detached.
    pub(crate) fn resume(&mut self, conn: &ConnectionId, sink: mpsc::Sender<ServerEvent>) -> bool {
        let Some(mut detached) = self.detached.remove(conn) else {
            return false;
        };

        self.live.insert(conn.clone(), sink);
        for event in detached.buffer.drain(..) {
            self.send(conn, event);
        }
        true
    }

    /// Apply a recovery timeout. Returns `true` if `lapsed` matched the
    /// current detachment, which is then forgotten.
    pub(crate) fn lapse(&mut self, lapsed: &Lapsed) -> bool {
        let current = self
            .detached
            .get(&lapsed.conn)
            .is_some_and(|d| d.generation == lapsed.generation);
        if current {
            self.detached.remove(&lapsed.conn);
        }
        current
    }

    /// Forget `conn` entirely.
    pub(crate) fn remove(&mut self, conn: &ConnectionId) {
        self.live.remove(conn);
        self.detached.remove(conn);
    }
}
