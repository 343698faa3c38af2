//! Inactivity monitor: deferred room resets.
//!
//! A timer task never touches room state. When it fires it sends an
//! [`Expired`] notice into the router's queue, and the router applies the
//! reset only if the notice's generation is still the one armed on the room.

use std::time::Duration;

use tandem_common::RoomId;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A room's inactivity timer ran out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expired {
    pub room: RoomId,
    pub generation: u64,
}

/// The armed timer of one room. Dropping it cancels the timer task.
#[derive(Debug)]
pub struct PendingExpiry {
    generation: u64,
    task: JoinHandle<()>,
}

impl PendingExpiry {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for PendingExpiry {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Schedules [`Expired`] notices.
pub struct InactivityMonitor {
    delay: Duration,
    /// Monotonic across resets so a notice from a cancelled timer can never
    /// match a later one.
    next_generation: u64,
    fired_tx: mpsc::Sender<Expired>,
}

impl InactivityMonitor {
    pub fn new(delay: Duration, fired_tx: mpsc::Sender<Expired>) -> Self {
        Self {
            delay,
            next_generation: 0,
            fired_tx,
        }
    }

    /// Cancel whatever is armed in `slot` and start a fresh timer for `room`.
    /// Returns the new generation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn arm(&mut self, room: &RoomId, slot: &mut Option<PendingExpiry>) -> u64 {
        self.disarm(slot);

        self.next_generation += 1;
        let generation = self.next_generation;
        let delay = self.delay;
        let fired_tx = self.fired_tx.clone();
        let room = room.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fired_tx.send(Expired { room, generation }).await;
        });

        *slot = Some(PendingExpiry { generation, task });
        generation
    }

    /// Cancel without rescheduling. Returns whether a timer was armed.
    pub fn disarm(&self, slot: &mut Option<PendingExpiry>) -> bool {
        slot.take().is_some()
    }

    /// Whether `fired` belongs to the timer currently armed in `slot`.
    pub fn is_current(slot: &Option<PendingExpiry>, fired: &Expired) -> bool {
        slot.as_ref()
            .is_some_and(|pending| pending.generation == fired.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(delay_secs: u64) -> (InactivityMonitor, mpsc::Receiver<Expired>) {
        let (tx, rx) = mpsc::channel(16);
        (InactivityMonitor::new(Duration::from_secs(delay_secs), tx), rx)
    }

    #[tokio::test(start_paused = true)]
    async fn armed_timer_fires_after_delay() {
        let (mut monitor, mut rx) = monitor(300);
        let room = RoomId::from("lobby1");
        let mut slot = None;

        let generation = monitor.arm(&room, &mut slot);
        let start = tokio::time::Instant::now();
        let fired = rx.recv().await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(300));
        assert_eq!(fired, Expired { room, generation });
        assert!(InactivityMonitor::is_current(&slot, &fired));
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_cancels_previous_timer() {
        let (mut monitor, mut rx) = monitor(60);
        let room = RoomId::from("r");
        let mut slot = None;

        let first = monitor.arm(&room, &mut slot);
        tokio::time::advance(Duration::from_secs(30)).await;
        let second = monitor.arm(&room, &mut slot);
        assert!(second > first);

        let fired = rx.recv().await.unwrap();
        assert_eq!(fired.generation, second);

        let nothing_else = tokio::time::timeout(Duration::from_secs(600), rx.recv()).await;
        assert!(nothing_else.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn disarm_prevents_firing() {
        let (mut monitor, mut rx) = monitor(60);
        let mut slot = None;

        monitor.arm(&RoomId::from("r"), &mut slot);
        assert!(monitor.disarm(&mut slot));
        assert!(!monitor.disarm(&mut slot));

        let fired = tokio::time::timeout(Duration::from_secs(600), rx.recv()).await;
        assert!(fired.is_err());
    }

    #[test]
    fn stale_generation_is_not_current() {
        let fired = Expired {
            room: RoomId::from("r"),
            generation: 7,
        };
        assert!(!InactivityMonitor::is_current(&None, &fired));
    }
}
