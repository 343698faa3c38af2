//! Input dispatch: turns registry outcomes into client events.

use tandem_common::{ConnectionId, RoomId};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::outlets::Lapsed;
use super::{Router, RouterInput};
use crate::protocol::{ClientEvent, ServerEvent};
use crate::room::{Expired, MoveOutcome, RoomError};

impl Router {
    /// Apply one input.
    pub fn handle(&mut self, input: RouterInput) {
        match input {
            RouterInput::Attach {
                resume,
                sink,
                reply,
            } => {
                let conn = self.attach(resume, sink);
                let _ = reply.send(conn);
            }
            RouterInput::Client { conn, event } => self.dispatch(&conn, event),
            RouterInput::Closed { conn } => {
                self.outlets.remove(&conn);
                self.leave(&conn, None);
            }
            RouterInput::Dropped { conn } => {
                if self.outlets.detach(&conn) {
                    info!(conn = %conn, "Connection dropped, holding seat for recovery");
                } else {
                    self.leave(&conn, None);
                }
            }
        }
    }

    /// An inactivity timer fired.
    pub fn on_expired(&mut self, fired: Expired) {
        match self.registry.expire(&fired) {
            Some(evicted) => info!(
                room = %fired.room,
                evicted = evicted.len(),
                "Room expired after inactivity"
            ),
            None => debug!(room = %fired.room, generation = fired.generation, "Stale expiry ignored"),
        }
    }

    /// A recovery window closed without a resume.
    pub fn on_lapsed(&mut self, lapsed: Lapsed) {
        if self.outlets.lapse(&lapsed) {
            info!(conn = %lapsed.conn, "Recovery window lapsed");
            self.leave(&lapsed.conn, None);
        }
    }

    fn attach(
        &mut self,
        resume: Option<ConnectionId>,
        sink: mpsc::Sender<ServerEvent>,
    ) -> ConnectionId {
        if let Some(conn) = resume {
            if self.outlets.is_detached(&conn) {
                let _ = sink.try_send(ServerEvent::SessionReady {
                    session_id: conn.clone(),
                    recovered: true,
                });
                self.outlets.resume(&conn, sink);
                info!(conn = %conn, "Connection recovered");
                self.announce_recovery(&conn);
                return conn;
            }
            debug!(conn = %conn, "Resume refused, issuing a fresh identity");
        }

        let conn = ConnectionId::new();
        let _ = sink.try_send(ServerEvent::SessionReady {
            session_id: conn.clone(),
            recovered: false,
        });
        self.outlets.attach(conn.clone(), sink);
        conn
    }

    fn announce_recovery(&mut self, conn: &ConnectionId) {
        let Some(binding) = self.registry.binding(conn) else {
            return;
        };
        let Some(session) = self.registry.get(&binding.room) else {
            return;
        };
        let peers: Vec<ConnectionId> = session.peers_of(conn).cloned().collect();
        for peer in &peers {
            self.outlets.send(peer, ServerEvent::OpponentConnected);
        }
    }

    fn dispatch(&mut self, conn: &ConnectionId, event: ClientEvent) {
        match event {
            ClientEvent::CheckRoom { room } => {
                let full = self.registry.is_full(&room);
                self.outlets.send(conn, ServerEvent::RoomStatus { room, full });
            }
            ClientEvent::JoinRoom { room } => self.join(conn, room),
            ClientEvent::MakeMove {
                room,
                new_grid_cells,
            } => self.make_move(conn, &room, new_grid_cells),
            ClientEvent::LeaveRoom { room } => self.leave(conn, Some(&room)),
        }
    }

    fn join(&mut self, conn: &ConnectionId, room: RoomId) {
        if let Some(binding) = self.registry.binding(conn) {
            if binding.room == room {
                debug!(conn = %conn, room = %room, "Duplicate join ignored");
                return;
            }
            // A refused switch keeps the current seat.
            if self.registry.is_full(&room) {
                self.refuse_full(conn, &room);
                return;
            }
            let previous = binding.room.clone();
            self.leave(conn, Some(&previous));
        }

        match self.registry.join(&room, conn) {
            Ok(joined) => {
                info!(conn = %conn, room = %room, role = %joined.role, "Joined room");
                self.outlets
                    .send(conn, ServerEvent::RoleAssigned { role: joined.role });

                if joined.game_started {
                    self.broadcast(&joined.participants, ServerEvent::OpponentConnected);
                    self.broadcast(&joined.participants, ServerEvent::GameStart);
                    info!(room = %room, "Game started");
                }

                if let Some((board, next_turn)) = joined.replay {
                    self.outlets.send(
                        conn,
                        ServerEvent::MoveMade {
                            new_grid_cells: board,
                            next_turn,
                        },
                    );
                }
            }
            Err(RoomError::Full) => self.refuse_full(conn, &room),
            Err(err @ RoomError::AlreadySeated(_)) => {
                debug!(conn = %conn, room = %room, error = %err, "Join ignored");
            }
        }
    }

    fn refuse_full(&mut self, conn: &ConnectionId, room: &RoomId) {
        info!(conn = %conn, room = %room, "Join refused, room full");
        self.outlets.send(
            conn,
            ServerEvent::RoomFull {
                message: format!("Room {room} is already full"),
            },
        );
    }

    fn make_move(&mut self, conn: &ConnectionId, room: &RoomId, payload: serde_json::Value) {
        match self.registry.submit_move(room, conn, payload) {
            MoveOutcome::Accepted {
                board,
                next_turn,
                recipients,
            } => {
                debug!(conn = %conn, room = %room, next_turn = %next_turn, "Move accepted");
                self.broadcast(
                    &recipients,
                    ServerEvent::MoveMade {
                        new_grid_cells: board,
                        next_turn,
                    },
                );
            }
            MoveOutcome::Dropped(reason) => {
                debug!(conn = %conn, room = %room, ?reason, "Move dropped");
            }
        }
    }

    /// Leave path shared by explicit leaves, clean closes, and lapsed
    /// recoveries.
    fn leave(&mut self, conn: &ConnectionId, room: Option<&RoomId>) {
        let Some(departure) = self.registry.depart(conn, room) else {
            debug!(conn = %conn, "Leave ignored, not seated");
            return;
        };

        info!(
            conn = %conn,
            room = %departure.room,
            role = %departure.role,
            remaining = departure.remaining.len(),
            "Left room"
        );

        if !departure.reset {
            self.broadcast(&departure.remaining, ServerEvent::OpponentDisconnected);
        }
    }

    fn broadcast(&mut self, recipients: &[ConnectionId], event: ServerEvent) {
        for conn in recipients {
            self.outlets.send(conn, event.clone());
        }
    }
}
