//! Turn gate: only the participant holding the current turn may move.

use tandem_common::ConnectionId;

use super::types::{Role, RoomSession};

/// Result of a move submission.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// The board was replaced and the turn passed. `recipients` is every
    /// participant of the room, mover included.
    Accepted {
        board: serde_json::Value,
        next_turn: Role,
        recipients: Vec<ConnectionId>,
    },
    /// Nothing changed. The sender is not told.
    Dropped(DropReason),
}

/// Why a move was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Sender holds no seat anywhere.
    Unbound,
    /// Sender is seated, but in a different room than the one named.
    WrongRoom,
    /// Sender is seated but it is the other role's turn.
    OutOfTurn { mover: Role, expected: Role },
}

/// Apply a move from a participant holding `mover` (if resolved).
pub(crate) fn gate_move(
    session: &mut RoomSession,
    mover: Option<Role>,
    payload: serde_json::Value,
) -> MoveOutcome {
    let Some(mover) = mover else {
        return MoveOutcome::Dropped(DropReason::Unbound);
    };

    if mover != session.current_turn {
        return MoveOutcome::Dropped(DropReason::OutOfTurn {
            mover,
            expected: session.current_turn,
        });
    }

    session.current_turn = mover.other();
    session.board_state = Some(payload.clone());

    MoveOutcome::Accepted {
        board: payload,
        next_turn: session.current_turn,
        recipients: session.join_order.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seated_pair() -> RoomSession {
        let mut session = RoomSession::default();
        session.seat(ConnectionId::from("a"), Role::PlayerOne);
        session.seat(ConnectionId::from("b"), Role::PlayerTwo);
        session
    }

    #[test]
    fn accepted_move_flips_turn_and_replaces_board() {
        let mut session = seated_pair();
        let outcome = gate_move(&mut session, Some(Role::PlayerOne), json!(["X", "", ""]));

        match outcome {
            MoveOutcome::Accepted {
                board,
                next_turn,
                recipients,
            } => {
                assert_eq!(board, json!(["X", "", ""]));
                assert_eq!(next_turn, Role::PlayerTwo);
                assert_eq!(recipients.len(), 2);
            }
            other => panic!("expected Accepted, got {other:?}"),
        }
        assert_eq!(session.current_turn(), Role::PlayerTwo);
        assert_eq!(session.board_state(), Some(&json!(["X", "", ""])));
    }

    #[test]
    fn board_is_overwritten_not_merged() {
        let mut session = seated_pair();
        gate_move(&mut session, Some(Role::PlayerOne), json!({"a": 1}));
        gate_move(&mut session, Some(Role::PlayerTwo), json!({"b": 2}));
        assert_eq!(session.board_state(), Some(&json!({"b": 2})));
        assert_eq!(session.current_turn(), Role::PlayerOne);
    }

    #[test]
    fn out_of_turn_leaves_state_alone() {
        let mut session = seated_pair();
        gate_move(&mut session, Some(Role::PlayerOne), json!(1));

        let outcome = gate_move(&mut session, Some(Role::PlayerOne), json!(2));
        assert_eq!(
            outcome,
            MoveOutcome::Dropped(DropReason::OutOfTurn {
                mover: Role::PlayerOne,
                expected: Role::PlayerTwo,
            })
        );
        assert_eq!(session.current_turn(), Role::PlayerTwo);
        assert_eq!(session.board_state(), Some(&json!(1)));
    }

    #[test]
    fn unresolved_mover_is_dropped() {
        let mut session = seated_pair();
        let outcome = gate_move(&mut session, None, json!(1));
        assert_eq!(outcome, MoveOutcome::Dropped(DropReason::Unbound));
        assert!(session.board_state().is_none());
        assert_eq!(session.current_turn(), Role::PlayerOne);
    }
}
