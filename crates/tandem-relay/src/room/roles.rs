//! Role assignment for arriving participants.

use super::types::{Role, RoomSession};
use super::RoomError;

/// Pick the role for the next participant of `session`.
///
/// The first arrival gets [`Role::PlayerOne`]. A second arrival reclaims the
/// role most recently vacated in the room, or otherwise takes the seat the
/// current occupant does not hold. A third arrival is a capacity error.
pub fn assign_role(session: &mut RoomSession) -> Result<Role, RoomError> {
    match session.occupancy() {
        0 => Ok(Role::PlayerOne),
        1 => {
            let held = session
                .seats
                .keys()
                .next()
                .copied()
                .unwrap_or_default();
            let role = match session.vacated_role.take() {
                Some(vacated) if vacated != held => vacated,
                _ => held.other(),
            };
            Ok(role)
        }
        _ => Err(RoomError::Full),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_common::ConnectionId;

    #[test]
    fn first_arrival_is_player_one() {
        let mut session = RoomSession::default();
        assert_eq!(assign_role(&mut session), Ok(Role::PlayerOne));
    }

    #[test]
    fn second_arrival_takes_the_free_seat() {
        let mut session = RoomSession::default();
        session.seat(ConnectionId::from("a"), Role::PlayerOne);
        assert_eq!(assign_role(&mut session), Ok(Role::PlayerTwo));

        let mut session = RoomSession::default();
        session.seat(ConnectionId::from("b"), Role::PlayerTwo);
        assert_eq!(assign_role(&mut session), Ok(Role::PlayerOne));
    }

    #[test]
    fn vacated_role_is_reclaimed_and_cleared() {
        let mut session = RoomSession::default();
        session.seat(ConnectionId::from("b"), Role::PlayerTwo);
        session.vacated_role = Some(Role::PlayerOne);

        assert_eq!(assign_role(&mut session), Ok(Role::PlayerOne));
        assert_eq!(session.vacated_role(), None);
    }

    #[test]
    fn stale_vacated_role_never_duplicates_a_seat() {
        let mut session = RoomSession::default();
        session.seat(ConnectionId::from("a"), Role::PlayerOne);
        session.vacated_role = Some(Role::PlayerOne);

        assert_eq!(assign_role(&mut session), Ok(Role::PlayerTwo));
    }

    #[test]
    fn full_room_is_rejected() {
        let mut session = RoomSession::default();
        session.seat(ConnectionId::from("a"), Role::PlayerOne);
        session.seat(ConnectionId::from("b"), Role::PlayerTwo);
        assert_eq!(assign_role(&mut session), Err(RoomError::Full));
    }
}
