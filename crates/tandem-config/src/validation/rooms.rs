//! Room timing windows and buffer sizes.

use crate::schema::TandemConfig;

use super::helpers::validate_range;

pub(crate) fn validate_rooms(errors: &mut Vec<String>, config: &TandemConfig) {
    let rooms = &config.rooms;

    validate_range(
        errors,
        "rooms.inactivity_timeout_secs",
        rooms.inactivity_timeout_secs,
        10,
        86_400,
    );
    validate_range(
        errors,
        "rooms.recovery_window_secs",
        rooms.recovery_window_secs,
        0,
        3_600,
    );
    validate_range(
        errors,
        "rooms.recovery_buffer",
        rooms.recovery_buffer as u64,
        1,
        4_096,
    );
    if rooms.prune_interval_secs != 0 {
        validate_range(
            errors,
            "rooms.prune_interval_secs",
            rooms.prune_interval_secs,
            10,
            86_400,
        );
    }
}
