//! Listener settings: bind address and allowed origin.

use std::net::IpAddr;

use crate::schema::TandemConfig;

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &TandemConfig) {
    let server = &config.server;

    if server.bind_address.parse::<IpAddr>().is_err() {
        errors.push(format!(
            "server.bind_address = {:?} is not an IP address",
            server.bind_address
        ));
    }

    let origin = server.allowed_origin.trim();
    if origin.is_empty() {
        errors.push("server.allowed_origin must not be empty (use \"*\" to allow any)".into());
    } else if origin != "*" && !(origin.starts_with("http://") || origin.starts_with("https://")) {
        errors.push(format!(
            "server.allowed_origin = {origin:?} must be \"*\" or an http(s) origin"
        ));
    }
}
