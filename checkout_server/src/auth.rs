//! Caller identity.
//!
//! Sign-in is handled by the storefront's identity provider, which forwards the authenticated user id in the
//! `X-User-Id` header. Handlers that need a user take a [`UserId`] argument; requests without one are rejected with a
//! 401 before the handler runs.
//!
//! The header is trusted as-is. Nothing here verifies it, so this server must only be reachable through the
//! authenticating proxy that sets it. Anyone who can reach the server directly can claim any user id, and with it
//! the owner-only order and revenue routes of every store.
use std::{fmt::Display, net::IpAddr};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::*;

use crate::errors::ServerError;

pub const USER_ID_HEADER: &str = "X-User-Id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// True if the bind address only accepts connections from this machine.
pub fn is_loopback_host(host: &str) -> bool {
    host.eq_ignore_ascii_case("localhost") || host.parse::<IpAddr>().map(|ip| ip.is_loopback()).unwrap_or(false)
}

impl FromRequest for UserId {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| UserId(s.to_string()))
            .ok_or_else(|| {
                debug!("💻️ Request to {} has no user id", req.path());
                ServerError::Unauthenticated(format!("The {USER_ID_HEADER} header is missing"))
            });
        ready(user_id)
    }
}
