//! OCI-P session ids, signed passwords and the login state machine

use crate::error::{OciError, OciResult};
use rand::Rng;
use sha1::{Digest, Sha1};
use std::fmt;

/// Source of the session id carried by every command of one client
pub trait SessionIdGenerator: Send + Sync {
    fn session_id(&self) -> String;
}

/// SHA-1 of `{label}:{random}:{unix time}`
///
/// Unique per process run; not a secret.
#[derive(Debug, Clone)]
pub struct LabelledSessionId {
    label: String,
}

impl LabelledSessionId {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl SessionIdGenerator for LabelledSessionId {
    fn session_id(&self) -> String {
        let seed: u32 = rand::thread_rng().gen_range(1..=1_000_000_000);
        let now = chrono::Utc::now();
        let time = format!("{}.{:02}", now.timestamp(), now.timestamp_subsec_millis() / 10);
        sha1_hex(&format!("{}:{}:{}", self.label, seed, time))
    }
}

/// A fixed session id
#[derive(Debug, Clone)]
pub struct FixedSessionId(pub String);

impl SessionIdGenerator for FixedSessionId {
    fn session_id(&self) -> String {
        self.0.clone()
    }
}

pub(crate) fn sha1_hex(input: &str) -> String {
    hex::encode(Sha1::digest(input.as_bytes()))
}

/// `MD5("{nonce}:{SHA1(password)}")` as sent in `LoginRequest14sp4`
pub fn signed_password(password: &str, nonce: &str) -> String {
    let hashed = sha1_hex(password);
    format!("{:x}", md5::compute(format!("{}:{}", nonce, hashed)))
}

/// Group a command is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupScope {
    pub service_provider_id: String,
    pub group_id: String,
}

impl GroupScope {
    pub fn new(service_provider_id: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            service_provider_id: service_provider_id.into(),
            group_id: group_id.into(),
        }
    }
}

/// Two-phase login progress
#[derive(Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    /// `AuthenticationRequest` answered with a nonce, not yet used
    Challenged { nonce: String },
    /// Login accepted; the admin's own group
    Authenticated { scope: GroupScope },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    /// Take the nonce, leaving the state unauthenticated
    pub(crate) fn take_nonce(&mut self) -> OciResult<String> {
        match std::mem::take(self) {
            AuthState::Challenged { nonce } => Ok(nonce),
            other => {
                *self = other;
                Err(OciError::authentication(
                    "login requires a nonce from a preceding authentication request",
                ))
            }
        }
    }

    pub(crate) fn scope(&self) -> OciResult<&GroupScope> {
        match self {
            AuthState::Authenticated { scope } => Ok(scope),
            _ => Err(OciError::authentication("not logged in")),
        }
    }
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Unauthenticated => f.write_str("Unauthenticated"),
            AuthState::Challenged { .. } => f.write_str("Challenged"),
            AuthState::Authenticated { scope } => f.debug_tuple("Authenticated").field(scope).finish(),
        }
    }
}
