//! Credentials used to open per-conversation clients

use serde::Deserialize;
use std::fmt;

/// An XSI end user
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub username: String,
    pub password: String,
    /// XSP root URL
    pub server: String,
}

impl Account {
    pub fn new(username: impl Into<String>, password: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server: server.into(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}

/// A group or system administrator for OCI-P
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
    pub server: String,
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            server: server.into(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("server", &self.server)
            .finish()
    }
}
