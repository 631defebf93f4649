//! Proxy session handles.
//!
//! A session is a logical proxy configuration created against a running
//! server. This module only produces the handle: the address the session
//! client should talk to plus the parameters the caller asked for. The
//! session client's own protocol lives outside this crate.
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a proxy session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    // Private constructor, only usable within our crate
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for one logical proxy session.
///
/// Carries the validated `host:port` of the server the session was created
/// against and the parameters supplied by the caller. Pure data; no I/O is
/// performed until a session client consumes it.
#[derive(Debug, Clone)]
pub struct ProxySession {
    /// Session ID
    id: SessionId,
    /// `host:port` of the server this session addresses
    host_port: String,
    /// Caller-supplied session parameters
    params: HashMap<String, String>,
}

impl ProxySession {
    pub(crate) fn new(host_port: String, params: HashMap<String, String>) -> Self {
        Self {
            id: SessionId::new(),
            host_port,
            params,
        }
    }

    /// Get the session ID
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Address of the server this session was created against, as `host:port`.
    pub fn host_port(&self) -> &str {
        &self.host_port
    }

    /// Parameters the session was created with.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}
