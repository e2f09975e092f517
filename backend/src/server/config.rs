//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) collection: String,
    pub(crate) clock: Arc<dyn Clock>,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` and storing records in `collection`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, collection: impl Into<String>) -> Self {
        Self {
            bind_addr,
            collection: collection.into(),
            clock: Arc::new(DefaultClock),
        }
    }

    /// Replace the clock used for store timestamps and envelopes.
    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "exercised by server tests with a fixed clock")
    )]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}
