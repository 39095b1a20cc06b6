//! Transport selection
//!
//! Choosing a connector moves the builder into the `ConnectorSet` state.

use std::sync::Arc;

use mindstream_client::{Connector, HttpConnector, HttpTransportConfig, Result};

use super::core::{ConnectorNotSet, ConnectorSet, MindMapBuilder};

impl MindMapBuilder<ConnectorNotSet> {
    /// Use any connector, e.g. a channel-backed one in tests
    #[must_use]
    pub fn connector(self, connector: Arc<dyn Connector>) -> MindMapBuilder<ConnectorSet> {
        self.with_state(ConnectorSet(connector))
    }

    /// Stream over SSE from `base_url` with the default endpoint
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `base_url` is not a plain `http` URL.
    pub fn http(self, base_url: &str) -> Result<MindMapBuilder<ConnectorSet>> {
        let config = HttpTransportConfig::parse(base_url)?;
        self.http_with(config)
    }

    /// Stream over SSE with a fully specified transport configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn http_with(self, config: HttpTransportConfig) -> Result<MindMapBuilder<ConnectorSet>> {
        let connector = HttpConnector::new(config)?;
        Ok(self.connector(Arc::new(connector)))
    }
}
