//! HTTP transport configuration

use url::Url;

use super::validation::{ConfigDefaults, ConfigResult, ConfigValidator, ConfigurationError, Validator};

/// Where and how the HTTP connector requests the event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpTransportConfig {
    /// Scheme, host and port of the generating service
    pub base_url: Url,
    /// Path of the streaming endpoint
    pub endpoint: String,
    /// Query parameter carrying the raw query text
    pub query_param: String,
    /// `Accept` header value
    pub accept: String,
}

impl HttpTransportConfig {
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            endpoint: ConfigDefaults::ENDPOINT.to_string(),
            query_param: ConfigDefaults::QUERY_PARAM.to_string(),
            accept: ConfigDefaults::ACCEPT.to_string(),
        }
    }

    /// Parse `base_url` and use default endpoint settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidEndpoint` if the URL does not parse.
    pub fn parse(base_url: &str) -> ConfigResult<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| ConfigurationError::InvalidEndpoint(format!("{base_url}: {e}")))?;
        Ok(Self::new(url))
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, name: impl Into<String>) -> Self {
        self.query_param = name.into();
        self
    }

    /// Full request URL for `query`
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidEndpoint` if the endpoint cannot be
    /// joined onto the base URL.
    pub fn request_url(&self, query: &str) -> ConfigResult<Url> {
        let mut url = self
            .base_url
            .join(&self.endpoint)
            .map_err(|e| ConfigurationError::InvalidEndpoint(format!("{}: {e}", self.endpoint)))?;
        url.query_pairs_mut().append_pair(&self.query_param, query);
        Ok(url)
    }
}

impl Validator for HttpTransportConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.base_url.scheme() != "http" {
            return Err(ConfigurationError::InvalidEndpoint(format!(
                "unsupported scheme `{}`, only plain http is available",
                self.base_url.scheme()
            )));
        }
        if !self.endpoint.starts_with('/') {
            return Err(ConfigurationError::InvalidEndpoint(format!(
                "endpoint must start with '/', got {:?}",
                self.endpoint
            )));
        }
        ConfigValidator::validate_non_empty(&self.query_param, "query_param")?;
        ConfigValidator::validate_non_empty(&self.accept, "accept")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url_encodes_query() {
        let config = HttpTransportConfig::parse("http://127.0.0.1:8080").unwrap();
        let url = config.request_url("无聊 time").unwrap();
        assert_eq!(url.path(), "/api/mindMap");
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, "keyword");
        assert_eq!(pairs[0].1, "无聊 time");
    }

    #[test]
    fn test_validation() {
        assert!(HttpTransportConfig::parse("http://localhost:3000")
            .unwrap()
            .validate()
            .is_ok());
        assert!(HttpTransportConfig::parse("https://localhost")
            .unwrap()
            .validate()
            .is_err());
        assert!(HttpTransportConfig::parse("http://localhost")
            .unwrap()
            .with_endpoint("api")
            .validate()
            .is_err());
        assert!(HttpTransportConfig::parse("not a url").is_err());
    }
}
