//! HTTP connector issuing `GET {base}{endpoint}?keyword=<query>`
//!
//! The response body is parsed as `text/event-stream` with named `chunk`,
//! `complete` and `error` events.

use bytes::Bytes;
use http::{Method, Request, header};
use http_body_util::{BodyDataStream, Empty};
use hyper_util::{
    client::legacy::{Client, connect::HttpConnector as TcpConnector},
    rt::TokioExecutor,
};

use super::{
    event::StreamRequest,
    source::{BoxFuture, Connector, EventSource},
    sse::SseSource,
};
use crate::{
    config::{HttpTransportConfig, Validator},
    error::{self, Result},
};

/// Connector streaming from the generating service over plain HTTP/1.1
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client<TcpConnector, Empty<Bytes>>,
    config: HttpTransportConfig,
    model: Option<String>,
}

impl HttpConnector {
    /// Build a connector after validating `config`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder(TokioExecutor::new()).build_http();
        Ok(Self {
            client,
            config,
            model: None,
        })
    }

    /// Record `model` as the producer of documents streamed by this connector
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }
}

impl Connector for HttpConnector {
    fn connect(&self, request: &StreamRequest) -> BoxFuture<'static, Result<Box<dyn EventSource>>> {
        let client = self.client.clone();
        let accept = self.config.accept.clone();
        let url = self.config.request_url(&request.query);
        let key = request.key.clone();

        Box::pin(async move {
            let url = url?;
            let request = Request::builder()
                .method(Method::GET)
                .uri(url.as_str())
                .header(header::ACCEPT, accept)
                .header(header::CACHE_CONTROL, "no-cache")
                .body(Empty::<Bytes>::new())
                .map_err(|e| error::transport(e).with_key(key.as_str()))?;

            tracing::debug!(target: "mindstream::transport", url = %url, "connecting");
            let response = client
                .request(request)
                .await
                .map_err(|e| error::transport(e).with_key(key.as_str()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(
                    error::transport(format!("unexpected status {status} from {url}"))
                        .with_key(key.as_str()),
                );
            }

            let body = BodyDataStream::new(response.into_body());
            Ok(Box::new(SseSource::new(body)) as Box<dyn EventSource>)
        })
    }

    fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}
