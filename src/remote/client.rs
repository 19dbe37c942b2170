//! HTTP transport for the processor API

use crate::errors::{ConsoleError, Result, TransportFailure};
use crate::models::processor::ProcessorConfig;
use crate::models::responses::{ConfigUpdateRequest, ErrorResponse, ProcessorInfo};
use async_trait::async_trait;
use log::{debug, warn};
use std::time::Duration;
use url::Url;

/// Path of the configuration endpoint on every processor
pub const CONFIG_PATH: &str = "/config";
/// Path of the processor info endpoint
pub const INFO_PATH: &str = "/config/info";

/// How the console talks to a processor.
///
/// `HttpTransport` is the real implementation; tests and embedders can
/// provide their own.
#[async_trait]
pub trait ProcessorTransport: Send + Sync {
    /// `PUT {CONFIG_PATH}` on the processor described by `processor`
    async fn put_config(
        &self,
        processor: &ProcessorConfig,
        request: &ConfigUpdateRequest,
    ) -> std::result::Result<(), TransportFailure>;

    /// `GET {INFO_PATH}` on the processor described by `processor`
    async fn fetch_info(
        &self,
        processor: &ProcessorConfig,
    ) -> std::result::Result<ProcessorInfo, TransportFailure>;
}

/// Build the URL of `path` on the processor at `processor.host:processor.port`
pub fn endpoint(
    processor: &ProcessorConfig,
    path: &str,
) -> std::result::Result<Url, TransportFailure> {
    let base_url = processor.base_url();
    let base = Url::parse(&base_url)
        .map_err(|e| TransportFailure::InvalidEndpoint(format!("{}: {}", base_url, e)))?;
    base.join(path)
        .map_err(|e| TransportFailure::InvalidEndpoint(format!("{}{}: {}", base_url, path, e)))
}

/// Turn a non-2xx answer into a failure, keeping the server's own messages
/// when the body has the expected `detail` list
pub fn classify_error_body(status: u16, body: String) -> TransportFailure {
    match ErrorResponse::parse(&body) {
        Some(parsed) => TransportFailure::Rejected {
            status,
            messages: parsed.messages(),
        },
        None => {
            warn!(
                "Processor returned HTTP {} with an unrecognized body ({} bytes)",
                status,
                body.len()
            );
            TransportFailure::MalformedErrorResponse {
                status,
                body: body.trim().to_string(),
            }
        }
    }
}

fn map_send_error(err: reqwest::Error) -> TransportFailure {
    if err.is_timeout() {
        TransportFailure::Timeout
    } else {
        TransportFailure::Unreachable(err.to_string())
    }
}

/// reqwest-backed transport with a fixed per-request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        // Processors are addressed directly by host and port
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ConsoleError::Remote(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProcessorTransport for HttpTransport {
    async fn put_config(
        &self,
        processor: &ProcessorConfig,
        request: &ConfigUpdateRequest,
    ) -> std::result::Result<(), TransportFailure> {
        let url = endpoint(processor, CONFIG_PATH)?;
        debug!("PUT {}", url);

        let response = self
            .client
            .put(url)
            .json(request)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status.is_success() {
            debug!("Processor accepted configuration (HTTP {})", status.as_u16());
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_error_body(status.as_u16(), body))
    }

    async fn fetch_info(
        &self,
        processor: &ProcessorConfig,
    ) -> std::result::Result<ProcessorInfo, TransportFailure> {
        let url = endpoint(processor, INFO_PATH)?;
        debug!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(map_send_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_send_error)?;

        if !status.is_success() {
            return Err(classify_error_body(status.as_u16(), body));
        }

        serde_json::from_str(&body).map_err(|_| TransportFailure::MalformedErrorResponse {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}
