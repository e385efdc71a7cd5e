//! Wire seam between the controller and the prediction endpoint.

use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

use crate::common::config::AppCfg;
use crate::common::error::PanelResult;

/// Raw answer from the endpoint; status handling lives in the controller.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// Sends one JSON body to the prediction endpoint.
pub trait PredictionTransport {
    fn post_json(
        &self,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport posting to the configured endpoint.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(cfg: &AppCfg) -> PanelResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: cfg.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionTransport for HttpTransport {
    fn post_json(
        &self,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send {
        let request = self
            .client
            .post(self.endpoint.as_str())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        async move {
            let response = request.send().await?;
            let status = response.status();
            let body = match response.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                // The status alone decides the outcome of a failed request.
                Err(_) if !status.is_success() => Vec::new(),
                Err(err) => return Err(err.into()),
            };
            Ok(TransportResponse {
                status: status.as_u16(),
                body,
            })
        }
    }
}
