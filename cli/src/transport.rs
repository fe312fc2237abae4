//! `reqwest` implementation of the session [`Transport`].
//!
//! The client is built once with the configured timeout; `reqwest` reports
//! an expired timer as a timeout error, which maps to [`ApiError::Timeout`].
//! Every other send failure is [`ApiError::Network`].

#[cfg(test)]
#[path = "transport_test.rs"]
mod transport_test;

use std::future::Future;

use hotelsocial_session::http::RequestBody;
use hotelsocial_session::{ApiConfig, ApiError, HttpRequest, HttpResponse, Method, Transport};
use reqwest::multipart::{Form, Part};

use crate::error::CliError;

pub struct ReqwestTransport {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ReqwestTransport {
    pub fn new(config: ApiConfig) -> Result<Self, CliError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn prepare(&self, request: &HttpRequest) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.config.url(&request.path);
        let mut builder = self
            .client
            .request(reqwest_method(request.method), url)
            .query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        Ok(match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart {
                field,
                file_name,
                content_type,
                bytes,
            } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
                builder.multipart(Form::new().part(field.clone(), part))
            }
        })
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn send_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout
    } else {
        ApiError::Network(err.to_string())
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> {
        let prepared = self.prepare(request);
        async move {
            let response = prepared?.send().await.map_err(send_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(send_error)?;
            tracing::debug!(status, bytes = body.len(), "response received");
            Ok(HttpResponse { status, body })
        }
    }
}
