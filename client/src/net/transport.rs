//! `gloo-net` implementation of the session [`Transport`].
//!
//! ERROR HANDLING
//! ==============
//! Each request races a `gloo-timers` sleep of the configured timeout; the
//! loser is dropped, which aborts the fetch future. Fetch failures map to
//! [`ApiError::Network`] and the timer winning maps to [`ApiError::Timeout`].

use std::future::Future;

use futures::future::{Either, select};
use gloo_net::http::{Method as GlooMethod, RequestBuilder};
use hotelsocial_session::http::RequestBody;
use hotelsocial_session::{ApiConfig, ApiError, HttpRequest, HttpResponse, Method, Transport};

/// Browser `fetch` transport.
#[derive(Clone, Debug)]
pub struct GlooTransport {
    config: ApiConfig,
}

impl GlooTransport {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }
}

impl Transport for GlooTransport {
    fn send(&self, request: &HttpRequest) -> impl Future<Output = Result<HttpResponse, ApiError>> {
        let url = self.config.url(&request.path);
        let timeout = self.config.timeout;
        let request = request.clone();
        async move {
            let fetch = Box::pin(fetch(url, request));
            let timer = Box::pin(gloo_timers::future::sleep(timeout));
            match select(fetch, timer).await {
                Either::Left((result, _)) => result,
                Either::Right(((), _)) => {
                    leptos::logging::warn!("request timed out after {}s", timeout.as_secs());
                    Err(ApiError::Timeout)
                }
            }
        }
    }
}

fn gloo_method(method: Method) -> GlooMethod {
    match method {
        Method::Get => GlooMethod::GET,
        Method::Post => GlooMethod::POST,
        Method::Put => GlooMethod::PUT,
        Method::Delete => GlooMethod::DELETE,
    }
}

fn network(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

fn js_error(err: wasm_bindgen::JsValue) -> ApiError {
    ApiError::InvalidRequest(format!("{err:?}"))
}

fn multipart(
    field: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(js_error)?;
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(content_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
        .map_err(js_error)?;
    form.append_with_blob_and_filename(field, &blob, file_name)
        .map_err(js_error)?;
    Ok(form)
}

async fn fetch(url: String, request: HttpRequest) -> Result<HttpResponse, ApiError> {
    let mut builder = RequestBuilder::new(&url)
        .method(gloo_method(request.method))
        .query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let prepared = match &request.body {
        RequestBody::Empty => builder.build(),
        RequestBody::Json(value) => builder.json(value),
        RequestBody::Multipart {
            field,
            file_name,
            content_type,
            bytes,
        } => builder.body(multipart(field, file_name, content_type, bytes)?),
    }
    .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let response = prepared.send().await.map_err(network)?;
    let status = response.status();
    let body = response.text().await.map_err(network)?;
    Ok(HttpResponse { status, body })
}
