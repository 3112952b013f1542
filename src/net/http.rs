//! HTTP collaborator: request building, bearer attachment, response decoding.
//!
//! Client-side (csr): real calls via `gloo-net`, raced against a
//! `gloo-timers` timeout. Host builds: [`FetchTransport`] reports a network
//! failure, and tests substitute their own [`HttpTransport`].
//!
//! ERROR HANDLING
//! ==============
//! Every failure leaves this module as an [`ApiError`]: non-JSON bodies,
//! non-2xx statuses, timeouts (408) and transport failures (0).

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;
use super::storage::KeyValueStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Fully resolved request handed to a transport.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

/// Sends one request and yields the decoded JSON body of a 2xx response.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError>;
}

#[async_trait(?Send)]
impl<T: HttpTransport + ?Sized> HttpTransport for Rc<T> {
    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        (**self).send(request).await
    }
}

/// Turn a raw response into a JSON value or a structured error.
///
/// # Errors
///
/// Returns [`ApiError::invalid_response`] for non-JSON content and
/// [`ApiError::from_body`] for non-2xx statuses.
pub fn decode_response(status: u16, content_type: Option<&str>, body: &str) -> Result<Value, ApiError> {
    if !content_type.is_some_and(|ct| ct.contains("application/json")) {
        return Err(ApiError::invalid_response(status));
    }
    let value: Value = serde_json::from_str(body).map_err(|_| ApiError::invalid_response(status))?;
    if !(200..300).contains(&status) {
        let err = ApiError::from_body(status, &value);
        log::error!("api error: status={} message={}", err.status, err.message);
        return Err(err);
    }
    Ok(value)
}

/// Typed front door over a transport, with the bearer token read from storage.
pub struct ApiClient<T, S> {
    transport: T,
    storage: S,
    base_url: String,
    token_key: String,
}

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    pub fn new(transport: T, storage: S, base_url: impl Into<String>, token_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { transport, storage, base_url, token_key: token_key.into() }
    }

    /// Build a request for `path`, attaching the stored bearer token if any.
    pub fn request(&self, method: Method, path: &str, query: &[(&str, String)], body: Option<Value>) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            query: query.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect(),
            body,
            bearer: self.storage.get(&self.token_key).filter(|t| !t.is_empty()),
        }
    }

    /// Send a prepared request and decode the body into `R`.
    ///
    /// # Errors
    ///
    /// Propagates transport errors; a 2xx body that does not match `R` is
    /// reported as an invalid response.
    pub async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R, ApiError> {
        log::debug!("api request: {:?} {}", request.method, request.url);
        let value = self.transport.send(request).await?;
        serde_json::from_value(value).map_err(|e| {
            log::error!("api response did not match expected shape: {e}");
            ApiError::invalid_response(200)
        })
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn get<R: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<R, ApiError> {
        self.send(self.request(Method::Get, path, query, None)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`]; also fails if `body` cannot be encoded.
    pub async fn post<R: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let body = encode_body(body)?;
        self.send(self.request(Method::Post, path, &[], Some(body))).await
    }

    /// `POST` without a body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn post_empty<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(self.request(Method::Post, path, &[], None)).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::post`].
    pub async fn put<R: DeserializeOwned, B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<R, ApiError> {
        let body = encode_body(body)?;
        self.send(self.request(Method::Put, path, &[], Some(body))).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::send`].
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.send(self.request(Method::Delete, path, &[], None)).await
    }
}

fn encode_body<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::client(format!("could not encode request: {e}")))
}

/// Browser `fetch` transport with a per-request timeout.
#[derive(Clone, Copy, Debug)]
pub struct FetchTransport {
    pub timeout_ms: u32,
}

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        #[cfg(feature = "csr")]
        {
            use futures::future::{Either, select};
            use gloo_net::http::Request;

            let builder = match request.method {
                Method::Get => Request::get(&request.url),
                Method::Post => Request::post(&request.url),
                Method::Put => Request::put(&request.url),
                Method::Delete => Request::delete(&request.url),
            };
            let mut builder = builder
                .query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
                .header("Content-Type", "application/json");
            if let Some(token) = &request.bearer {
                builder = builder.header("Authorization", &format!("Bearer {token}"));
            }
            let built = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            };
            let req = built.map_err(|e| {
                log::error!("failed to build request for {}: {e}", request.url);
                ApiError::network()
            })?;

            let sending = Box::pin(req.send());
            let timer = Box::pin(gloo_timers::future::TimeoutFuture::new(self.timeout_ms));
            let resp = match select(sending, timer).await {
                Either::Left((Ok(resp), _)) => resp,
                Either::Left((Err(e), _)) => {
                    log::error!("network error for {}: {e}", request.url);
                    return Err(ApiError::network());
                }
                Either::Right(_) => {
                    log::error!("request timed out after {}ms: {}", self.timeout_ms, request.url);
                    return Err(ApiError::timeout());
                }
            };

            let status = resp.status();
            let content_type = resp.headers().get("content-type");
            let body = resp.text().await.map_err(|_| ApiError::invalid_response(status))?;
            decode_response(status, content_type.as_deref(), &body)
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (request, self.timeout_ms);
            Err(ApiError::network())
        }
    }
}
