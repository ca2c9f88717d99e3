//! Transparent forwarding of `/api` traffic to the backend.
//!
//! [`outbound`] shapes the upstream request without doing any I/O;
//! [`Forwarder`] sends it and relays whatever comes back.

use axum::{
    body::{Body, HttpBody},
    http::{
        header::{self, HeaderName},
        HeaderMap, Method, StatusCode,
    },
    response::{IntoResponse, Response},
};
use reqwest::{redirect, Client, Url};

/// Headers that describe a single connection and must not cross the proxy.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("backend unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "proxy request failed");
        StatusCode::BAD_GATEWAY.into_response()
    }
}

/// Request line and headers for the upstream call. The body is streamed
/// separately by [`Forwarder::send`].
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

/// Shape the upstream request for an API call.
///
/// `upstream_path` is the request path with `/api` already removed. The method
/// passes through untouched; `host` is dropped so the target's own host is
/// used, along with hop-by-hop headers. `content-length` is kept, since the
/// body is relayed byte for byte.
pub fn outbound(
    method: Method,
    upstream_path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    backend: &Url,
) -> OutboundRequest {
    let mut forwarded = headers.clone();
    strip_connection_headers(&mut forwarded);
    forwarded.remove(header::HOST);

    OutboundRequest {
        method,
        url: upstream_url(backend, upstream_path, query),
        headers: forwarded,
    }
}

/// Join the backend base with the stripped path, keeping the incoming query.
pub fn upstream_url(backend: &Url, upstream_path: &str, query: Option<&str>) -> Url {
    let mut url = backend.clone();
    let base = backend.path().trim_end_matches('/');
    url.set_path(&format!("{base}{upstream_path}"));
    url.set_query(query);
    url
}

fn strip_connection_headers(headers: &mut HeaderMap) {
    // Headers named by `Connection` are connection-scoped too.
    let named: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in &named {
        headers.remove(name);
    }
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}

/// Sends [`OutboundRequest`]s with one shared connection pool.
#[derive(Clone)]
pub struct Forwarder {
    client: Client,
}

impl Forwarder {
    pub fn new() -> Result<Self, reqwest::Error> {
        // Redirects belong to the caller, not the proxy.
        let client = Client::builder().redirect(redirect::Policy::none()).build()?;
        Ok(Self { client })
    }

    /// Send `request` with `body` streamed upstream, and stream the backend's
    /// answer back.
    ///
    /// Status and end-to-end headers, `content-length` included, are relayed
    /// as received, so a `HEAD` answer keeps the length the backend reported.
    pub async fn send(&self, request: OutboundRequest, body: Body) -> Result<Response, ProxyError> {
        let mut upstream = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if !body.is_end_stream() {
            upstream = upstream.body(reqwest::Body::wrap_stream(body.into_data_stream()));
        }
        let upstream = upstream.send().await.map_err(ProxyError::Unreachable)?;

        let status = upstream.status();
        let mut headers = upstream.headers().clone();
        strip_connection_headers(&mut headers);

        let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
