use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};
use thorns_core::Error;
use url::Url;

use super::{Transport, TransportConfig};
use crate::endpoint::HttpRequest;

/// [`Transport`] backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }
}

/// Absolute URL for `req`; a `?` is added only when there are query pairs.
fn compose_url(req: &HttpRequest) -> Result<Url, Error> {
    let mut url = Url::parse(&req.url).map_err(|e| Error::Network(format!("invalid URL {}: {e}", req.url)))?;
    if !req.query.is_empty() {
        url.query_pairs_mut().extend_pairs(&req.query);
    }
    Ok(url)
}

fn map_send_error(url: &Url, err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(url.to_string())
    } else if err.is_redirect() {
        Error::Network(format!("too many redirects from {url}"))
    } else {
        Error::Network(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, req: &HttpRequest) -> Result<Bytes, Error> {
        let url = compose_url(req)?;

        tracing::debug!(url = %req, "Sending request");

        let response = self.http.get(url.clone()).send().await.map_err(|e| map_send_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus { status: status.as_u16(), url: url.to_string() });
        }

        response.bytes().await.map_err(|e| map_send_error(&url, e))
    }
}
