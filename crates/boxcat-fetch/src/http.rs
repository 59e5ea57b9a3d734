use std::future::Future;
use std::time::Duration;

use bytes::Bytes;

/// The parts of an HTTP response the boxcat protocol looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status:       u16,
    pub content_type: Option<String>,
    pub body:         Bytes,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations must not follow redirects: a 301 carries protocol meaning.
/// Any error, including a timeout, is read by callers as "no response".
///
/// # Implementations
///
/// - [`ReqwestClient`]: production implementation using `reqwest`
/// - `MockHttpClient` (feature `mock`): canned responses for testing
pub trait HttpClient: Send + Sync {
    /// Error type for transport failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Issue a GET and buffer the whole response.
    fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> impl Future<Output = Result<HttpResponse, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::sync::OnceLock;

    use super::*;

    /// Production HTTP client implementation using reqwest.
    ///
    /// The underlying connection pool is created on first use. Clones start with
    /// their own, unestablished pool.
    #[derive(Default)]
    pub struct ReqwestClient {
        client: OnceLock<reqwest::Client>,
    }

    impl Clone for ReqwestClient {
        fn clone(&self) -> Self { Self::new() }
    }

    impl ReqwestClient {
        pub fn new() -> Self { Self::default() }

        fn client(&self) -> Result<&reqwest::Client, reqwest::Error> {
            if let Some(client) = self.client.get() {
                return Ok(client);
            }
            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?;
            Ok(self.client.get_or_init(|| client))
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(
            &self,
            url: &str,
            headers: &[(String, String)],
            timeout: Duration,
        ) -> Result<HttpResponse, Self::Error> {
            let mut request = self.client()?.get(url).timeout(timeout);
            for (key, value) in headers {
                request = request.header(key, value);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let body = response.bytes().await?;

            Ok(HttpResponse {
                status,
                content_type,
                body,
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
