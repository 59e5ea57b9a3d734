use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::{HttpClient, HttpResponse};

/// A request seen by [`MockHttpClient`].
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub url:     String,
    pub headers: Vec<(String, String)>,
    pub timeout: Duration,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no response for {url}")]
pub struct MockNoResponse {
    pub url: String,
}

#[derive(Default)]
struct MockState {
    routes:   HashMap<String, HttpResponse>,
    requests: Vec<RecordedRequest>,
}

/// In-memory [`HttpClient`] with canned responses keyed by request path.
///
/// Clones share routes and the request log. Unrouted paths get no response.
#[derive(Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self { Self::default() }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer requests whose URL ends with `path`.
    pub fn respond(&self, path: impl Into<String>, response: HttpResponse) -> &Self {
        self.state().routes.insert(path.into(), response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> { self.state().requests.clone() }

    pub fn request_count(&self) -> usize { self.state().requests.len() }
}

impl HttpClient for MockHttpClient {
    type Error = MockNoResponse;

    async fn get(
        &self,
        url: &str,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<HttpResponse, Self::Error> {
        let mut state = self.state();
        state.requests.push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
            timeout,
        });
        state
            .routes
            .iter()
            .find(|(path, _)| url.ends_with(path.as_str()))
            .map(|(_, response)| response.clone())
            .ok_or_else(|| MockNoResponse {
                url: url.to_string(),
            })
    }
}
