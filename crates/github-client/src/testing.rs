//! Scripted transport for tests.
//!
//! Responses are registered per path (optionally per search `q`). Each
//! route plays its responses in order and keeps repeating the last one.

use crate::error::TransportError;
use crate::transport::{HttpResponse, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

type Scripted = Result<HttpResponse, TransportError>;

#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for every request to `path`.
    pub fn respond(&self, path: &str, response: HttpResponse) {
        self.push(path.to_string(), Ok(response));
    }

    /// Queue a JSON 200 response.
    pub fn respond_json(&self, path: &str, body: serde_json::Value) {
        self.respond(path, HttpResponse::new(200, body.to_string()));
    }

    /// Queue a response for requests to `path` whose `q` parameter is `query`.
    pub fn respond_query(&self, path: &str, query: &str, response: HttpResponse) {
        self.push(query_key(path, query), Ok(response));
    }

    /// Queue a transport error for `path`.
    pub fn fail(&self, path: &str, err: TransportError) {
        self.push(path.to_string(), Err(err));
    }

    /// Number of requests made to `path`, across all queries.
    pub fn calls(&self, path: &str) -> usize {
        self.calls.lock().iter().filter(|p| *p == path).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().len()
    }

    fn push(&self, key: String, scripted: Scripted) {
        self.routes.lock().entry(key).or_default().push_back(scripted);
    }

    fn next(&self, key: &str) -> Option<Scripted> {
        let mut routes = self.routes.lock();
        let queue = routes.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

fn query_key(path: &str, query: &str) -> String {
    format!("{}?q={}", path, query)
}

fn path_of(url: &str) -> &str {
    let after_scheme = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
    after_scheme
        .find('/')
        .map(|i| &after_scheme[i..])
        .unwrap_or("/")
}

#[async_trait]
impl Transport for FakeTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<HttpResponse, TransportError> {
        let path = path_of(url).to_string();
        self.calls.lock().push(path.clone());

        let by_query = query
            .iter()
            .find(|(k, _)| k == "q")
            .and_then(|(_, q)| self.next(&query_key(&path, q)));

        by_query
            .or_else(|| self.next(&path))
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "Not Found")))
    }
}
