//! Scripted transport
//!
//! Maps API paths to queued responses. The last queued response for a path
//! repeats; unscripted paths answer 404. Every call is recorded with the
//! (tokio) time it was made.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tftc_collector::services::{ApiResponse, Transport};
use tftc_collector::FetchError;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct Call {
    pub path: String,
    pub at: Instant,
}

#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<ApiResponse>>>,
    calls: Mutex<Vec<Call>>,
}

/// Path and query of a URL (`/tft/...`)
fn path_of(url: &str) -> &str {
    url.find("/tft/").map(|start| &url[start..]).unwrap_or(url)
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue `response` for `path`
    pub fn respond(&self, path: impl Into<String>, response: ApiResponse) {
        self.routes
            .lock()
            .unwrap()
            .entry(path.into())
            .or_default()
            .push_back(response);
    }

    /// Queue a 200 carrying `body`
    pub fn respond_json(&self, path: impl Into<String>, body: &Value) {
        self.respond(path, ApiResponse::new(200, body.to_string()));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<ApiResponse, FetchError> {
        let path = path_of(url).to_string();
        self.calls.lock().unwrap().push(Call {
            path: path.clone(),
            at: Instant::now(),
        });

        let mut routes = self.routes.lock().unwrap();
        let response = match routes.get_mut(&path) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        Ok(response.unwrap_or_else(|| ApiResponse::new(404, "")))
    }
}
