//! In-memory HTTP client for unit tests

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{Product, QueryParams};

use crate::{ClientError, ClientResult, HttpClient};

/// Canned answer for one route
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(Value),
    /// 204 No Content
    Empty,
    Error { status: u16, message: String },
}

impl MockReply {
    pub fn json(value: impl Serialize) -> Self {
        Self::Json(serde_json::to_value(value).expect("serializable reply"))
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self::Error {
            status,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    pub fn query_string(&self) -> String {
        let mut params = QueryParams::new();
        for (key, value) in &self.query {
            params.push(*key, value.clone());
        }
        params.to_query_string()
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(&'static str, String), VecDeque<MockReply>>,
    requests: Vec<RecordedRequest>,
}

/// Routes are answered in registration order; the last reply of a route
/// repeats forever.
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    state: Arc<Mutex<MockState>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, method: &'static str, path: &str, reply: MockReply) {
        let mut state = self.state.lock().unwrap();
        state
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn record(
        &self,
        method: &'static str,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
    ) -> MockReply {
        let mut state = self.state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method,
            path: path.to_string(),
            query: query.to_vec(),
            body,
        });
        match state.routes.get_mut(&(method, path.to_string())) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => MockReply::error(404, &format!("no route for {method} {path}")),
        }
    }

    fn required<T: DeserializeOwned>(reply: MockReply) -> ClientResult<T> {
        match Self::optional(reply)? {
            Some(value) => Ok(value),
            None => Err(ClientError::InvalidResponse("empty body".into())),
        }
    }

    fn optional<T: DeserializeOwned>(reply: MockReply) -> ClientResult<Option<T>> {
        match reply {
            MockReply::Json(value) => Ok(Some(serde_json::from_value(value)?)),
            MockReply::Empty => Ok(None),
            MockReply::Error { status, message } => Err(ClientError::api(status, message)),
        }
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ClientResult<T> {
        Self::required(self.record("GET", path, query, None))
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        Self::required(self.record("POST", path, &[], Some(body)))
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let body = serde_json::to_value(body)?;
        Self::required(self.record("PUT", path, &[], Some(body)))
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        Self::optional(self.record("POST", path, &[], None))
    }

    async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<Option<T>> {
        Self::optional(self.record("PUT", path, &[], None))
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        Self::optional::<Value>(self.record("DELETE", path, &[], None)).map(|_| ())
    }
}

pub fn sample_product(id: i64, name: &str, in_stock: u32) -> Product {
    Product {
        id,
        name: name.to_string(),
        category: "general".to_string(),
        unit_price: 1.5,
        expiration_date: None,
        in_stock,
        created_at: None,
        updated_at: None,
    }
}
