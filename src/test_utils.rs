// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! In-memory Kubernetes API used by tests.
//!
//! Objects created through POST are stored under `<collection>/<name>` and served back on
//! GET. Scripted responses take precedence over stored objects and are consumed in order;
//! the last scripted response for a path keeps being returned. Every request is recorded.

use http::{Request, Response};
use http_body_util::BodyExt;
use k8s_openapi::api::core::v1::{ObjectReference, Secret, ServiceAccount};
use k8s_openapi::ByteString;
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::Client;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

type Key = (String, String);

#[derive(Default)]
struct State {
    objects: HashMap<String, Value>,
    scripted: HashMap<Key, VecDeque<(u16, String)>>,
    requests: Vec<Key>,
}

#[derive(Clone, Default)]
pub struct MockApiServer {
    state: Arc<Mutex<State>>,
}

impl MockApiServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object that already exists at `path`
    pub fn with_object(self, path: &str, object: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(path.to_string(), object);
        self
    }

    /// Queue a response for GET requests on the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.script("GET", path, status, body)
    }

    /// Queue a response for POST requests on the exact collection path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.script("POST", path, status, body)
    }

    fn script(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Build a kube Client backed by this server
    pub fn client(&self) -> Client {
        Client::new(self.clone(), "default")
    }

    /// All requests seen so far, as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    /// Collection paths of every POST seen so far
    pub fn creates(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|(m, _)| m == "POST")
            .map(|(_, p)| p)
            .collect()
    }

    pub fn object(&self, path: &str) -> Option<Value> {
        self.state.lock().unwrap().objects.get(path).cloned()
    }

    fn take_scripted(&self, key: &Key) -> Option<(u16, String)> {
        let mut state = self.state.lock().unwrap();
        let queue = state.scripted.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    fn handle(&self, method: &str, path: &str, body: &[u8]) -> (u16, String) {
        let key = (method.to_string(), path.to_string());
        self.state.lock().unwrap().requests.push(key.clone());

        let scripted = self.take_scripted(&key);

        match method {
            "GET" => {
                if let Some(resp) = scripted {
                    return resp;
                }
                match self.object(path) {
                    Some(obj) => (200, obj.to_string()),
                    None => (404, not_found_json(path)),
                }
            }
            "POST" => {
                let posted: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
                let (status, reply) = match scripted {
                    Some(resp) => resp,
                    None => (201, posted.to_string()),
                };
                if (200..300).contains(&status) {
                    let stored: Value = serde_json::from_str(&reply).unwrap_or(posted);
                    let name = stored["metadata"]["name"].as_str().unwrap_or_default();
                    let item = format!("{}/{}", path, name);
                    let mut state = self.state.lock().unwrap();
                    if state.objects.contains_key(&item) {
                        return (409, status_json(409, "AlreadyExists"));
                    }
                    state.objects.insert(item, stored);
                }
                (status, reply)
            }
            _ => (405, status_json(405, "MethodNotAllowed")),
        }
    }
}

impl Service<Request<Body>> for MockApiServer {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let server = self.clone();
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        Box::pin(async move {
            let body = req.into_body().collect().await?.to_bytes();
            let (status, reply) = server.handle(&method, &path, &body);
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(reply.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a mock namespace object
pub fn namespace_json(name: &str) -> Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Namespace",
        "metadata": {
            "name": name,
            "uid": "test-uid"
        }
    })
}

/// Create a service account object listing the given token secrets
pub fn service_account_json(namespace: &str, name: &str, secrets: &[&str]) -> Value {
    let sa = ServiceAccount {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        secrets: Some(
            secrets
                .iter()
                .map(|s| ObjectReference {
                    name: Some(s.to_string()),
                    ..Default::default()
                })
                .collect(),
        ),
        ..Default::default()
    };
    let mut value = serde_json::to_value(&sa).unwrap();
    value["apiVersion"] = "v1".into();
    value["kind"] = "ServiceAccount".into();
    value
}

/// Create a token secret; `token: None` leaves the token key unset
pub fn secret_json(namespace: &str, name: &str, token: Option<&str>) -> Value {
    let secret = Secret {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        data: token.map(|t| {
            BTreeMap::from([("token".to_string(), ByteString(t.as_bytes().to_vec()))])
        }),
        type_: Some("kubernetes.io/service-account-token".to_string()),
        ..Default::default()
    };
    let mut value = serde_json::to_value(&secret).unwrap();
    value["apiVersion"] = "v1".into();
    value["kind"] = "Secret".into();
    value
}

/// Create a Status failure body
pub fn status_json(code: u16, reason: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": reason,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(path: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("\"{}\" not found", path),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}
