// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles: an in-memory resource store and a mock Kubernetes API service.

use crate::store::{ResourceStore, StoreError, StoredResource};
use crate::types::{NginxOperator, NginxOperatorSpec};
use http::{Request, Response};
use kube::api::ObjectMeta;
use kube::client::Body;
use kube::{Client, Resource, ResourceExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;

/// The record most tests converge: `web/demo`, 2 replicas of nginx:1.21 on demo.example.com
pub fn demo_record() -> NginxOperator {
    NginxOperator {
        metadata: ObjectMeta {
            name: Some("demo".to_string()),
            namespace: Some("web".to_string()),
            uid: Some("demo-uid".to_string()),
            ..Default::default()
        },
        spec: NginxOperatorSpec {
            replicas: 2,
            image: "nginx:1.21".to_string(),
            host: "demo.example.com".to_string(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Get,
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: Op,
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

/// Failure injected for an operation on a kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unavailable,
    Conflict,
}

type Key = (String, String, String);

#[derive(Default)]
struct Inner {
    objects: BTreeMap<Key, serde_json::Value>,
    calls: Vec<Call>,
    failures: Vec<(Op, String, Failure)>,
    next_version: u64,
}

impl Inner {
    fn bump(&mut self) -> String {
        self.next_version += 1;
        self.next_version.to_string()
    }

    fn record(&mut self, op: Op, key: &Key) -> Result<(), StoreError> {
        self.calls.push(Call {
            op,
            kind: key.0.clone(),
            namespace: key.1.clone(),
            name: key.2.clone(),
        });

        match self
            .failures
            .iter()
            .find(|(o, kind, _)| *o == op && *kind == key.0)
            .map(|(_, _, f)| *f)
        {
            Some(Failure::Unavailable) => Err(StoreError::Unavailable("injected failure".into())),
            Some(Failure::Conflict) => Err(StoreError::Conflict("injected conflict".to_string())),
            None => Ok(()),
        }
    }

    fn put<K: StoredResource>(&mut self, key: Key, mut resource: K, uid: Option<String>) -> Result<K, StoreError> {
        let version = self.bump();
        let meta = resource.meta_mut();
        meta.resource_version = Some(version.clone());
        if meta.uid.is_none() {
            meta.uid = uid.or_else(|| Some(format!("uid-{}", version)));
        }
        let value = serde_json::to_value(&resource)
            .map_err(|e| StoreError::Unavailable(Box::new(e)))?;
        self.objects.insert(key, value);
        Ok(resource)
    }
}

/// In-memory store keyed by kind, namespace and name.
///
/// Writes assign a uid and a fresh resourceVersion; an update carrying a stale
/// resourceVersion fails with a conflict.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

fn key_of<K: StoredResource>(namespace: &str, name: &str) -> Key {
    (K::kind(&()).to_string(), namespace.to_string(), name.to_string())
}

fn key_for<K: StoredResource>(resource: &K) -> Key {
    key_of::<K>(&resource.namespace().unwrap_or_default(), &resource.name_any())
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a resource without recording a call
    pub fn insert<K: StoredResource>(&self, resource: K) -> K {
        let key = key_for(&resource);
        let mut inner = self.inner.lock().unwrap();
        inner.put(key, resource, None).unwrap()
    }

    /// Replace a stored resource behind the driver's back, as another writer would
    pub fn overwrite<K: StoredResource>(&self, mut resource: K) -> K {
        resource.meta_mut().resource_version = None;
        self.insert(resource)
    }

    pub fn remove<K: StoredResource>(&self, namespace: &str, name: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.objects.remove(&key_of::<K>(namespace, name));
    }

    pub fn stored<K: StoredResource>(&self, namespace: &str, name: &str) -> Option<K> {
        let inner = self.inner.lock().unwrap();
        inner
            .objects
            .get(&key_of::<K>(namespace, name))
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Recorded creates and updates
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| c.op != Op::Get).collect()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Make every `op` on `kind` fail until [`MemoryStore::heal`] is called
    pub fn fail(&self, op: Op, kind: &str, failure: Failure) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .push((op, kind.to_string(), failure));
    }

    pub fn heal(&self) {
        self.inner.lock().unwrap().failures.clear();
    }
}

impl ResourceStore for MemoryStore {
    async fn get<K: StoredResource>(&self, namespace: &str, name: &str) -> Result<K, StoreError> {
        let key = key_of::<K>(namespace, name);
        let mut inner = self.inner.lock().unwrap();
        inner.record(Op::Get, &key)?;

        let value = inner.objects.get(&key).cloned().ok_or(StoreError::NotFound)?;
        serde_json::from_value(value).map_err(|e| StoreError::Unavailable(Box::new(e)))
    }

    async fn create<K: StoredResource>(&self, resource: &K) -> Result<K, StoreError> {
        let key = key_for(resource);
        let mut inner = self.inner.lock().unwrap();
        inner.record(Op::Create, &key)?;

        if inner.objects.contains_key(&key) {
            return Err(StoreError::AlreadyExists(format!("{} {} already exists", key.0, key.2)));
        }
        inner.put(key, resource.clone(), None)
    }

    async fn update<K: StoredResource>(&self, resource: &K) -> Result<K, StoreError> {
        let key = key_for(resource);
        let mut inner = self.inner.lock().unwrap();
        inner.record(Op::Update, &key)?;

        let stored = inner.objects.get(&key).ok_or(StoreError::NotFound)?;
        let stored_version = stored["metadata"]["resourceVersion"].as_str().map(str::to_string);
        let stored_uid = stored["metadata"]["uid"].as_str().map(str::to_string);

        if let Some(version) = resource.resource_version() {
            if Some(&version) != stored_version.as_ref() {
                return Err(StoreError::Conflict(format!(
                    "{} {} was modified (have {}, stored {:?})",
                    key.0, key.2, version, stored_version
                )));
            }
        }
        inner.put(key, resource.clone(), stored_uid)
    }
}

/// A mock HTTP service that returns predefined responses based on request paths.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
        self
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for POST requests matching the exact path
    pub fn on_post(self, path: &str, status: u16, body: &str) -> Self {
        self.on("POST", path, status, body)
    }

    /// Add a response for PUT requests matching the exact path
    pub fn on_put(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PUT", path, status, body)
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let responses = self.responses.lock().unwrap();
        responses
            .get(&(method.to_string(), path.to_string()))
            .cloned()
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, status_json(404, "NotFound", "not found")));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Create a Kubernetes Status failure body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}
