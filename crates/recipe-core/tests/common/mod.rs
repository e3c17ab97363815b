//! Shared test doubles for the runtime seams
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use recipe_core::error::{StoreError, TransportError};
use recipe_core::runtime::{HttpClient, HttpResponse, TimeProvider, TokenStore};
use tokio::sync::Notify;

/// A request as the mock transport saw it
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub body: Option<String>,
}

#[derive(Default)]
struct Inner {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<Recorded>>,
    gate: Mutex<Option<Gate>>,
}

#[derive(Clone)]
pub struct Gate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

/// Scripted HTTP transport: answers requests from a queue, in order.
#[derive(Clone, Default)]
pub struct MockHttp {
    inner: Arc<Inner>,
}

impl MockHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, reason: &str, body: &str) -> &Self {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(Ok(HttpResponse::new(status, reason, body)));
        self
    }

    pub fn fail(&self, message: &str) -> &Self {
        self.inner
            .responses
            .lock()
            .unwrap()
            .push_back(Err(TransportError::new(message)));
        self
    }

    /// Hold every request until `release` is notified, signalling `entered` first.
    pub fn gated(&self) -> Gate {
        let gate = Gate {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        };
        *self.inner.gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.inner.requests.lock().unwrap().clone()
    }

    async fn answer(&self, recorded: Recorded) -> Result<HttpResponse, TransportError> {
        self.inner.requests.lock().unwrap().push(recorded);

        let gate = self.inner.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.inner
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

#[async_trait]
impl HttpClient for MockHttp {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.answer(Recorded {
            method: "GET",
            url: url.to_string(),
            body: None,
        })
        .await
    }

    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        self.answer(Recorded {
            method: "POST",
            url: url.to_string(),
            body: Some(body.to_string()),
        })
        .await
    }
}

/// Clock stuck at one instant
#[derive(Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    pub fn at_millis(millis: i64) -> Self {
        Self(Utc.timestamp_millis_opt(millis).unwrap())
    }
}

impl TimeProvider for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// In-memory token slot that can also be poked from the outside
#[derive(Clone, Default)]
pub struct SharedSlot(Arc<Mutex<Option<String>>>);

impl SharedSlot {
    pub fn set_raw(&self, value: &str) {
        *self.0.lock().unwrap() = Some(value.to_string());
    }
}

impl TokenStore for SharedSlot {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.0.lock().unwrap().clone().filter(|t| !t.is_empty()))
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        *self.0.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}

/// Slot whose backing storage is unavailable
pub struct BrokenSlot;

impl TokenStore for BrokenSlot {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Err(StoreError::Corrupt("unreadable".to_string()))
    }

    fn store(&self, _token: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        )))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
