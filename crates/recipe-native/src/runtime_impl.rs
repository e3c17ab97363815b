use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use recipe_core::error::{StoreError, TransportError};
use recipe_core::runtime::{HttpClient, HttpResponse, TimeProvider, TokenStore};
use serde::{Deserialize, Serialize};

/// Native HTTP client using reqwest
#[derive(Clone)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::new(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Non-2xx statuses are still responses; only the exchange itself can fail.
    async fn read(response: reqwest::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or_default();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::new(format!("Failed to read response body: {e}")))?;
        Ok(HttpResponse::new(status.as_u16(), reason, body))
    }
}

fn transport(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::new("Request to payment service timed out")
    } else if e.is_connect() {
        TransportError::new(format!("Could not reach payment service: {e}"))
    } else {
        TransportError::new(e.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        Self::read(response).await
    }

    async fn post_json(&self, url: &str, body: &str) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .await
            .map_err(transport)?;
        Self::read(response).await
    }
}

/// Native time provider using chrono
#[derive(Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now(&self) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc::now()
    }
}

/// Token slot that lives only as long as the process
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let token = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(token.clone())
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// On-disk shape of the persisted slot
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredToken {
    pub name: String,
    pub token: String,
    pub stored_at: String,
}

/// Token slot persisted as a small JSON file, so a session survives restarts.
///
/// A missing file is an empty slot.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    name: String,
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Option<StoredToken>, StoreError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let stored = serde_json::from_str(&json)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(Some(stored))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .read()?
            .map(|stored| stored.token)
            .filter(|token| !token.is_empty()))
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredToken {
            name: self.name.clone(),
            token: token.to_string(),
            stored_at: chrono::Utc::now().to_rfc3339(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| StoreError::Corrupt(format!("Failed to serialize token: {e}")))?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.store("abc").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("abc"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_system_time_is_recent() {
        // 2023-11-14
        assert!(SystemTimeProvider.unix_timestamp() > 1_700_000_000);
        assert!(SystemTimeProvider.unix_timestamp_millis() > 1_700_000_000_000);
    }
}
