use crate::error::StoreError;

/// The single persisted slot holding the session token (a cookie in the browser).
///
/// Scope and expiry of the slot are the host's business.
pub trait TokenStore: Send + Sync {
    /// Current slot contents. An empty string is reported as `None`.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the slot contents
    fn store(&self, token: &str) -> Result<(), StoreError>;

    /// Empty the slot
    fn clear(&self) -> Result<(), StoreError>;
}

impl<S: TokenStore + ?Sized> TokenStore for std::sync::Arc<S> {
    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn store(&self, token: &str) -> Result<(), StoreError> {
        (**self).store(token)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
