//! Session adapter
//!
//! Authentication state is derived from the single token slot. The current-user
//! value is a projection of that token: it remembers which token it was computed
//! from and is recomputed whenever the slot holds something else, so a token
//! written by another party can never leave a stale user behind.

pub mod claims;

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::runtime::TokenStore;

pub use claims::Claims;

/// Identity derived from the stored token
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub user_id: Option<String>,
    pub claims: Claims,
    /// User data handed to [`Session::login`] alongside this token
    pub profile: Option<Value>,
}

struct Projection {
    token: String,
    claims: Option<Claims>,
    profile: Option<Value>,
}

impl Projection {
    fn compute(token: String, profile: Option<Value>) -> Self {
        let claims = match Claims::decode(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!("Session token could not be decoded: {e}");
                None
            }
        };
        Self {
            token,
            claims,
            profile,
        }
    }

    fn current_user(&self) -> Option<CurrentUser> {
        let claims = self.claims.clone()?;
        Some(CurrentUser {
            user_id: claims.user_id(),
            claims,
            profile: self.profile.clone(),
        })
    }
}

/// Owns the token slot and everything derived from it.
pub struct Session<S: TokenStore> {
    store: S,
    projection: Mutex<Option<Projection>>,
}

impl<S: TokenStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            projection: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Raw bearer token, if any
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("Failed to read session token, treating as signed out: {e}");
                None
            }
        }
    }

    /// True iff the slot holds a token. Presence only, no validity check.
    pub fn is_authenticated(&self) -> bool {
        let authenticated = self.token().is_some();
        debug!(authenticated, "Checked authentication");
        authenticated
    }

    pub fn claims(&self) -> Option<Claims> {
        self.with_projection(|p| p.claims.clone()).flatten()
    }

    /// `x-hasura-user-id` of the signed-in user, or `None` for any failure
    pub fn user_id(&self) -> Option<String> {
        let user_id = self.claims().and_then(|c| c.user_id());
        if user_id.is_none() {
            debug!("No user id available from session token");
        }
        user_id
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.with_projection(Projection::current_user).flatten()
    }

    /// Store a server-issued token and eagerly decode it.
    ///
    /// An empty token signs the session out.
    pub fn login(
        &self,
        token: &str,
        profile: Option<Value>,
    ) -> Result<Option<CurrentUser>, StoreError> {
        if token.is_empty() {
            self.replace_token(None, None)?;
            return Ok(None);
        }

        debug!(token_len = token.len(), "Storing session token");
        self.replace_token(Some(token), profile)?;

        let user = self.current_user();
        info!(
            user_id = user.as_ref().and_then(|u| u.user_id.as_deref()),
            "Signed in"
        );
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), StoreError> {
        self.replace_token(None, None)?;
        info!("Signed out");
        Ok(())
    }

    /// The only place the slot and the projection are written.
    fn replace_token(&self, token: Option<&str>, profile: Option<Value>) -> Result<(), StoreError> {
        let mut projection = self.lock();
        match token {
            Some(token) => {
                self.store.store(token)?;
                *projection = Some(Projection::compute(token.to_string(), profile));
            }
            None => {
                self.store.clear()?;
                *projection = None;
            }
        }
        Ok(())
    }

    /// Run `f` against the projection of the token currently in the slot,
    /// recomputing it first if the slot changed underneath us.
    fn with_projection<R>(&self, f: impl FnOnce(&Projection) -> R) -> Option<R> {
        let mut projection = self.lock();

        let Some(token) = self.token() else {
            *projection = None;
            return None;
        };

        let fresh = match projection.take() {
            Some(p) if p.token == token => p,
            _ => Projection::compute(token, None),
        };
        let result = f(&fresh);
        *projection = Some(fresh);
        Some(result)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Projection>> {
        self.projection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use std::sync::Arc;

    #[derive(Default)]
    struct Slot(Mutex<Option<String>>);

    impl TokenStore for Slot {
        fn load(&self) -> Result<Option<String>, StoreError> {
            Ok(self.0.lock().unwrap().clone())
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

    fn token_for(user_id: &str) -> String {
        let payload = format!(
            r#"{{"https://hasura.io/jwt/claims":{{"x-hasura-user-id":"{user_id}"}}}}"#
        );
        format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn test_projection_follows_external_writes() {
        let slot = Arc::new(Slot::default());
        let session = Session::new(slot.clone());

        session
            .login(&token_for("1"), Some(serde_json::json!({"username": "abebe"})))
            .unwrap();
        let user = session.current_user().unwrap();
        assert_eq!(user.user_id.as_deref(), Some("1"));
        assert_eq!(user.profile, Some(serde_json::json!({"username": "abebe"})));

        // Another writer replaces the cookie; the profile belonged to the old token.
        slot.store(&token_for("2")).unwrap();
        let user = session.current_user().unwrap();
        assert_eq!(user.user_id.as_deref(), Some("2"));
        assert_eq!(user.profile, None);

        slot.clear().unwrap();
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_empty_login_signs_out() {
        let session = Session::new(Slot::default());
        session.login(&token_for("1"), None).unwrap();
        assert!(session.is_authenticated());

        assert_eq!(session.login("", None).unwrap(), None);
        assert!(!session.is_authenticated());
        assert_eq!(session.store().load().unwrap(), None);
    }

    #[test]
    fn test_empty_slot_value_is_unauthenticated() {
        let slot = Slot::default();
        slot.store("").unwrap();
        let session = Session::new(slot);
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(session.user_id(), None);
    }
}
