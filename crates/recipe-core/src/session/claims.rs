//! Claims carried in the session JWT
//!
//! The signature is never checked here: the token gates client-side state only,
//! the backend does the real verification.

use base64::alphabet;
use base64::engine::general_purpose::GeneralPurpose;
use base64::engine::{DecodePaddingMode, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// Namespace of the identity-provider claims object inside the payload
pub const HASURA_CLAIMS_NAMESPACE: &str = "https://hasura.io/jwt/claims";
pub const HASURA_USER_ID: &str = "x-hasura-user-id";
pub const HASURA_DEFAULT_ROLE: &str = "x-hasura-default-role";
pub const HASURA_ALLOWED_ROLES: &str = "x-hasura-allowed-roles";

/// base64url, padding optional
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decoded JWT payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    raw: Map<String, Value>,
}

impl Claims {
    /// Decode the middle segment of a compact JWT.
    pub fn decode(token: &str) -> Result<Self, DecodeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(DecodeError::Empty);
        }

        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 {
            return Err(DecodeError::Segments(segments.len()));
        }

        // Accept the standard alphabet too; hosts do not always re-encode.
        let payload = segments[1].replace('+', "-").replace('/', "_");
        let bytes = URL_SAFE_LENIENT
            .decode(payload.as_bytes())
            .map_err(|e| DecodeError::Base64(e.to_string()))?;

        let value: Value =
            serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;

        match value {
            Value::Object(raw) => Ok(Self { raw }),
            other => Err(DecodeError::Json(format!(
                "expected an object, found {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn from_map(raw: Map<String, Value>) -> Self {
        Self { raw }
    }

    /// Any claim by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn subject(&self) -> Option<&str> {
        self.raw.get("sub").and_then(Value::as_str)
    }

    pub fn issuer(&self) -> Option<&str> {
        self.raw.get("iss").and_then(Value::as_str)
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.timestamp("exp")
    }

    pub fn issued_at(&self) -> Option<i64> {
        self.timestamp("iat")
    }

    pub fn not_before(&self) -> Option<i64> {
        self.timestamp("nbf")
    }

    /// True once `exp` has passed. Tokens without `exp` never expire here.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }

    /// The nested Hasura claims object, if present and an object
    pub fn hasura(&self) -> Option<&Map<String, Value>> {
        self.raw.get(HASURA_CLAIMS_NAMESPACE).and_then(Value::as_object)
    }

    /// `x-hasura-user-id` from the nested claims. Empty ids count as absent.
    pub fn user_id(&self) -> Option<String> {
        match self.hasura()?.get(HASURA_USER_ID)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn default_role(&self) -> Option<&str> {
        self.hasura()?.get(HASURA_DEFAULT_ROLE).and_then(Value::as_str)
    }

    pub fn allowed_roles(&self) -> Vec<String> {
        self.hasura()
            .and_then(|h| h.get(HASURA_ALLOWED_ROLES))
            .and_then(Value::as_array)
            .map(|roles| {
                roles
                    .iter()
                    .filter_map(|r| r.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn timestamp(&self, name: &str) -> Option<i64> {
        let value = self.raw.get(name)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
