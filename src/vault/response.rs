//! Secret-service response decoding.
//!
//! Two envelope shapes exist:
//!
//! ```text
//! Legacy (flat):
//!   { request_id, lease_id, renewable, lease_duration, data: <secret> }
//! Versioned (nested):
//!   { data: { request_id, lease_id, renewable, lease_duration, data: <secret> } }
//! ```
//!
//! The shape is chosen by the caller; nothing here sniffs the body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Secret response with its lease metadata.
///
/// `data` is whatever the service stored; the schema is caller-defined.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SecretResponseData {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub lease_duration: u64,
    pub data: serde_json::Value,
}

/// Which envelope shape a response body uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretShape {
    Legacy,
    Versioned,
}

impl SecretShape {
    pub fn from_legacy_flag(use_legacy_shape: bool) -> Self {
        if use_legacy_shape {
            SecretShape::Legacy
        } else {
            SecretShape::Versioned
        }
    }
}

/// A decoded envelope, tagged by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum SecretEnvelope {
    Legacy(SecretResponseData),
    Versioned(SecretResponseData),
}

#[derive(Deserialize)]
struct Nested {
    data: SecretResponseData,
}

impl SecretEnvelope {
    /// Decode `body` using the given shape.
    pub fn decode(body: &[u8], shape: SecretShape) -> Result<Self, serde_json::Error> {
        match shape {
            SecretShape::Legacy => serde_json::from_slice(body).map(SecretEnvelope::Legacy),
            SecretShape::Versioned => serde_json::from_slice::<Nested>(body)
                .map(|nested| SecretEnvelope::Versioned(nested.data)),
        }
    }

    pub fn shape(&self) -> SecretShape {
        match self {
            SecretEnvelope::Legacy(_) => SecretShape::Legacy,
            SecretEnvelope::Versioned(_) => SecretShape::Versioned,
        }
    }

    /// The response data, whichever shape carried it.
    pub fn into_data(self) -> SecretResponseData {
        match self {
            SecretEnvelope::Legacy(data) | SecretEnvelope::Versioned(data) => data,
        }
    }
}

/// Decode a secret body into its response data.
pub fn decode_secret(
    body: &[u8],
    shape: SecretShape,
) -> Result<SecretResponseData, serde_json::Error> {
    SecretEnvelope::decode(body, shape).map(SecretEnvelope::into_data)
}

/// Nested envelope returned whole, with a caller-chosen secret type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSecretEnvelope<T = serde_json::Value> {
    pub data: RawSecretData<T>,
}

/// Inner level of [`RawSecretEnvelope`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RawSecretData<T> {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub lease_duration: u64,
    pub data: T,
}

impl<T> RawSecretEnvelope<T> {
    /// The caller-typed secret content.
    pub fn into_secret(self) -> T {
        self.data.data
    }
}

/// Decode a body into the nested envelope without unwrapping it.
pub fn decode_raw<T: DeserializeOwned>(
    body: &[u8],
) -> Result<RawSecretEnvelope<T>, serde_json::Error> {
    serde_json::from_slice(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LEGACY: &str = r#"{"request_id":"r1","lease_id":"l1","renewable":true,
        "lease_duration":60,"data":{"k":"v"}}"#;
    const VERSIONED: &str = r#"{"data":{"request_id":"r2","lease_id":"l2","renewable":false,
        "lease_duration":30,"data":{"k":"v2"}}}"#;

    #[test]
    fn test_decode_legacy() {
        let data = decode_secret(LEGACY.as_bytes(), SecretShape::Legacy).unwrap();
        assert_eq!(data.request_id, "r1");
        assert_eq!(data.lease_id, "l1");
        assert!(data.renewable);
        assert_eq!(data.lease_duration, 60);
        assert_eq!(data.data, json!({"k": "v"}));
    }

    #[test]
    fn test_decode_versioned() {
        let envelope =
            SecretEnvelope::decode(VERSIONED.as_bytes(), SecretShape::Versioned).unwrap();
        assert_eq!(envelope.shape(), SecretShape::Versioned);

        let data = envelope.into_data();
        assert_eq!(data.request_id, "r2");
        assert!(!data.renewable);
        assert_eq!(data.data, json!({"k": "v2"}));
    }

    #[test]
    fn test_shape_mismatch_is_decode_error() {
        // a flat body has no nested `data.data`
        assert!(decode_secret(LEGACY.as_bytes(), SecretShape::Versioned).is_err());
        assert!(decode_secret(b"not json", SecretShape::Legacy).is_err());
    }

    #[test]
    fn test_opaque_payload_types() {
        let body = br#"{"request_id":"r","data":["a",1,null]}"#;
        let data = decode_secret(body, SecretShape::Legacy).unwrap();
        assert_eq!(data.data, json!(["a", 1, null]));
        assert_eq!(data.lease_id, "");
    }

    #[test]
    fn test_decode_raw_typed() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct LocalConfig {
            secret_user: String,
            secret_password: String,
        }

        let body = br#"{"data":{"data":{"secret_user":"svc","secret_password":"p455"}}}"#;
        let envelope: RawSecretEnvelope<LocalConfig> = decode_raw(body).unwrap();
        assert_eq!(envelope.data.request_id, "");
        assert_eq!(
            envelope.into_secret(),
            LocalConfig {
                secret_user: "svc".into(),
                secret_password: "p455".into(),
            }
        );
    }

    #[test]
    fn test_missing_lease_metadata_defaults() {
        let body = br#"{"data":{"data":{"k":"v"}}}"#;
        let data = decode_secret(body, SecretShape::Versioned).unwrap();
        assert_eq!(data.request_id, "");
        assert!(!data.renewable);
        assert_eq!(data.lease_duration, 0);
        assert_eq!(data.data, json!({"k": "v"}));

        assert!(decode_secret(br#"{"request_id":"r1"}"#, SecretShape::Legacy).is_err());
    }

    #[test]
    fn test_from_legacy_flag() {
        assert_eq!(SecretShape::from_legacy_flag(true), SecretShape::Legacy);
        assert_eq!(SecretShape::from_legacy_flag(false), SecretShape::Versioned);
    }
}
