//! Connection settings for the Firebase project backing remote mode.

use crate::error::{SodapopError, SodapopResult};

const API_KEY: &str = "FIREBASE_API_KEY";
const AUTH_DOMAIN: &str = "FIREBASE_AUTH_DOMAIN";
const PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
const STORAGE_BUCKET: &str = "FIREBASE_STORAGE_BUCKET";
const MESSAGING_SENDER_ID: &str = "FIREBASE_MESSAGING_SENDER_ID";
const APP_ID: &str = "FIREBASE_APP_ID";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
}

impl FirebaseConfig {
    pub fn from_env() -> SodapopResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read every key through `lookup`. Absent or blank keys are all
    /// reported together, in a fixed order.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> SodapopResult<Self> {
        let mut missing = Vec::new();
        let mut read = |key: &str| match lookup(key).filter(|v| !v.trim().is_empty()) {
            Some(value) => value,
            None => {
                missing.push(key.to_string());
                String::new()
            }
        };

        let config = FirebaseConfig {
            api_key: read(API_KEY),
            auth_domain: read(AUTH_DOMAIN),
            project_id: read(PROJECT_ID),
            storage_bucket: read(STORAGE_BUCKET),
            messaging_sender_id: read(MESSAGING_SENDER_ID),
            app_id: read(APP_ID),
        };

        if !missing.is_empty() {
            return Err(SodapopError::MissingConfig(missing));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete() -> HashMap<&'static str, String> {
        [
            API_KEY,
            AUTH_DOMAIN,
            PROJECT_ID,
            STORAGE_BUCKET,
            MESSAGING_SENDER_ID,
            APP_ID,
        ]
        .into_iter()
        .map(|key| (key, format!("{key}-value")))
        .collect()
    }

    #[test]
    fn reads_every_key() {
        let vars = complete();
        let config = FirebaseConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

        assert_eq!(config.project_id, "FIREBASE_PROJECT_ID-value");
        assert_eq!(config.app_id, "FIREBASE_APP_ID-value");
    }

    #[test]
    fn one_missing_key_is_named() {
        let mut vars = complete();
        vars.remove(PROJECT_ID);

        let err = FirebaseConfig::from_lookup(|key| vars.get(key).cloned()).unwrap_err();

        assert!(matches!(&err, SodapopError::MissingConfig(keys) if keys == &["FIREBASE_PROJECT_ID"]));
        assert_eq!(
            err.to_string(),
            "Missing required Firebase configuration keys: FIREBASE_PROJECT_ID"
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut vars = complete();
        vars.insert(API_KEY, "  ".into());
        vars.remove(APP_ID);

        let err = FirebaseConfig::from_lookup(|key| vars.get(key).cloned()).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required Firebase configuration keys: FIREBASE_API_KEY, FIREBASE_APP_ID"
        );
    }
}
