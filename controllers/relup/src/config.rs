//! Controller configuration loaded from environment variables.

use crate::error::ControllerError;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_CONCURRENCY: u16 = 3;
const DEFAULT_DEBOUNCE_SECS: u64 = 1;
const DEFAULT_BACKOFF_MIN_SECS: u64 = 5;
const DEFAULT_BACKOFF_MAX_SECS: u64 = 300;

/// Runtime configuration for the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Namespace to watch; `None` watches all namespaces
    pub namespace: Option<String>,
    /// Maximum number of keys reconciled in parallel
    pub concurrency: u16,
    /// Quiet period the dispatcher waits for before reconciling a key
    pub debounce: Duration,
    /// First retry delay after a failed reconcile
    pub backoff_min: Duration,
    /// Upper bound for retry delays
    pub backoff_max: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            concurrency: DEFAULT_CONCURRENCY,
            debounce: Duration::from_secs(DEFAULT_DEBOUNCE_SECS),
            backoff_min: Duration::from_secs(DEFAULT_BACKOFF_MIN_SECS),
            backoff_max: Duration::from_secs(DEFAULT_BACKOFF_MAX_SECS),
        }
    }
}

impl ControllerConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ControllerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ControllerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let namespace = lookup("WATCH_NAMESPACE").filter(|ns| !ns.trim().is_empty());
        let concurrency = parse_or(&lookup, "RECONCILE_CONCURRENCY", DEFAULT_CONCURRENCY)?;
        let debounce_secs = parse_or(&lookup, "RECONCILE_DEBOUNCE_SECS", DEFAULT_DEBOUNCE_SECS)?;
        let backoff_min_secs =
            parse_or(&lookup, "RECONCILE_BACKOFF_MIN_SECS", DEFAULT_BACKOFF_MIN_SECS)?;
        let backoff_max_secs =
            parse_or(&lookup, "RECONCILE_BACKOFF_MAX_SECS", DEFAULT_BACKOFF_MAX_SECS)?;

        if concurrency == 0 {
            return Err(ControllerError::InvalidConfig(
                "RECONCILE_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if backoff_min_secs == 0 || backoff_min_secs > backoff_max_secs {
            return Err(ControllerError::InvalidConfig(format!(
                "RECONCILE_BACKOFF_MIN_SECS ({backoff_min_secs}) must be between 1 and RECONCILE_BACKOFF_MAX_SECS ({backoff_max_secs})"
            )));
        }

        Ok(Self {
            namespace,
            concurrency,
            debounce: Duration::from_secs(debounce_secs),
            backoff_min: Duration::from_secs(backoff_min_secs),
            backoff_max: Duration::from_secs(backoff_max_secs),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ControllerError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e| {
            ControllerError::InvalidConfig(format!("{key}={raw:?} is not valid: {e}"))
        }),
    }
}
