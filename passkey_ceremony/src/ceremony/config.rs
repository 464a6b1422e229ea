use std::env;

use url::Url;

use super::types::{CoseAlgorithm, SUPPORTED_ALGORITHMS, UserVerificationRequirement};
use crate::host::CeremonyHost;

pub const DEFAULT_TIMEOUT_MS: u32 = 60_000;
pub const DEFAULT_RP_NAME: &str = "My App";
const FALLBACK_RP_ID: &str = "localhost";

/// Caller-supplied configuration. Every field is optional.
///
/// Empty strings and a zero timeout count as not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CeremonyOptions {
    pub rp_id: Option<String>,
    pub rp_name: Option<String>,
    /// Milliseconds
    pub timeout: Option<u32>,
    pub user_verification: Option<UserVerificationRequirement>,
}

impl CeremonyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rp_id(mut self, rp_id: impl Into<String>) -> Self {
        self.rp_id = Some(rp_id.into());
        self
    }

    pub fn with_rp_name(mut self, rp_name: impl Into<String>) -> Self {
        self.rp_name = Some(rp_name.into());
        self
    }

    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    pub fn with_user_verification(mut self, user_verification: UserVerificationRequirement) -> Self {
        self.user_verification = Some(user_verification);
        self
    }

    /// Reads options from the process environment.
    ///
    /// - `PASSKEY_RP_ID`, or the host part of `ORIGIN` when unset
    /// - `PASSKEY_RP_NAME`
    /// - `PASSKEY_TIMEOUT` in seconds
    /// - `PASSKEY_USER_VERIFICATION`: `discouraged`, `preferred` or `required`
    ///
    /// Invalid values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`CeremonyOptions::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let rp_id = non_empty("PASSKEY_RP_ID")
            .or_else(|| non_empty("ORIGIN").and_then(|origin| rp_id_from_origin(&origin)));

        let timeout = non_empty("PASSKEY_TIMEOUT").and_then(|v| {
            match v.parse::<u32>().ok().and_then(|secs| secs.checked_mul(1000)) {
                Some(ms) if ms > 0 => Some(ms),
                _ => {
                    tracing::warn!("Invalid timeout: {}. Using default", v);
                    None
                }
            }
        });

        let user_verification = non_empty("PASSKEY_USER_VERIFICATION").and_then(|v| {
            v.parse::<UserVerificationRequirement>()
                .map_err(|e| tracing::warn!("{}. Using default", e))
                .ok()
        });

        Self {
            rp_id,
            rp_name: non_empty("PASSKEY_RP_NAME"),
            timeout,
            user_verification,
        }
    }
}

fn rp_id_from_origin(origin: &str) -> Option<String> {
    match Url::parse(origin) {
        Ok(url) => url.host_str().map(|host| host.to_string()),
        Err(e) => {
            tracing::warn!("Could not extract RP ID from ORIGIN {}: {}", origin, e);
            None
        }
    }
}

/// Resolved configuration, fixed for the lifetime of an orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CeremonyConfig {
    rp_id: String,
    rp_name: String,
    timeout: u32,
    user_verification: UserVerificationRequirement,
}

impl CeremonyConfig {
    /// Fills every unset option from the host or the built-in defaults.
    pub(crate) fn resolve<H>(options: CeremonyOptions, host: &H) -> Self
    where
        H: CeremonyHost + ?Sized,
    {
        let provided = |value: Option<String>| value.filter(|v| !v.is_empty());

        let rp_id = provided(options.rp_id)
            .or_else(|| provided(host.origin_hostname()))
            .unwrap_or_else(|| FALLBACK_RP_ID.to_string());

        let rp_name = provided(options.rp_name)
            .or_else(|| provided(host.document_title()))
            .unwrap_or_else(|| DEFAULT_RP_NAME.to_string());

        let timeout = options
            .timeout
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            rp_id,
            rp_name,
            timeout,
            user_verification: options.user_verification.unwrap_or_default(),
        }
    }

    pub fn rp_id(&self) -> &str {
        &self.rp_id
    }

    pub fn rp_name(&self) -> &str {
        &self.rp_name
    }

    /// Ceremony timeout in milliseconds.
    pub fn timeout(&self) -> u32 {
        self.timeout
    }

    pub fn user_verification(&self) -> UserVerificationRequirement {
        self.user_verification
    }

    /// Signature algorithms offered at registration, most preferred first.
    pub fn algorithms(&self) -> &'static [CoseAlgorithm] {
        &SUPPORTED_ALGORITHMS
    }
}
