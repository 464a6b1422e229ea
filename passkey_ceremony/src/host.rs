//! Boundary to the platform that actually runs a ceremony.
//!
//! The orchestrator never talks to an authenticator itself. Everything it
//! needs from the environment goes through [`CeremonyHost`], so a browser
//! bridge, a native platform API or a scripted test double can sit behind it.

use async_trait::async_trait;
use thiserror::Error;

use crate::ceremony::{
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, PublicKeyCredential,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions,
};

/// Presence flags for the pieces of the credential API a host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostCapabilities {
    /// The public-key credential type marker exists
    pub public_key_credential: bool,
    /// A credentials container (credential management) exists
    pub credentials_container: bool,
    /// The container exposes the creation primitive
    pub create: bool,
    /// The container exposes the request primitive
    pub get: bool,
    /// The platform-authenticator availability query exists
    pub platform_authenticator_query: bool,
}

impl HostCapabilities {
    /// A host exposing every capability.
    pub fn full() -> Self {
        Self {
            public_key_credential: true,
            credentials_container: true,
            create: true,
            get: true,
            platform_authenticator_query: true,
        }
    }

    /// A host exposing nothing at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether both ceremonies can be invoked on this host.
    pub fn supports_ceremonies(&self) -> bool {
        self.public_key_credential && self.credentials_container && self.create && self.get
    }
}

/// Failure categories a host reports for a ceremony.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostErrorKind {
    /// The user dismissed the prompt or the host timed it out
    NotAllowed,
    /// The requested operation or parameters are not supported
    NotSupported,
    /// The request violated the host's security policy (e.g. rpId mismatch)
    Security,
    /// The authenticator is in a conflicting state (e.g. excluded credential)
    InvalidState,
    /// The ceremony was aborted
    Abort,
    /// Any other named failure
    Other(String),
}

impl HostErrorKind {
    /// Maps a host failure name such as `NotAllowedError` to its kind.
    pub fn from_name(name: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "NotSupportedError" => Self::NotSupported,
            "SecurityError" => Self::Security,
            "InvalidStateError" => Self::InvalidState,
            "AbortError" => Self::Abort,
            other => Self::Other(other.to_string()),
        }
    }

    /// The host-level failure name.
    pub fn name(&self) -> &str {
        match self {
            Self::NotAllowed => "NotAllowedError",
            Self::NotSupported => "NotSupportedError",
            Self::Security => "SecurityError",
            Self::InvalidState => "InvalidStateError",
            Self::Abort => "AbortError",
            Self::Other(name) => name,
        }
    }
}

/// A failure signalled by the host.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{}: {message}", .kind.name())]
pub struct HostError {
    pub kind: HostErrorKind,
    pub message: String,
}

impl HostError {
    pub fn new(kind: HostErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds an error from a host failure name and message.
    pub fn from_name(name: &str, message: impl Into<String>) -> Self {
        Self::new(HostErrorKind::from_name(name), message)
    }
}

/// The platform credential ceremony, consumed as an injected capability.
///
/// Both ceremony methods suspend until the user completes or cancels the
/// interaction, or until the host's own timeout fires.
#[async_trait]
pub trait CeremonyHost: Send + Sync {
    /// Which parts of the credential API are present.
    fn capabilities(&self) -> HostCapabilities;

    /// Host name of the current origin, if known.
    fn origin_hostname(&self) -> Option<String>;

    /// Title of the current document, if any.
    fn document_title(&self) -> Option<String>;

    /// Runs the creation ceremony. `Ok(None)` means the host returned no credential.
    async fn create(
        &self,
        options: &PublicKeyCredentialCreationOptions,
    ) -> Result<Option<PublicKeyCredential<AuthenticatorAttestationResponse>>, HostError>;

    /// Runs the request ceremony. `Ok(None)` means the host returned no credential.
    async fn get(
        &self,
        options: &PublicKeyCredentialRequestOptions,
    ) -> Result<Option<PublicKeyCredential<AuthenticatorAssertionResponse>>, HostError>;

    /// Whether a user-verifying platform authenticator can be used.
    async fn is_user_verifying_platform_authenticator_available(&self) -> Result<bool, HostError>;
}
