use std::fmt;

use thiserror::Error;

use crate::host::HostError;

/// The closed set of failure kinds a ceremony can end in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CeremonyErrorKind {
    /// The host lacks the ceremony API, or rejected the operation as unsupported
    NotSupported,
    /// The user declined the prompt or the host timed it out
    UserCancelled,
    /// The host reported a security-policy violation during registration
    SecurityError,
    /// Registration failed for any other reason
    RegistrationFailed,
    /// Authentication failed for any other reason
    AuthenticationFailed,
}

impl CeremonyErrorKind {
    /// Stable code for this kind, suitable for logs and client payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotSupported => "NOT_SUPPORTED",
            Self::UserCancelled => "USER_CANCELLED",
            Self::SecurityError => "SECURITY_ERROR",
            Self::RegistrationFailed => "REGISTRATION_FAILED",
            Self::AuthenticationFailed => "AUTHENTICATION_FAILED",
        }
    }
}

impl fmt::Display for CeremonyErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned by every orchestrator operation.
///
/// Raw host failures never escape unwrapped: they are classified into a
/// [`CeremonyErrorKind`] and kept in `details` for diagnostics.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CeremonyError {
    kind: CeremonyErrorKind,
    message: String,
    #[source]
    details: Option<HostError>,
}

impl CeremonyError {
    pub(crate) fn new(kind: CeremonyErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub(crate) fn with_details(mut self, details: HostError) -> Self {
        self.details = Some(details);
        self
    }

    pub fn kind(&self) -> CeremonyErrorKind {
        self.kind
    }

    /// Shorthand for `self.kind().code()`.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The originating host failure, if there was one.
    pub fn details(&self) -> Option<&HostError> {
        self.details.as_ref()
    }
}
