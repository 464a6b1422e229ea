//! passkey_ceremony - Client-side orchestration of WebAuthn passkey ceremonies
//!
//! This crate builds complete creation and request options from minimal
//! caller input, runs them through a platform [`CeremonyHost`], and maps
//! every outcome onto a typed result or a [`CeremonyError`] with a closed
//! set of kinds. It never verifies signatures or attestations; that is the
//! relying-party server's job.
//!
//! ```no_run
//! # async fn run<H: passkey_ceremony::CeremonyHost>(host: H) -> Result<(), passkey_ceremony::CeremonyError> {
//! use passkey_ceremony::{CeremonyOptions, CeremonyOrchestrator, RegistrationRequest};
//!
//! let orchestrator = CeremonyOrchestrator::new(host, CeremonyOptions::from_env())?;
//! let registration = orchestrator.register(RegistrationRequest::new("alice")).await?;
//! println!("new credential: {}", registration.credential_id);
//! # Ok(())
//! # }
//! ```

mod ceremony;
mod codec;
mod host;
mod probe;

pub use ceremony::{
    AttestationConveyancePreference, AuthenticationRequest, AuthenticationResult,
    AuthenticatorAssertionResponse, AuthenticatorAttachment, AuthenticatorAttestationResponse,
    AuthenticatorSelectionCriteria, AuthenticatorTransport, CeremonyConfig, CeremonyError,
    CeremonyErrorKind, CeremonyOptions, CeremonyOrchestrator, CoseAlgorithm, DEFAULT_RP_NAME,
    DEFAULT_TIMEOUT_MS, PublicKeyCredential, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialDescriptor, PublicKeyCredentialParameters,
    PublicKeyCredentialRequestOptions, PublicKeyCredentialRpEntity, PublicKeyCredentialType,
    PublicKeyCredentialUserEntity, RegistrationRequest, RegistrationResult,
    ResidentKeyRequirement, SUPPORTED_ALGORITHMS, UserVerificationRequirement,
};

pub use codec::{CHALLENGE_LEN, CodecError, decode_identifier, encode_identifier, generate_challenge};

pub use host::{CeremonyHost, HostCapabilities, HostError, HostErrorKind};

pub use probe::{is_platform_authenticator_available, is_supported};
