mod auth;
mod config;
mod errors;
mod register;
#[cfg(test)]
pub(crate) mod test_utils;
mod types;

pub use config::{CeremonyConfig, CeremonyOptions, DEFAULT_RP_NAME, DEFAULT_TIMEOUT_MS};
pub use errors::{CeremonyError, CeremonyErrorKind};
pub use types::{
    AttestationConveyancePreference, AuthenticationRequest, AuthenticationResult,
    AuthenticatorAssertionResponse, AuthenticatorAttachment, AuthenticatorAttestationResponse,
    AuthenticatorSelectionCriteria, AuthenticatorTransport, CoseAlgorithm, PublicKeyCredential,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialDescriptor,
    PublicKeyCredentialParameters, PublicKeyCredentialRequestOptions, PublicKeyCredentialRpEntity,
    PublicKeyCredentialType, PublicKeyCredentialUserEntity, RegistrationRequest,
    RegistrationResult, ResidentKeyRequirement, SUPPORTED_ALGORITHMS, UserVerificationRequirement,
};

use crate::codec::generate_challenge;
use crate::host::CeremonyHost;
use crate::probe;

/// Runs registration and authentication ceremonies against a host.
///
/// Configuration is resolved once in [`CeremonyOrchestrator::new`] and never
/// changes afterwards. No state is kept between ceremonies, so concurrent
/// calls on one instance are independent of each other.
pub struct CeremonyOrchestrator<H> {
    config: CeremonyConfig,
    host: H,
}

impl<H> CeremonyOrchestrator<H>
where
    H: CeremonyHost,
{
    /// Creates an orchestrator, failing with `NotSupported` straight away if
    /// the host cannot run ceremonies.
    pub fn new(host: H, options: CeremonyOptions) -> Result<Self, CeremonyError> {
        let capabilities = host.capabilities();

        if !capabilities.public_key_credential {
            tracing::warn!("Public key credentials are not available on this host");
            return Err(CeremonyError::new(
                CeremonyErrorKind::NotSupported,
                "WebAuthn is not supported by this host",
            ));
        }

        if !capabilities.credentials_container || !capabilities.create || !capabilities.get {
            tracing::warn!("Credentials API is incomplete: {:?}", capabilities);
            return Err(CeremonyError::new(
                CeremonyErrorKind::NotSupported,
                "Credentials API is not supported by this host",
            ));
        }

        let config = CeremonyConfig::resolve(options, &host);
        tracing::debug!("Ceremony configuration: {:?}", config);

        Ok(Self { config, host })
    }

    pub fn config(&self) -> &CeremonyConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// See [`probe::is_supported`].
    pub fn is_supported(&self) -> bool {
        probe::is_supported(&self.host)
    }

    /// See [`probe::is_platform_authenticator_available`].
    pub async fn is_platform_authenticator_available(&self) -> bool {
        probe::is_platform_authenticator_available(&self.host).await
    }
}

/// Uses the caller's challenge when one was given, otherwise a fresh one.
/// An empty caller challenge counts as none.
fn challenge_or_generate(
    explicit: Option<Vec<u8>>,
    failure_kind: CeremonyErrorKind,
) -> Result<Vec<u8>, CeremonyError> {
    match explicit.filter(|c| !c.is_empty()) {
        Some(challenge) => Ok(challenge),
        None => generate_challenge().map(|c| c.to_vec()).map_err(|e| {
            tracing::error!("Challenge generation failed: {}", e);
            CeremonyError::new(failure_kind, "Failed to generate challenge")
        }),
    }
}
