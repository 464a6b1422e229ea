use super::errors::{CeremonyError, CeremonyErrorKind};
use super::types::{
    AuthenticatorAttachment, AuthenticatorAttestationResponse, AuthenticatorSelectionCriteria,
    PublicKeyCredential, PublicKeyCredentialCreationOptions, PublicKeyCredentialParameters,
    PublicKeyCredentialRpEntity, PublicKeyCredentialType, PublicKeyCredentialUserEntity,
    RegistrationRequest, RegistrationResult,
};
use super::{CeremonyOrchestrator, challenge_or_generate};

use crate::codec::encode_identifier;
use crate::host::{CeremonyHost, HostError, HostErrorKind};

impl<H> CeremonyOrchestrator<H>
where
    H: CeremonyHost,
{
    /// Registers a new credential for `request.username`.
    ///
    /// Suspends until the host's creation ceremony resolves. Host failures
    /// are classified in order: cancellation, unsupported, security policy,
    /// then the generic `RegistrationFailed`.
    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> Result<RegistrationResult, CeremonyError> {
        let options = self.creation_options(request)?;

        tracing::debug!("Registration options: {:?}", options);

        let credential = match self.host.create(&options).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::warn!("Host returned no credential for registration");
                return Err(CeremonyError::new(
                    CeremonyErrorKind::RegistrationFailed,
                    "Failed to create credential",
                ));
            }
            Err(e) => {
                let error = classify_registration_failure(e);
                tracing::warn!("Registration failed: {} ({:?})", error.code(), error.details());
                return Err(error);
            }
        };

        let result = registration_result(credential);
        tracing::info!("Registered credential {}", result.credential_id);
        Ok(result)
    }

    /// Builds the full creation options from the caller's request and the
    /// orchestrator's configuration.
    pub(crate) fn creation_options(
        &self,
        request: RegistrationRequest,
    ) -> Result<PublicKeyCredentialCreationOptions, CeremonyError> {
        if request.username.trim().is_empty() {
            return Err(CeremonyError::new(
                CeremonyErrorKind::RegistrationFailed,
                "Username is required",
            ));
        }

        let challenge =
            challenge_or_generate(request.challenge, CeremonyErrorKind::RegistrationFailed)?;

        let display_name = request
            .display_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| request.username.clone());

        let default_selection = AuthenticatorSelectionCriteria {
            authenticator_attachment: Some(AuthenticatorAttachment::Platform),
            user_verification: Some(self.config.user_verification()),
            ..Default::default()
        };
        let authenticator_selection = match &request.authenticator_selection {
            Some(overrides) => default_selection.merge(overrides),
            None => default_selection,
        };

        let pub_key_cred_params = self
            .config
            .algorithms()
            .iter()
            .map(|alg| PublicKeyCredentialParameters {
                type_: PublicKeyCredentialType::PublicKey,
                alg: *alg,
            })
            .collect();

        Ok(PublicKeyCredentialCreationOptions {
            challenge,
            rp: PublicKeyCredentialRpEntity {
                id: self.config.rp_id().to_string(),
                name: self.config.rp_name().to_string(),
            },
            user: PublicKeyCredentialUserEntity {
                id: request.username.as_bytes().to_vec(),
                name: request.username,
                display_name,
            },
            pub_key_cred_params,
            timeout: self.config.timeout(),
            authenticator_selection,
            attestation: request.attestation.unwrap_or_default(),
            exclude_credentials: request.exclude_credentials.unwrap_or_default(),
        })
    }
}

fn classify_registration_failure(error: HostError) -> CeremonyError {
    match error.kind {
        HostErrorKind::NotAllowed => CeremonyError::new(
            CeremonyErrorKind::UserCancelled,
            "User cancelled registration",
        ),
        HostErrorKind::NotSupported => {
            CeremonyError::new(CeremonyErrorKind::NotSupported, "WebAuthn not supported")
        }
        HostErrorKind::Security => CeremonyError::new(
            CeremonyErrorKind::SecurityError,
            "Security error during registration",
        ),
        _ => CeremonyError::new(CeremonyErrorKind::RegistrationFailed, "Registration failed")
            .with_details(error),
    }
}

fn registration_result(
    credential: PublicKeyCredential<AuthenticatorAttestationResponse>,
) -> RegistrationResult {
    let response = &credential.response;

    RegistrationResult {
        credential_id: encode_identifier(&credential.raw_id),
        public_key: response.public_key().map(<[u8]>::to_vec),
        attestation_object: response.attestation_object.clone(),
        client_data_json: response.client_data_json.clone(),
        credential,
    }
}
