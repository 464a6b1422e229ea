use super::errors::{CeremonyError, CeremonyErrorKind};
use super::types::{
    AuthenticationRequest, AuthenticationResult, AuthenticatorAssertionResponse,
    PublicKeyCredential, PublicKeyCredentialRequestOptions,
};
use super::{CeremonyOrchestrator, challenge_or_generate};

use crate::codec::encode_identifier;
use crate::host::{CeremonyHost, HostError, HostErrorKind};

impl<H> CeremonyOrchestrator<H>
where
    H: CeremonyHost,
{
    /// Authenticates with an existing credential.
    ///
    /// Suspends until the host's request ceremony resolves. Cancellation and
    /// unsupported operations are classified; every other host failure,
    /// including a security-policy violation, becomes `AuthenticationFailed`.
    pub async fn authenticate(
        &self,
        request: AuthenticationRequest,
    ) -> Result<AuthenticationResult, CeremonyError> {
        let options = self.request_options(request)?;

        tracing::debug!("Auth options: {:?}", options);

        let credential = match self.host.get(&options).await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                tracing::warn!("Host returned no credential for authentication");
                return Err(CeremonyError::new(
                    CeremonyErrorKind::AuthenticationFailed,
                    "Failed to get credential",
                ));
            }
            Err(e) => {
                let error = classify_authentication_failure(e);
                tracing::warn!(
                    "Authentication failed: {} ({:?})",
                    error.code(),
                    error.details()
                );
                return Err(error);
            }
        };

        let result = authentication_result(credential);
        tracing::info!("Authenticated with credential {}", result.credential_id);
        Ok(result)
    }

    pub(crate) fn request_options(
        &self,
        request: AuthenticationRequest,
    ) -> Result<PublicKeyCredentialRequestOptions, CeremonyError> {
        let challenge =
            challenge_or_generate(request.challenge, CeremonyErrorKind::AuthenticationFailed)?;

        Ok(PublicKeyCredentialRequestOptions {
            challenge,
            timeout: self.config.timeout(),
            user_verification: request
                .user_verification
                .unwrap_or(self.config.user_verification()),
            // None stays None: no restriction is not the same as an empty list
            allow_credentials: request.allow_credentials,
        })
    }
}

fn classify_authentication_failure(error: HostError) -> CeremonyError {
    match error.kind {
        HostErrorKind::NotAllowed => CeremonyError::new(
            CeremonyErrorKind::UserCancelled,
            "User cancelled authentication",
        ),
        HostErrorKind::NotSupported => {
            CeremonyError::new(CeremonyErrorKind::NotSupported, "WebAuthn not supported")
        }
        _ => CeremonyError::new(
            CeremonyErrorKind::AuthenticationFailed,
            "Authentication failed",
        )
        .with_details(error),
    }
}

fn authentication_result(
    credential: PublicKeyCredential<AuthenticatorAssertionResponse>,
) -> AuthenticationResult {
    let response = &credential.response;

    AuthenticationResult {
        credential_id: encode_identifier(&credential.raw_id),
        authenticator_data: response.authenticator_data.clone(),
        signature: response.signature.clone(),
        client_data_json: response.client_data_json.clone(),
        user_handle: response
            .user_handle
            .clone()
            .filter(|handle| !handle.is_empty()),
        credential,
    }
}
