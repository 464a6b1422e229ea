use std::sync::Mutex;

use async_trait::async_trait;
use passkey_ceremony::{
    AuthenticationRequest, AuthenticatorAssertionResponse, AuthenticatorAttachment,
    AuthenticatorAttestationResponse, CeremonyHost, CeremonyOptions, CeremonyOrchestrator,
    HostCapabilities, HostError, PublicKeyCredential, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialDescriptor, PublicKeyCredentialRequestOptions, RegistrationRequest,
    encode_identifier,
};
use tracing_subscriber::EnvFilter;

/// Stands in for a browser so the ceremony flow can be watched from a terminal.
///
/// It prints the options it receives and answers with placeholder payloads;
/// nothing it returns is cryptographically meaningful.
struct ScriptedHost {
    origin: String,
    credential_ids: Mutex<Vec<(Vec<u8>, Vec<u8>)>>,
}

impl ScriptedHost {
    fn new(origin: String) -> Self {
        Self {
            origin,
            credential_ids: Mutex::new(Vec::new()),
        }
    }

    fn client_data(&self, kind: &str, challenge: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "type": kind,
            "challenge": encode_identifier(challenge),
            "origin": format!("https://{}", self.origin),
        })
        .to_string()
        .into_bytes()
    }
}

#[async_trait]
impl CeremonyHost for ScriptedHost {
    fn capabilities(&self) -> HostCapabilities {
        HostCapabilities::full()
    }

    fn origin_hostname(&self) -> Option<String> {
        Some(self.origin.clone())
    }

    fn document_title(&self) -> Option<String> {
        None
    }

    async fn create(
        &self,
        options: &PublicKeyCredentialCreationOptions,
    ) -> Result<Option<PublicKeyCredential<AuthenticatorAttestationResponse>>, HostError> {
        println!(
            "navigator.credentials.create({})",
            serde_json::to_string_pretty(options).unwrap_or_default()
        );

        let mut ids = self
            .credential_ids
            .lock()
            .map_err(|_| HostError::from_name("UnknownError", "Host state poisoned"))?;
        let raw_id = [b"demo-".as_slice(), options.user.id.as_slice()].concat();
        ids.push((raw_id.clone(), options.user.id.clone()));

        let response = AuthenticatorAttestationResponse {
            client_data_json: self.client_data("webauthn.create", &options.challenge),
            attestation_object: b"placeholder attestation".to_vec(),
            public_key: None,
        };
        Ok(Some(
            PublicKeyCredential::new(raw_id, response).with_attachment(AuthenticatorAttachment::Platform),
        ))
    }

    async fn get(
        &self,
        options: &PublicKeyCredentialRequestOptions,
    ) -> Result<Option<PublicKeyCredential<AuthenticatorAssertionResponse>>, HostError> {
        println!(
            "navigator.credentials.get({})",
            serde_json::to_string_pretty(options).unwrap_or_default()
        );

        let ids = self
            .credential_ids
            .lock()
            .map_err(|_| HostError::from_name("UnknownError", "Host state poisoned"))?;
        let Some((raw_id, user_handle)) = ids.first().cloned() else {
            return Err(HostError::from_name("NotAllowedError", "No credentials available"));
        };

        let response = AuthenticatorAssertionResponse {
            client_data_json: self.client_data("webauthn.get", &options.challenge),
            authenticator_data: vec![0u8; 37],
            signature: b"placeholder signature".to_vec(),
            user_handle: Some(user_handle),
        };
        Ok(Some(PublicKeyCredential::new(raw_id, response)))
    }

    async fn is_user_verifying_platform_authenticator_available(&self) -> Result<bool, HostError> {
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let username = std::env::args().nth(1).unwrap_or_else(|| "alice".to_string());
    let options = CeremonyOptions::from_env();
    let origin = options
        .rp_id
        .clone()
        .unwrap_or_else(|| "localhost".to_string());

    let orchestrator = CeremonyOrchestrator::new(ScriptedHost::new(origin), options)?;
    tracing::info!(
        "Relying party {} ({}), timeout {} ms",
        orchestrator.config().rp_id(),
        orchestrator.config().rp_name(),
        orchestrator.config().timeout()
    );

    if !orchestrator.is_platform_authenticator_available().await {
        tracing::warn!("No platform authenticator, continuing anyway");
    }

    let registration = orchestrator
        .register(RegistrationRequest::new(username))
        .await?;
    println!("{}", serde_json::to_string_pretty(&registration)?);

    let allowed = PublicKeyCredentialDescriptor::from_encoded_id(&registration.credential_id)?;
    let authentication = orchestrator
        .authenticate(AuthenticationRequest::new().with_allow_credentials(vec![allowed]))
        .await?;
    println!("{}", serde_json::to_string_pretty(&authentication)?);

    Ok(())
}
