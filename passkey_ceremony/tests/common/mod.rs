//! Shared fixtures for integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use passkey_ceremony::{
    AuthenticatorAssertionResponse, AuthenticatorAttachment, AuthenticatorAttestationResponse,
    CeremonyHost, HostCapabilities, HostError, PublicKeyCredential,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions, encode_identifier,
};

pub const TEST_HOSTNAME: &str = "app.example.com";
pub const TEST_TITLE: &str = "Example App";

/// A credential the mock browser created earlier.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    pub raw_id: Vec<u8>,
    pub user_handle: Vec<u8>,
}

/// Mimics a browser with a platform authenticator.
///
/// Creation stores a credential keyed by a counter; a request returns the
/// first stored credential permitted by the allow list, or `NotAllowedError`
/// when there is none, as a browser does when the user has nothing to pick.
pub struct MockBrowser {
    capabilities: HostCapabilities,
    platform_authenticator: Result<bool, HostError>,
    credentials: Mutex<Vec<StoredCredential>>,
    queued_failures: Mutex<VecDeque<HostError>>,
    return_nothing: Mutex<bool>,
    pub created_with: Mutex<Vec<PublicKeyCredentialCreationOptions>>,
    pub requested_with: Mutex<Vec<PublicKeyCredentialRequestOptions>>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self {
            capabilities: HostCapabilities::full(),
            platform_authenticator: Ok(true),
            credentials: Mutex::new(Vec::new()),
            queued_failures: Mutex::new(VecDeque::new()),
            return_nothing: Mutex::new(false),
            created_with: Mutex::new(Vec::new()),
            requested_with: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_platform_authenticator(mut self, outcome: Result<bool, HostError>) -> Self {
        self.platform_authenticator = outcome;
        self
    }

    /// The next ceremony, of either kind, fails with `error`.
    pub fn fail_next_with(&self, error: HostError) {
        self.queued_failures.lock().unwrap().push_back(error);
    }

    /// Ceremonies resolve without a credential from now on.
    pub fn return_nothing(&self) {
        *self.return_nothing.lock().unwrap() = true;
    }

    pub fn stored_credentials(&self) -> Vec<StoredCredential> {
        self.credentials.lock().unwrap().clone()
    }

    fn next_failure(&self) -> Option<HostError> {
        self.queued_failures.lock().unwrap().pop_front()
    }

    fn client_data(kind: &str, challenge: &[u8]) -> Vec<u8> {
        serde_json::json!({
            "type": kind,
            "challenge": encode_identifier(challenge),
            "origin": format!("https://{TEST_HOSTNAME}"),
        })
        .to_string()
        .into_bytes()
    }
}

#[async_trait]
impl CeremonyHost for MockBrowser {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn origin_hostname(&self) -> Option<String> {
        Some(TEST_HOSTNAME.to_string())
    }

    fn document_title(&self) -> Option<String> {
        Some(TEST_TITLE.to_string())
    }

    async fn create(
        &self,
        options: &PublicKeyCredentialCreationOptions,
    ) -> Result<Option<PublicKeyCredential<AuthenticatorAttestationResponse>>, HostError> {
        self.created_with.lock().unwrap().push(options.clone());
        if let Some(error) = self.next_failure() {
            return Err(error);
        }
        if *self.return_nothing.lock().unwrap() {
            return Ok(None);
        }

        let mut credentials = self.credentials.lock().unwrap();
        let mut raw_id = vec![0xc0, credentials.len() as u8];
        raw_id.extend_from_slice(&options.user.id);
        credentials.push(StoredCredential {
            raw_id: raw_id.clone(),
            user_handle: options.user.id.clone(),
        });

        let response = AuthenticatorAttestationResponse {
            client_data_json: Self::client_data("webauthn.create", &options.challenge),
            attestation_object: vec![0xa3, 0x63, 0x66, 0x6d, 0x74, 0x64, 0x6e, 0x6f, 0x6e, 0x65],
            public_key: Some(vec![0x30; 91]),
        };
        Ok(Some(
            PublicKeyCredential::new(raw_id, response).with_attachment(AuthenticatorAttachment::Platform),
        ))
    }

    async fn get(
        &self,
        options: &PublicKeyCredentialRequestOptions,
    ) -> Result<Option<PublicKeyCredential<AuthenticatorAssertionResponse>>, HostError> {
        self.requested_with.lock().unwrap().push(options.clone());
        if let Some(error) = self.next_failure() {
            return Err(error);
        }
        if *self.return_nothing.lock().unwrap() {
            return Ok(None);
        }

        let credentials = self.credentials.lock().unwrap();
        let chosen = credentials.iter().find(|stored| match &options.allow_credentials {
            Some(allowed) => allowed.iter().any(|d| d.id == stored.raw_id),
            None => true,
        });

        let Some(stored) = chosen else {
            return Err(HostError::from_name(
                "NotAllowedError",
                "No matching credential was selected",
            ));
        };

        let response = AuthenticatorAssertionResponse {
            client_data_json: Self::client_data("webauthn.get", &options.challenge),
            authenticator_data: vec![0x49; 37],
            signature: vec![0x30, 0x45, 0x02, 0x20],
            user_handle: Some(stored.user_handle.clone()),
        };
        Ok(Some(PublicKeyCredential::new(stored.raw_id.clone(), response)))
    }

    async fn is_user_verifying_platform_authenticator_available(&self) -> Result<bool, HostError> {
        self.platform_authenticator.clone()
    }
}
