//! Test utilities for ceremony module tests
//!
//! `MockHost` stands in for the platform: each ceremony returns a scripted
//! outcome and the options it was called with are recorded for inspection.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::ceremony::types::{
    AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, PublicKeyCredential,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions,
};
use crate::host::{CeremonyHost, HostCapabilities, HostError};

type AttestationOutcome = Result<Option<PublicKeyCredential<AuthenticatorAttestationResponse>>, HostError>;
type AssertionOutcome = Result<Option<PublicKeyCredential<AuthenticatorAssertionResponse>>, HostError>;

/// Credential a host returns from a successful creation ceremony.
pub(crate) fn sample_attestation_credential() -> PublicKeyCredential<AuthenticatorAttestationResponse> {
    PublicKeyCredential::new(
        vec![0x11; 32],
        AuthenticatorAttestationResponse {
            client_data_json: vec![0x22; 50],
            attestation_object: vec![0x33; 100],
            public_key: Some(vec![0x04; 65]),
        },
    )
}

/// Credential a host returns from a successful request ceremony.
pub(crate) fn sample_assertion_credential() -> PublicKeyCredential<AuthenticatorAssertionResponse> {
    PublicKeyCredential::new(
        vec![0x11; 32],
        AuthenticatorAssertionResponse {
            client_data_json: vec![0x22; 50],
            authenticator_data: vec![0x55; 37],
            signature: vec![0x66; 64],
            user_handle: Some(vec![0x77; 16]),
        },
    )
}

pub(crate) struct MockHost {
    capabilities: HostCapabilities,
    origin_hostname: Option<String>,
    document_title: Option<String>,
    create_outcome: AttestationOutcome,
    get_outcome: AssertionOutcome,
    platform_outcome: Result<bool, HostError>,
    created_with: Mutex<Vec<PublicKeyCredentialCreationOptions>>,
    requested_with: Mutex<Vec<PublicKeyCredentialRequestOptions>>,
    platform_queries: AtomicUsize,
}

impl MockHost {
    /// A fully capable host at `localhost` titled "Test App" whose ceremonies succeed.
    pub(crate) fn new() -> Self {
        Self {
            capabilities: HostCapabilities::full(),
            origin_hostname: Some("localhost".to_string()),
            document_title: Some("Test App".to_string()),
            create_outcome: Ok(Some(sample_attestation_credential())),
            get_outcome: Ok(Some(sample_assertion_credential())),
            platform_outcome: Ok(true),
            created_with: Mutex::new(Vec::new()),
            requested_with: Mutex::new(Vec::new()),
            platform_queries: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_capabilities(mut self, capabilities: HostCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub(crate) fn with_origin_hostname(mut self, hostname: Option<String>) -> Self {
        self.origin_hostname = hostname;
        self
    }

    pub(crate) fn with_document_title(mut self, title: Option<String>) -> Self {
        self.document_title = title;
        self
    }

    pub(crate) fn with_create_outcome(mut self, outcome: AttestationOutcome) -> Self {
        self.create_outcome = outcome;
        self
    }

    pub(crate) fn with_get_outcome(mut self, outcome: AssertionOutcome) -> Self {
        self.get_outcome = outcome;
        self
    }

    pub(crate) fn with_platform_authenticator(mut self, outcome: Result<bool, HostError>) -> Self {
        self.platform_outcome = outcome;
        self
    }

    /// Options passed to every `create` call so far.
    pub(crate) fn created_with(&self) -> Vec<PublicKeyCredentialCreationOptions> {
        self.created_with.lock().unwrap().clone()
    }

    /// Options passed to every `get` call so far.
    pub(crate) fn requested_with(&self) -> Vec<PublicKeyCredentialRequestOptions> {
        self.requested_with.lock().unwrap().clone()
    }

    pub(crate) fn platform_queries(&self) -> usize {
        self.platform_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CeremonyHost for MockHost {
    fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    fn origin_hostname(&self) -> Option<String> {
        self.origin_hostname.clone()
    }

    fn document_title(&self) -> Option<String> {
        self.document_title.clone()
    }

    async fn create(&self, options: &PublicKeyCredentialCreationOptions) -> AttestationOutcome {
        self.created_with.lock().unwrap().push(options.clone());
        self.create_outcome.clone()
    }

    async fn get(&self, options: &PublicKeyCredentialRequestOptions) -> AssertionOutcome {
        self.requested_with.lock().unwrap().push(options.clone());
        self.get_outcome.clone()
    }

    async fn is_user_verifying_platform_authenticator_available(&self) -> Result<bool, HostError> {
        self.platform_queries.fetch_add(1, Ordering::SeqCst);
        self.platform_outcome.clone()
    }
}
