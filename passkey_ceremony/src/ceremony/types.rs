use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, base64url_bytes, decode_identifier, encode_identifier};

/// Whether the authenticator must verify the user beyond mere presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerificationRequirement {
    Discouraged,
    #[default]
    Preferred,
    Required,
}

impl UserVerificationRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discouraged => "discouraged",
            Self::Preferred => "preferred",
            Self::Required => "required",
        }
    }
}

impl fmt::Display for UserVerificationRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserVerificationRequirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discouraged" => Ok(Self::Discouraged),
            "preferred" => Ok(Self::Preferred),
            "required" => Ok(Self::Required),
            invalid => Err(format!("Invalid user verification: {invalid}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthenticatorAttachment {
    Platform,
    CrossPlatform,
}

impl FromStr for AuthenticatorAttachment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "platform" => Ok(Self::Platform),
            "cross-platform" => Ok(Self::CrossPlatform),
            invalid => Err(format!("Invalid authenticator attachment: {invalid}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResidentKeyRequirement {
    Discouraged,
    Preferred,
    Required,
}

impl FromStr for ResidentKeyRequirement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "discouraged" => Ok(Self::Discouraged),
            "preferred" => Ok(Self::Preferred),
            "required" => Ok(Self::Required),
            invalid => Err(format!("Invalid resident key requirement: {invalid}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttestationConveyancePreference {
    #[default]
    None,
    Indirect,
    Direct,
    Enterprise,
}

impl FromStr for AttestationConveyancePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "indirect" => Ok(Self::Indirect),
            "direct" => Ok(Self::Direct),
            "enterprise" => Ok(Self::Enterprise),
            invalid => Err(format!("Invalid attestation: {invalid}")),
        }
    }
}

/// The credential type marker. WebAuthn defines only one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PublicKeyCredentialType {
    #[default]
    #[serde(rename = "public-key")]
    PublicKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthenticatorTransport {
    Usb,
    Nfc,
    Ble,
    Internal,
    Hybrid,
}

/// COSE algorithm identifiers a relying party can accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum CoseAlgorithm {
    /// ECDSA w/ SHA-256
    Es256,
    /// RSASSA-PKCS1-v1_5 w/ SHA-256
    Rs256,
    EdDsa,
    /// RSASSA-PSS w/ SHA-256
    Ps256,
    Ps384,
    Ps512,
}

impl CoseAlgorithm {
    pub fn id(&self) -> i32 {
        match self {
            Self::Es256 => -7,
            Self::Rs256 => -257,
            Self::EdDsa => -8,
            Self::Ps256 => -37,
            Self::Ps384 => -38,
            Self::Ps512 => -39,
        }
    }
}

impl From<CoseAlgorithm> for i32 {
    fn from(alg: CoseAlgorithm) -> Self {
        alg.id()
    }
}

impl TryFrom<i32> for CoseAlgorithm {
    type Error = String;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            -7 => Ok(Self::Es256),
            -257 => Ok(Self::Rs256),
            -8 => Ok(Self::EdDsa),
            -37 => Ok(Self::Ps256),
            -38 => Ok(Self::Ps384),
            -39 => Ok(Self::Ps512),
            other => Err(format!("Unsupported COSE algorithm: {other}")),
        }
    }
}

/// Algorithms offered at registration, most preferred first.
pub const SUPPORTED_ALGORITHMS: [CoseAlgorithm; 2] = [CoseAlgorithm::Es256, CoseAlgorithm::Rs256];

/// Reference to a previously registered credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCredentialDescriptor {
    #[serde(rename = "type")]
    pub type_: PublicKeyCredentialType,
    #[serde(with = "base64url_bytes")]
    pub id: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<AuthenticatorTransport>>,
}

impl PublicKeyCredentialDescriptor {
    pub fn new(id: impl Into<Vec<u8>>) -> Self {
        Self {
            type_: PublicKeyCredentialType::PublicKey,
            id: id.into(),
            transports: None,
        }
    }

    /// Builds a descriptor from an identifier in its base64url text form,
    /// as returned in `RegistrationResult::credential_id`.
    pub fn from_encoded_id(credential_id: &str) -> Result<Self, CodecError> {
        Ok(Self::new(decode_identifier(credential_id)?))
    }

    pub fn with_transports(mut self, transports: Vec<AuthenticatorTransport>) -> Self {
        self.transports = Some(transports);
        self
    }
}

/// Authenticator requirements for registration.
///
/// Every field is optional so a partial value can be layered over the
/// defaults with [`AuthenticatorSelectionCriteria::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorSelectionCriteria {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resident_key: Option<ResidentKeyRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_resident_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<UserVerificationRequirement>,
}

impl AuthenticatorSelectionCriteria {
    /// Shallow field-level merge: each field set in `overrides` wins,
    /// every unset field keeps the value from `self`.
    pub fn merge(self, overrides: &AuthenticatorSelectionCriteria) -> Self {
        Self {
            authenticator_attachment: overrides
                .authenticator_attachment
                .or(self.authenticator_attachment),
            resident_key: overrides.resident_key.or(self.resident_key),
            require_resident_key: overrides.require_resident_key.or(self.require_resident_key),
            user_verification: overrides.user_verification.or(self.user_verification),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCredentialRpEntity {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialUserEntity {
    #[serde(with = "base64url_bytes")]
    pub id: Vec<u8>,
    pub name: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCredentialParameters {
    #[serde(rename = "type")]
    pub type_: PublicKeyCredentialType,
    pub alg: CoseAlgorithm,
}

/// Options handed to the host's creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialCreationOptions {
    #[serde(with = "base64url_bytes")]
    pub challenge: Vec<u8>,
    pub rp: PublicKeyCredentialRpEntity,
    pub user: PublicKeyCredentialUserEntity,
    pub pub_key_cred_params: Vec<PublicKeyCredentialParameters>,
    /// Milliseconds
    pub timeout: u32,
    pub authenticator_selection: AuthenticatorSelectionCriteria,
    pub attestation: AttestationConveyancePreference,
    pub exclude_credentials: Vec<PublicKeyCredentialDescriptor>,
}

/// Options handed to the host's request ceremony.
///
/// `allow_credentials` stays `None` when the caller gave no list. An empty
/// list means something different to the host than no restriction at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredentialRequestOptions {
    #[serde(with = "base64url_bytes")]
    pub challenge: Vec<u8>,
    /// Milliseconds
    pub timeout: u32,
    pub user_verification: UserVerificationRequirement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,
}

/// Credential handle produced by a host ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredential<R> {
    /// base64url form of `raw_id` as reported by the host
    pub id: String,
    #[serde(with = "base64url_bytes")]
    pub raw_id: Vec<u8>,
    #[serde(rename = "type")]
    pub type_: PublicKeyCredentialType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_attachment: Option<AuthenticatorAttachment>,
    pub response: R,
}

impl<R> PublicKeyCredential<R> {
    pub fn new(raw_id: impl Into<Vec<u8>>, response: R) -> Self {
        let raw_id = raw_id.into();
        Self {
            id: encode_identifier(&raw_id),
            raw_id,
            type_: PublicKeyCredentialType::PublicKey,
            authenticator_attachment: None,
            response,
        }
    }

    pub fn with_attachment(mut self, attachment: AuthenticatorAttachment) -> Self {
        self.authenticator_attachment = Some(attachment);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAttestationResponse {
    #[serde(rename = "clientDataJSON", with = "base64url_bytes")]
    pub client_data_json: Vec<u8>,
    #[serde(with = "base64url_bytes")]
    pub attestation_object: Vec<u8>,
    /// DER SubjectPublicKeyInfo, when the host could extract it
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64url_bytes::option"
    )]
    pub public_key: Option<Vec<u8>>,
}

impl AuthenticatorAttestationResponse {
    /// The credential public key, if the authenticator's algorithm lets the
    /// host extract one.
    pub fn public_key(&self) -> Option<&[u8]> {
        self.public_key.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAssertionResponse {
    #[serde(rename = "clientDataJSON", with = "base64url_bytes")]
    pub client_data_json: Vec<u8>,
    #[serde(with = "base64url_bytes")]
    pub authenticator_data: Vec<u8>,
    #[serde(with = "base64url_bytes")]
    pub signature: Vec<u8>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "base64url_bytes::option"
    )]
    pub user_handle: Option<Vec<u8>>,
}

/// What the caller wants registered. Only `username` is required.
#[derive(Debug, Clone, Default)]
pub struct RegistrationRequest {
    pub username: String,
    pub display_name: Option<String>,
    pub challenge: Option<Vec<u8>>,
    pub exclude_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,
    pub authenticator_selection: Option<AuthenticatorSelectionCriteria>,
    pub attestation: Option<AttestationConveyancePreference>,
}

impl RegistrationRequest {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_challenge(mut self, challenge: impl Into<Vec<u8>>) -> Self {
        self.challenge = Some(challenge.into());
        self
    }

    pub fn with_exclude_credentials(mut self, credentials: Vec<PublicKeyCredentialDescriptor>) -> Self {
        self.exclude_credentials = Some(credentials);
        self
    }

    pub fn with_authenticator_selection(mut self, selection: AuthenticatorSelectionCriteria) -> Self {
        self.authenticator_selection = Some(selection);
        self
    }

    pub fn with_attestation(mut self, attestation: AttestationConveyancePreference) -> Self {
        self.attestation = Some(attestation);
        self
    }
}

/// What the caller wants from an authentication. Everything is optional.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationRequest {
    pub challenge: Option<Vec<u8>>,
    pub allow_credentials: Option<Vec<PublicKeyCredentialDescriptor>>,
    pub user_verification: Option<UserVerificationRequirement>,
}

impl AuthenticationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_challenge(mut self, challenge: impl Into<Vec<u8>>) -> Self {
        self.challenge = Some(challenge.into());
        self
    }

    pub fn with_allow_credentials(mut self, credentials: Vec<PublicKeyCredentialDescriptor>) -> Self {
        self.allow_credentials = Some(credentials);
        self
    }

    pub fn with_user_verification(mut self, user_verification: UserVerificationRequirement) -> Self {
        self.user_verification = Some(user_verification);
        self
    }
}

/// Outcome of a successful registration ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    /// The host's credential handle, unchanged
    pub credential: PublicKeyCredential<AuthenticatorAttestationResponse>,
    /// base64url of the credential's raw identifier
    pub credential_id: String,
    #[serde(with = "base64url_bytes::option")]
    pub public_key: Option<Vec<u8>>,
    #[serde(with = "base64url_bytes")]
    pub attestation_object: Vec<u8>,
    #[serde(rename = "clientDataJSON", with = "base64url_bytes")]
    pub client_data_json: Vec<u8>,
}

/// Outcome of a successful authentication ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationResult {
    /// The host's credential handle, unchanged
    pub credential: PublicKeyCredential<AuthenticatorAssertionResponse>,
    /// base64url of the credential's raw identifier
    pub credential_id: String,
    #[serde(with = "base64url_bytes")]
    pub authenticator_data: Vec<u8>,
    #[serde(with = "base64url_bytes")]
    pub signature: Vec<u8>,
    #[serde(rename = "clientDataJSON", with = "base64url_bytes")]
    pub client_data_json: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none", with = "base64url_bytes::option")]
    pub user_handle: Option<Vec<u8>>,
}
