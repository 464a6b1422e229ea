//! Identifier encoding and challenge generation.
//!
//! Credential identifiers and other binary ceremony payloads travel as
//! unpadded base64url text. Decoding is lenient: it accepts either base64
//! alphabet and tolerates trailing `=` padding, so identifiers produced by
//! other encoders still round-trip.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE_NO_PAD};
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

/// Length in bytes of every generated challenge.
pub const CHALLENGE_LEN: usize = 32;

const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Errors raised by the codec.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Text could not be decoded as base64url
    #[error("Invalid format: {0}")]
    Format(String),

    /// The secure random source failed
    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Encodes bytes as URL-safe base64 without padding.
///
/// Empty input yields an empty string.
pub fn encode_identifier(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes a base64url identifier back into bytes.
///
/// `+` and `/` are accepted in place of `-` and `_`, and trailing padding is
/// optional. An empty string decodes to an empty vector.
pub fn decode_identifier(text: &str) -> Result<Vec<u8>, CodecError> {
    let normalized: String = text
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    LENIENT_URL_SAFE
        .decode(normalized.as_bytes())
        .map_err(|e| CodecError::Format(format!("Failed to decode base64url: {e}")))
}

/// Generates a fresh challenge from the system's secure random source.
pub fn generate_challenge() -> Result<[u8; CHALLENGE_LEN], CodecError> {
    let mut challenge = [0u8; CHALLENGE_LEN];
    SystemRandom::new()
        .fill(&mut challenge)
        .map_err(|_| CodecError::Crypto("Failed to generate challenge".to_string()))?;
    Ok(challenge)
}

/// Serde adapter rendering `Vec<u8>` as unpadded base64url text.
pub(crate) mod base64url_bytes {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(crate) fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::encode_identifier(bytes))
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::decode_identifier(&text).map_err(D::Error::custom)
    }

    /// Same as the parent module, for optional fields.
    pub(crate) mod option {
        use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

        pub(crate) fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match bytes {
                Some(b) => serializer.serialize_str(&super::super::encode_identifier(b)),
                None => serializer.serialize_none(),
            }
        }

        pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Option::<String>::deserialize(deserializer)?
                .map(|text| super::super::decode_identifier(&text).map_err(D::Error::custom))
                .transpose()
        }
    }
}
