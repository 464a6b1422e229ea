//! Side-effect free capability queries against a host.

use crate::host::CeremonyHost;

/// True iff the host exposes the credential type marker, a credentials
/// container, and both ceremony primitives.
pub fn is_supported<H>(host: &H) -> bool
where
    H: CeremonyHost + ?Sized,
{
    let supported = host.capabilities().supports_ceremonies();
    tracing::trace!("Ceremony API supported: {}", supported);
    supported
}

/// Asks the host whether a user-verifying platform authenticator is usable.
///
/// This is a UX hint only. A missing query, or a query that fails for any
/// reason, reports `false` instead of an error.
pub async fn is_platform_authenticator_available<H>(host: &H) -> bool
where
    H: CeremonyHost + ?Sized,
{
    let capabilities = host.capabilities();
    if !capabilities.public_key_credential || !capabilities.platform_authenticator_query {
        tracing::trace!("Platform authenticator query not available");
        return false;
    }

    match host
        .is_user_verifying_platform_authenticator_available()
        .await
    {
        Ok(available) => {
            tracing::trace!("Platform authenticator available: {}", available);
            available
        }
        Err(e) => {
            tracing::debug!("Platform authenticator query failed: {}", e);
            false
        }
    }
}
