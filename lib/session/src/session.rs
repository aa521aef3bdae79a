//! The authenticated identity resolved from a stored token.
//!
//! A `Session` is a memory-only projection of the identity service's
//! profile for the bearer of the current access token. It is never
//! persisted; the token is the durable credential.

use compliance_console_core::{CompanyId, UserId};
use serde::{Deserialize, Serialize};

use crate::role::Role;

/// Canonical profile of the signed-in user.
///
/// Deserializes directly from the identity service's `/auth/me` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// The user's numeric id.
    id: UserId,
    /// Login email address.
    email: String,
    /// Display name.
    full_name: String,
    /// Role assigned by the identity service.
    role: Role,
    /// Whether multi-factor authentication is enabled for the account.
    #[serde(default)]
    mfa_enabled: bool,
    /// Company that owns the account.
    company_id: CompanyId,
}

impl Session {
    /// Creates a session from profile fields.
    #[must_use]
    pub fn new(
        id: UserId,
        email: String,
        full_name: String,
        role: Role,
        mfa_enabled: bool,
        company_id: CompanyId,
    ) -> Self {
        Self {
            id,
            email,
            full_name,
            role,
            mfa_enabled,
            company_id,
        }
    }

    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the name to show in the UI, falling back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.email
        } else {
            &self.full_name
        }
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn mfa_enabled(&self) -> bool {
        self.mfa_enabled
    }

    #[must_use]
    pub fn company_id(&self) -> CompanyId {
        self.company_id
    }

    /// Returns true if the user is a super-admin.
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }
}
