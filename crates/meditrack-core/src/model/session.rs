use serde::{Deserialize, Serialize};

use super::Role;

/// Identity of the signed-in user, as held by the session manager and persisted
/// under the `currentUser` storage key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CurrentUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
    /// Id of the role-specific record (doctor, caregiver, relative, admin).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,
    /// Held in memory only; the persisted credential lives under the `token` keys.
    #[serde(skip)]
    pub token: Option<String>,
}

impl CurrentUser {
    /// A persisted user is only trusted if it carries an id or a non-empty email.
    pub fn has_identity(&self) -> bool {
        self.id.is_some() || self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }
}
