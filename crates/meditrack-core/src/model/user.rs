use serde::{Deserialize, Serialize};

use super::Role;

/// Directory entry from the users endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: Option<i64>,
    pub email: String,
    pub role: Role,
    pub entity_id: Option<i64>,
    pub organization_id: Option<i64>,
}
