use serde::{Deserialize, Serialize};

/// A tenant: clinic or residence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    /// e.g. "clinic", "resident".
    #[serde(rename = "type")]
    pub kind: String,
}
