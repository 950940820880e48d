use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Admin {
    pub id: i64,
    pub organization_id: i64,
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
}

impl Admin {
    pub fn full_name(&self) -> String {
        super::join_name(&self.first_name, &self.last_name)
    }
}
