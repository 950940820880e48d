use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Doctor {
    pub id: i64,
    pub organization_id: i64,
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub specialty: String,
    pub email: String,
    pub phone_number: String,
    pub image_url: String,
    pub assigned_senior_ids: Vec<i64>,
}

impl Doctor {
    pub fn full_name(&self) -> String {
        super::join_name(&self.first_name, &self.last_name)
    }

    pub fn assign_to_senior(&mut self, senior_id: i64) {
        if !self.assigned_senior_ids.contains(&senior_id) {
            self.assigned_senior_ids.push(senior_id);
        }
    }

    pub fn unassign_from_senior(&mut self, senior_id: i64) {
        self.assigned_senior_ids.retain(|id| *id != senior_id);
    }
}
