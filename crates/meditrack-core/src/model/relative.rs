use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::SeniorCitizen;

/// Plan tier of a relative account. Premium unlocks extras such as data export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlanType {
    #[default]
    Freemium,
    Premium,
}

impl PlanType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlanType::Freemium => "freemium",
            PlanType::Premium => "premium",
        }
    }

    pub fn parse(s: &str) -> Option<PlanType> {
        match s.trim().to_ascii_lowercase().as_str() {
            "freemium" | "free" => Some(PlanType::Freemium),
            "premium" => Some(PlanType::Premium),
            _ => None,
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PlanType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Unknown or null plans read as freemium.
impl<'de> Deserialize<'de> for PlanType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(PlanType::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Relative {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub plan_type: PlanType,
    pub senior_citizen_id: Option<i64>,
    pub senior_citizen: Option<SeniorCitizen>,
}

impl Relative {
    pub fn full_name(&self) -> String {
        super::join_name(&self.first_name, &self.last_name)
    }
}

pub fn is_premium(relative: &Relative) -> bool {
    relative.plan_type == PlanType::Premium
}

pub fn is_freemium(relative: &Relative) -> bool {
    relative.plan_type == PlanType::Freemium
}
