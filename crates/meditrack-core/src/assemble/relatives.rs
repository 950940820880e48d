use serde_json::Value;

use super::{collection, entity, first_str, object, senior_citizen};
use crate::error::ApiError;
use crate::model::{PlanType, Relative};

/// Relative with its plan read from `planType`, `PlanType` or `plan.type`, and the
/// embedded senior citizen (if any) assembled like any other senior.
pub fn relative(resource: &Value) -> Result<Relative, ApiError> {
    let mut map = object(resource);
    let plan = first_str(resource, &["planType", "PlanType", "plan.type"])
        .and_then(|p| PlanType::parse(&p))
        .unwrap_or_default();
    map.remove("PlanType");
    map.remove("plan");
    let senior = map.remove("seniorCitizen");
    map.insert("planType".to_string(), Value::String(plan.as_str().to_string()));

    let mut relative: Relative = entity(&Value::Object(map))?;
    if let Some(senior) = senior.filter(Value::is_object) {
        let senior = senior_citizen(&senior)?;
        relative.senior_citizen_id.get_or_insert(senior.id);
        relative.senior_citizen = Some(senior);
    }
    Ok(relative)
}

pub fn relatives(body: &Value) -> Result<Vec<Relative>, ApiError> {
    collection(body, "relatives")?.iter().map(relative).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{is_freemium, is_premium};
    use serde_json::json;

    #[test]
    fn plan_from_alternate_keys() {
        let r = relative(&json!({"id": 1, "plan": {"type": "premium"}})).unwrap();
        assert!(is_premium(&r));
        let r = relative(&json!({"id": 2, "PlanType": "Premium"})).unwrap();
        assert!(is_premium(&r));
        let r = relative(&json!({"id": 3, "planType": null})).unwrap();
        assert!(is_freemium(&r));
    }

    #[test]
    fn embedded_senior_is_assembled() {
        let r = relative(&json!({
            "id": 1,
            "firstName": "Valeria",
            "seniorCitizen": {"id": 8, "organizationId": 5, "firstName": "Jorge", "age": 79}
        }))
        .unwrap();
        assert_eq!(r.senior_citizen_id, Some(8));
        let senior = r.senior_citizen.unwrap();
        assert_eq!(senior.full_name(), "Jorge");
        assert!(senior.birth_date.is_some());
    }
}
