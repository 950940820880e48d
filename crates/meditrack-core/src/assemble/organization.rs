use serde_json::Value;

use super::{collection, entity, object};
use crate::error::ApiError;
use crate::model::{split_full_name, Admin, Caregiver, Doctor, Organization, SeniorCitizen};

/// Resource with `firstName`/`lastName` filled from `fullName` when both are missing.
fn with_split_name(resource: &Value) -> Value {
    let mut map = object(resource);
    let has_parts = ["firstName", "lastName"]
        .iter()
        .any(|k| map.get(*k).and_then(Value::as_str).is_some_and(|s| !s.is_empty()));
    if !has_parts {
        if let Some(full) = map.get("fullName").and_then(Value::as_str) {
            let (first, last) = split_full_name(full);
            map.insert("firstName".to_string(), Value::String(first));
            map.insert("lastName".to_string(), Value::String(last));
        }
    }
    Value::Object(map)
}

pub fn doctor(resource: &Value) -> Result<Doctor, ApiError> {
    entity(&with_split_name(resource))
}

pub fn doctors(body: &Value) -> Result<Vec<Doctor>, ApiError> {
    collection(body, "doctors")?.iter().map(doctor).collect()
}

pub fn caregiver(resource: &Value) -> Result<Caregiver, ApiError> {
    entity(&with_split_name(resource))
}

pub fn caregivers(body: &Value) -> Result<Vec<Caregiver>, ApiError> {
    collection(body, "caregivers")?.iter().map(caregiver).collect()
}

/// Senior citizen with whichever of age / birth date was missing filled in from the other.
pub fn senior_citizen(resource: &Value) -> Result<SeniorCitizen, ApiError> {
    let mut senior: SeniorCitizen = entity(resource)?;
    senior.reconcile_age(chrono::Local::now().date_naive());
    Ok(senior)
}

pub fn senior_citizens(body: &Value) -> Result<Vec<SeniorCitizen>, ApiError> {
    collection(body, "seniorCitizens")?
        .iter()
        .map(senior_citizen)
        .collect()
}

pub fn admin(resource: &Value) -> Result<Admin, ApiError> {
    entity(&with_split_name(resource))
}

pub fn admins(body: &Value) -> Result<Vec<Admin>, ApiError> {
    collection(body, "admins")?.iter().map(admin).collect()
}

pub fn organization(resource: &Value) -> Result<Organization, ApiError> {
    entity(resource)
}

pub fn organizations(body: &Value) -> Result<Vec<Organization>, ApiError> {
    collection(body, "organizations")?
        .iter()
        .map(organization)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn doctor_full_name_is_split() {
        let d = doctor(&json!({"id": 42, "organizationId": 5, "fullName": "Carlos Alberto Ruiz"})).unwrap();
        assert_eq!(d.first_name, "Carlos");
        assert_eq!(d.last_name, "Alberto Ruiz");
        assert_eq!(d.full_name(), "Carlos Alberto Ruiz");
    }

    #[test]
    fn explicit_names_win_over_full_name() {
        let c = caregiver(&json!({"id": 7, "firstName": "Lia", "lastName": null, "fullName": "X Y"})).unwrap();
        assert_eq!(c.first_name, "Lia");
        assert_eq!(c.last_name, "");
    }

    #[test]
    fn caregivers_from_bare_array_with_nulls() {
        let body = json!([{"id": 1, "organizationId": 5, "age": null, "assignedSeniorIds": null}]);
        let list = caregivers(&body).unwrap();
        assert_eq!(list[0].age, 0);
        assert!(list[0].assigned_senior_ids.is_empty());
    }

    #[test]
    fn seniors_from_wrapped_collection() {
        let body = json!({"seniorCitizens": [
            {"id": 1, "organizationId": 5, "assignedDoctorId": 42, "age": 80, "birthDate": "1946-05-01"},
            {"id": 2, "organizationId": 5, "assignedDoctorId": null, "planType": "premium"}
        ]});
        let list = senior_citizens(&body).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].assigned_doctor_id, Some(42));
        assert_eq!(list[0].age, 80);
        assert_eq!(list[1].assigned_doctor_id, None);
        assert!(list[1].birth_date.is_none());
    }

    #[test]
    fn organization_type_key() {
        let org = organization(&json!({"id": 5, "name": "Clinica Sol", "type": "clinic"})).unwrap();
        assert_eq!(org.kind, "clinic");
        let list = organizations(&json!({"organizations": [{"id": 5}]})).unwrap();
        assert_eq!(list[0].id, 5);
    }

    #[test]
    fn non_object_resource_is_network_error() {
        assert!(matches!(doctor(&json!("nope")), Err(ApiError::Network(_))));
    }
}
