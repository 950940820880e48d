use serde_json::json;

use super::{create, delete, get_one, list, resource_path, update};
use crate::assemble::{self, to_resource};
use crate::config::EndpointPaths;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::model::{Admin, Caregiver, Doctor, Organization, SeniorCitizen};

/// Query-parameter filters accepted by the organization directory collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListQuery {
    pub organization_id: Option<i64>,
    pub user_id: Option<i64>,
    pub assigned_doctor_id: Option<i64>,
    pub assigned_caregiver_id: Option<i64>,
}

impl ListQuery {
    pub fn organization(id: i64) -> Self {
        Self {
            organization_id: Some(id),
            ..Self::default()
        }
    }

    pub fn user(id: i64) -> Self {
        Self {
            user_id: Some(id),
            ..Self::default()
        }
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        [
            ("organizationId", self.organization_id),
            ("userId", self.user_id),
            ("assignedDoctorId", self.assigned_doctor_id),
            ("assignedCaregiverId", self.assigned_caregiver_id),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k, v.to_string())))
        .collect()
    }
}

/// Doctors, caregivers, senior citizens, admins and organizations.
#[derive(Debug, Clone)]
pub struct OrganizationApi {
    client: ApiClient,
    paths: EndpointPaths,
}

fn id_required(what: &str) -> ApiError {
    ApiError::Validation(vec![format!("{what} id is required")])
}

impl OrganizationApi {
    pub fn new(client: ApiClient, paths: EndpointPaths) -> Self {
        Self { client, paths }
    }

    // Organizations

    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        list(&self.client, &self.paths.organizations, &[], assemble::organizations).await
    }

    pub async fn fetch_organization(&self, id: i64) -> Result<Organization, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.organizations, id),
            &format!("organization {id}"),
            assemble::organization,
        )
        .await
    }

    // Doctors

    pub async fn fetch_doctors(&self, query: ListQuery) -> Result<Vec<Doctor>, ApiError> {
        list(&self.client, &self.paths.doctors, &query.pairs(), assemble::doctors).await
    }

    pub async fn fetch_doctor(&self, id: i64) -> Result<Doctor, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.doctors, id),
            &format!("doctor {id}"),
            assemble::doctor,
        )
        .await
    }

    pub async fn create_doctor(&self, doctor: &Doctor) -> Result<Doctor, ApiError> {
        let body = to_resource(doctor, true)?;
        create(&self.client, &self.paths.doctors, &body, assemble::doctor).await
    }

    pub async fn update_doctor(&self, doctor: &Doctor) -> Result<Doctor, ApiError> {
        if doctor.id == 0 {
            return Err(id_required("doctor"));
        }
        let body = to_resource(doctor, false)?;
        update(
            &self.client,
            &resource_path(&self.paths.doctors, doctor.id),
            &body,
            assemble::doctor,
        )
        .await
    }

    pub async fn delete_doctor(&self, id: i64) -> Result<(), ApiError> {
        delete(&self.client, &resource_path(&self.paths.doctors, id)).await
    }

    // Caregivers

    pub async fn fetch_caregivers(&self, query: ListQuery) -> Result<Vec<Caregiver>, ApiError> {
        list(&self.client, &self.paths.caregivers, &query.pairs(), assemble::caregivers).await
    }

    pub async fn fetch_caregiver(&self, id: i64) -> Result<Caregiver, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.caregivers, id),
            &format!("caregiver {id}"),
            assemble::caregiver,
        )
        .await
    }

    pub async fn create_caregiver(&self, caregiver: &Caregiver) -> Result<Caregiver, ApiError> {
        let body = to_resource(caregiver, true)?;
        create(&self.client, &self.paths.caregivers, &body, assemble::caregiver).await
    }

    pub async fn update_caregiver(&self, caregiver: &Caregiver) -> Result<Caregiver, ApiError> {
        if caregiver.id == 0 {
            return Err(id_required("caregiver"));
        }
        let body = to_resource(caregiver, false)?;
        update(
            &self.client,
            &resource_path(&self.paths.caregivers, caregiver.id),
            &body,
            assemble::caregiver,
        )
        .await
    }

    pub async fn delete_caregiver(&self, id: i64) -> Result<(), ApiError> {
        delete(&self.client, &resource_path(&self.paths.caregivers, id)).await
    }

    // Senior citizens

    pub async fn fetch_senior_citizens(&self, query: ListQuery) -> Result<Vec<SeniorCitizen>, ApiError> {
        list(
            &self.client,
            &self.paths.senior_citizens,
            &query.pairs(),
            assemble::senior_citizens,
        )
        .await
    }

    pub async fn fetch_senior_citizen(&self, id: i64) -> Result<SeniorCitizen, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.senior_citizens, id),
            &format!("senior citizen {id}"),
            assemble::senior_citizen,
        )
        .await
    }

    pub async fn create_senior_citizen(&self, senior: &SeniorCitizen) -> Result<SeniorCitizen, ApiError> {
        let body = to_resource(senior, true)?;
        create(
            &self.client,
            &self.paths.senior_citizens,
            &body,
            assemble::senior_citizen,
        )
        .await
    }

    pub async fn update_senior_citizen(&self, senior: &SeniorCitizen) -> Result<SeniorCitizen, ApiError> {
        if senior.id == 0 {
            return Err(id_required("senior citizen"));
        }
        let body = to_resource(senior, false)?;
        update(
            &self.client,
            &resource_path(&self.paths.senior_citizens, senior.id),
            &body,
            assemble::senior_citizen,
        )
        .await
    }

    pub async fn delete_senior_citizen(&self, id: i64) -> Result<(), ApiError> {
        delete(&self.client, &resource_path(&self.paths.senior_citizens, id)).await
    }

    // Admins

    pub async fn fetch_admins(&self, query: ListQuery) -> Result<Vec<Admin>, ApiError> {
        list(&self.client, &self.paths.admins, &query.pairs(), assemble::admins).await
    }

    // Assignment sub-resources: POST to assign, DELETE to unassign.

    fn assignment_path(base: &str, owner_id: i64) -> String {
        format!("{}/senior-citizens", resource_path(base, owner_id))
    }

    pub async fn assign_doctor(&self, doctor_id: i64, senior_id: i64) -> Result<(), ApiError> {
        let path = Self::assignment_path(&self.paths.doctors, doctor_id);
        self.client
            .post(&path, &json!({ "seniorCitizenId": senior_id }))
            .await
            .map(|_| ())
    }

    pub async fn unassign_doctor(&self, doctor_id: i64, senior_id: i64) -> Result<(), ApiError> {
        let path = resource_path(&Self::assignment_path(&self.paths.doctors, doctor_id), senior_id);
        delete(&self.client, &path).await
    }

    pub async fn assign_caregiver(&self, caregiver_id: i64, senior_id: i64) -> Result<(), ApiError> {
        let path = Self::assignment_path(&self.paths.caregivers, caregiver_id);
        self.client
            .post(&path, &json!({ "seniorCitizenId": senior_id }))
            .await
            .map(|_| ())
    }

    pub async fn unassign_caregiver(&self, caregiver_id: i64, senior_id: i64) -> Result<(), ApiError> {
        let path = resource_path(&Self::assignment_path(&self.paths.caregivers, caregiver_id), senior_id);
        delete(&self.client, &path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_pairs_skip_unset() {
        assert!(ListQuery::default().pairs().is_empty());
        let q = ListQuery {
            organization_id: Some(5),
            assigned_doctor_id: Some(42),
            ..ListQuery::default()
        };
        assert_eq!(
            q.pairs(),
            vec![
                ("organizationId", "5".to_string()),
                ("assignedDoctorId", "42".to_string())
            ]
        );
    }

    #[test]
    fn assignment_paths() {
        assert_eq!(
            OrganizationApi::assignment_path("/doctors", 42),
            "/doctors/42/senior-citizens"
        );
    }
}
