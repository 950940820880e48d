use std::future::Future;
use std::sync::{Mutex, RwLock};

use super::{filter_senior_citizens, OrganizationContext, TenantScoped};
use crate::api::{ListQuery, OrganizationApi};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::flight::{FlightKey, SingleFlight};
use crate::http::ApiClient;
use crate::loading::LoadingFlag;
use crate::model::{Admin, Caregiver, CurrentUser, Doctor, Organization, Role, SeniorCitizen};

#[derive(Debug, Default)]
struct OrgState {
    context: Option<OrganizationContext>,
    /// Bumped whenever the tenant changes; fetches started under an older value are discarded.
    generation: u64,
    organizations: Vec<Organization>,
    organizations_loaded: bool,
    organization: Option<Organization>,
    doctors: Vec<Doctor>,
    doctors_loaded: bool,
    caregivers: Vec<Caregiver>,
    caregivers_loaded: bool,
    senior_citizens: Vec<SeniorCitizen>,
    senior_citizens_loaded: bool,
    admins: Vec<Admin>,
    admins_loaded: bool,
}

impl OrgState {
    fn clear_tenant_data(&mut self) {
        self.organization = None;
        self.doctors.clear();
        self.doctors_loaded = false;
        self.caregivers.clear();
        self.caregivers_loaded = false;
        self.senior_citizens.clear();
        self.senior_citizens_loaded = false;
        self.admins.clear();
        self.admins_loaded = false;
    }

    fn tenant(&self) -> Option<i64> {
        self.context
            .filter(OrganizationContext::has_tenant)
            .map(|c| c.organization_id)
    }

    /// Whether a record of `organization_id` belongs in the current collections.
    fn admits(&self, organization_id: i64) -> bool {
        self.tenant().map_or(true, |t| t == organization_id)
    }
}

fn by_tenant<T: TenantScoped + Clone>(items: &[T], tenant: Option<i64>) -> Vec<T> {
    match tenant {
        Some(t) => items.iter().filter(|i| i.organization_id() == t).cloned().collect(),
        None => Vec::new(),
    }
}

fn upsert<T>(items: &mut Vec<T>, item: T, same: impl Fn(&T) -> bool) {
    match items.iter_mut().find(|i| same(i)) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// Owns the tenant's collections and the organization context.
///
/// Every collection fetch goes through a single-flight table keyed by
/// `(collection, organization id)`. Switching to another organization clears
/// the tenant collections; fetches that complete afterwards are dropped.
pub struct OrganizationStore {
    api: OrganizationApi,
    state: RwLock<OrgState>,
    errors: Mutex<Vec<ApiError>>,
    loading: LoadingFlag,
    organizations_flight: SingleFlight<Vec<Organization>>,
    organization_flight: SingleFlight<Organization>,
    doctors_flight: SingleFlight<Vec<Doctor>>,
    caregivers_flight: SingleFlight<Vec<Caregiver>>,
    seniors_flight: SingleFlight<Vec<SeniorCitizen>>,
    admins_flight: SingleFlight<Vec<Admin>>,
}

impl OrganizationStore {
    pub fn new(api: OrganizationApi) -> Self {
        Self {
            api,
            state: RwLock::new(OrgState::default()),
            errors: Mutex::new(Vec::new()),
            loading: LoadingFlag::new(),
            organizations_flight: SingleFlight::new(),
            organization_flight: SingleFlight::new(),
            doctors_flight: SingleFlight::new(),
            caregivers_flight: SingleFlight::new(),
            seniors_flight: SingleFlight::new(),
            admins_flight: SingleFlight::new(),
        }
    }

    pub fn from_config(client: ApiClient, cfg: &ClientConfig) -> Self {
        Self::new(OrganizationApi::new(client, cfg.endpoints.clone()))
    }

    fn record<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            self.errors.lock().unwrap().push(e.clone());
        }
        result
    }

    pub fn errors(&self) -> Vec<ApiError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn clear_errors(&self) {
        self.errors.lock().unwrap().clear();
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    // Context

    pub fn context(&self) -> Option<OrganizationContext> {
        self.state.read().unwrap().context
    }

    /// Install the context. Moving to another organization drops every tenant collection.
    pub fn set_context(&self, context: OrganizationContext) {
        let mut state = self.state.write().unwrap();
        let previous = state.context.map(|c| c.organization_id);
        if previous.is_some_and(|p| p != context.organization_id) {
            tracing::info!(
                from = ?previous,
                to = context.organization_id,
                "organization changed; clearing tenant data"
            );
            state.clear_tenant_data();
            state.generation += 1;
        }
        state.context = Some(context);
    }

    pub fn clear_context(&self) {
        let mut state = self.state.write().unwrap();
        state.context = None;
        state.clear_tenant_data();
        state.generation += 1;
    }

    /// Derive the context for `user`: straight from the session when it names the
    /// organization and the role record, otherwise by looking up the admin, doctor or
    /// caregiver record linked to the user id.
    pub async fn resolve_context(&self, user: &CurrentUser) -> Result<OrganizationContext, ApiError> {
        let _loading = self.loading.begin();
        let result = self.lookup_context(user).await;
        if let Ok(ctx) = &result {
            self.set_context(*ctx);
        }
        self.record(result)
    }

    async fn lookup_context(&self, user: &CurrentUser) -> Result<OrganizationContext, ApiError> {
        if let Some(ctx) = OrganizationContext::from_session(user) {
            if ctx.entity_id.is_some() || !matches!(user.role, Role::Admin | Role::Doctor | Role::Caregiver) {
                return Ok(ctx);
            }
        }
        let user_id = user.id.ok_or_else(|| ApiError::NotFound {
            resource: "organization context for anonymous user".to_string(),
            status: 404,
        })?;
        let missing = |what: &str| ApiError::NotFound {
            resource: format!("{what} for user {user_id}"),
            status: 404,
        };
        let query = ListQuery::user(user_id);
        let (organization_id, entity_id) = match user.role {
            Role::Admin => {
                let admins = self.api.fetch_admins(query).await?;
                let a = admins.first().ok_or_else(|| missing("admin"))?;
                (a.organization_id, a.id)
            }
            Role::Doctor => {
                let doctors = self.api.fetch_doctors(query).await?;
                let d = doctors.first().ok_or_else(|| missing("doctor"))?;
                (d.organization_id, d.id)
            }
            Role::Caregiver => {
                let caregivers = self.api.fetch_caregivers(query).await?;
                let c = caregivers.first().ok_or_else(|| missing("caregiver"))?;
                (c.organization_id, c.id)
            }
            Role::Relative | Role::User => return Err(missing("organization")),
        };
        Ok(OrganizationContext::new(organization_id, user.role, Some(entity_id)))
    }

    /// Run a tenant-scoped collection fetch and store the result if the tenant did
    /// not change meanwhile.
    async fn fetch_scoped<T, F, Fut>(
        &self,
        collection: &'static str,
        flight: &SingleFlight<Vec<T>>,
        fetch: F,
        apply: fn(&mut OrgState, Vec<T>),
    ) -> Result<Vec<T>, ApiError>
    where
        T: TenantScoped + Clone,
        F: FnOnce(ListQuery) -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let _loading = self.loading.begin();
        let (generation, tenant) = {
            let state = self.state.read().unwrap();
            (state.generation, state.tenant())
        };
        let query = tenant.map(ListQuery::organization).unwrap_or_default();

        let result = flight
            .run(FlightKey::new(collection, tenant.unwrap_or(0)), || fetch(query))
            .await
            .map(|items| match tenant {
                Some(t) => items.into_iter().filter(|i| i.organization_id() == t).collect(),
                None => items,
            });

        if let Ok(items) = &result {
            let mut state = self.state.write().unwrap();
            if state.generation == generation {
                apply(&mut state, items.clone());
            } else {
                tracing::warn!(collection, "organization changed during fetch; result discarded");
            }
        }
        self.record(result)
    }

    /// Apply a mutation's outcome unless the tenant changed while it was in flight.
    fn apply_if_current(&self, generation: u64, apply: impl FnOnce(&mut OrgState)) {
        let mut state = self.state.write().unwrap();
        if state.generation == generation {
            apply(&mut state);
        }
    }

    fn generation(&self) -> u64 {
        self.state.read().unwrap().generation
    }

    // Organizations

    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        let _loading = self.loading.begin();
        let result = self
            .organizations_flight
            .run(FlightKey::unscoped("organizations"), || self.api.fetch_organizations())
            .await;
        if let Ok(list) = &result {
            let mut state = self.state.write().unwrap();
            state.organizations = list.clone();
            state.organizations_loaded = true;
        }
        self.record(result)
    }

    /// Fetch one organization and make it the current one. Concurrent calls for the
    /// same id share a request.
    pub async fn fetch_organization_by_id(&self, id: i64) -> Result<Organization, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self
            .organization_flight
            .run(FlightKey::new("organization", id), || self.api.fetch_organization(id))
            .await;
        if let Ok(org) = &result {
            self.apply_if_current(generation, |state| {
                if state.admits(org.id) {
                    state.organization = Some(org.clone());
                }
            });
        }
        self.record(result)
    }

    pub fn organizations(&self) -> Vec<Organization> {
        self.state.read().unwrap().organizations.clone()
    }

    pub fn organizations_loaded(&self) -> bool {
        self.state.read().unwrap().organizations_loaded
    }

    pub fn organization(&self) -> Option<Organization> {
        self.state.read().unwrap().organization.clone()
    }

    // Doctors

    pub async fn fetch_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.fetch_scoped(
            "doctors",
            &self.doctors_flight,
            |q| self.api.fetch_doctors(q),
            |state, items| {
                state.doctors = items;
                state.doctors_loaded = true;
            },
        )
        .await
    }

    pub fn doctors(&self) -> Vec<Doctor> {
        self.state.read().unwrap().doctors.clone()
    }

    pub fn doctors_loaded(&self) -> bool {
        self.state.read().unwrap().doctors_loaded
    }

    /// Loaded doctors of the context's organization (empty without a tenant).
    pub fn doctors_by_organization(&self) -> Vec<Doctor> {
        let state = self.state.read().unwrap();
        by_tenant(&state.doctors, state.tenant())
    }

    pub fn doctors_by_organization_count(&self) -> usize {
        if self.doctors_loaded() {
            self.doctors_by_organization().len()
        } else {
            0
        }
    }

    pub fn doctor_by_id(&self, id: i64) -> Option<Doctor> {
        self.doctors_by_organization().into_iter().find(|d| d.id == id)
    }

    pub async fn add_doctor(&self, doctor: &Doctor) -> Result<Doctor, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self.api.create_doctor(doctor).await;
        if let Ok(created) = &result {
            self.apply_if_current(generation, |state| {
                if state.admits(created.organization_id) {
                    upsert(&mut state.doctors, created.clone(), |d| d.id == created.id);
                }
            });
        }
        self.record(result)
    }

    pub async fn update_doctor(&self, doctor: &Doctor) -> Result<Doctor, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self.api.update_doctor(doctor).await;
        if let Ok(updated) = &result {
            self.apply_if_current(generation, |state| {
                state.doctors.retain(|d| d.id != updated.id);
                if state.admits(updated.organization_id) {
                    state.doctors.push(updated.clone());
                }
            });
        }
        self.record(result)
    }

    pub async fn delete_doctor(&self, id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.delete_doctor(id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            state.doctors.retain(|d| d.id != id);
            for s in state.senior_citizens.iter_mut().filter(|s| s.assigned_doctor_id == Some(id)) {
                s.assigned_doctor_id = None;
            }
        }
        self.record(result)
    }

    // Caregivers

    pub async fn fetch_caregivers(&self) -> Result<Vec<Caregiver>, ApiError> {
        self.fetch_scoped(
            "caregivers",
            &self.caregivers_flight,
            |q| self.api.fetch_caregivers(q),
            |state, items| {
                state.caregivers = items;
                state.caregivers_loaded = true;
            },
        )
        .await
    }

    pub fn caregivers(&self) -> Vec<Caregiver> {
        self.state.read().unwrap().caregivers.clone()
    }

    pub fn caregivers_loaded(&self) -> bool {
        self.state.read().unwrap().caregivers_loaded
    }

    pub fn caregivers_by_organization(&self) -> Vec<Caregiver> {
        let state = self.state.read().unwrap();
        by_tenant(&state.caregivers, state.tenant())
    }

    pub fn caregivers_by_organization_count(&self) -> usize {
        if self.caregivers_loaded() {
            self.caregivers_by_organization().len()
        } else {
            0
        }
    }

    pub fn caregiver_by_id(&self, id: i64) -> Option<Caregiver> {
        self.caregivers_by_organization().into_iter().find(|c| c.id == id)
    }

    pub async fn add_caregiver(&self, caregiver: &Caregiver) -> Result<Caregiver, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self.api.create_caregiver(caregiver).await;
        if let Ok(created) = &result {
            self.apply_if_current(generation, |state| {
                if state.admits(created.organization_id) {
                    upsert(&mut state.caregivers, created.clone(), |c| c.id == created.id);
                }
            });
        }
        self.record(result)
    }

    pub async fn update_caregiver(&self, caregiver: &Caregiver) -> Result<Caregiver, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self.api.update_caregiver(caregiver).await;
        if let Ok(updated) = &result {
            self.apply_if_current(generation, |state| {
                state.caregivers.retain(|c| c.id != updated.id);
                if state.admits(updated.organization_id) {
                    state.caregivers.push(updated.clone());
                }
            });
        }
        self.record(result)
    }

    pub async fn delete_caregiver(&self, id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.delete_caregiver(id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            state.caregivers.retain(|c| c.id != id);
            for s in state
                .senior_citizens
                .iter_mut()
                .filter(|s| s.assigned_caregiver_id == Some(id))
            {
                s.assigned_caregiver_id = None;
            }
        }
        self.record(result)
    }

    // Senior citizens

    pub async fn fetch_senior_citizens(&self) -> Result<Vec<SeniorCitizen>, ApiError> {
        self.fetch_scoped(
            "senior-citizens",
            &self.seniors_flight,
            |q| self.api.fetch_senior_citizens(q),
            |state, items| {
                state.senior_citizens = items;
                state.senior_citizens_loaded = true;
            },
        )
        .await
    }

    pub fn senior_citizens(&self) -> Vec<SeniorCitizen> {
        self.state.read().unwrap().senior_citizens.clone()
    }

    pub fn senior_citizens_loaded(&self) -> bool {
        self.state.read().unwrap().senior_citizens_loaded
    }

    /// Seniors visible to the current context; recomputed on every call.
    pub fn filtered_senior_citizens(&self) -> Vec<SeniorCitizen> {
        let state = self.state.read().unwrap();
        filter_senior_citizens(&state.senior_citizens, state.context.as_ref())
    }

    pub fn filtered_senior_citizens_count(&self) -> usize {
        self.filtered_senior_citizens().len()
    }

    pub fn senior_citizen_by_id(&self, id: i64) -> Option<SeniorCitizen> {
        self.filtered_senior_citizens().into_iter().find(|s| s.id == id)
    }

    pub async fn add_senior_citizen(&self, senior: &SeniorCitizen) -> Result<SeniorCitizen, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self.api.create_senior_citizen(senior).await;
        if let Ok(created) = &result {
            self.apply_if_current(generation, |state| {
                if state.admits(created.organization_id) {
                    upsert(&mut state.senior_citizens, created.clone(), |s| s.id == created.id);
                }
            });
        }
        self.record(result)
    }

    pub async fn update_senior_citizen(&self, senior: &SeniorCitizen) -> Result<SeniorCitizen, ApiError> {
        let _loading = self.loading.begin();
        let generation = self.generation();
        let result = self.api.update_senior_citizen(senior).await;
        if let Ok(updated) = &result {
            self.apply_if_current(generation, |state| {
                state.senior_citizens.retain(|s| s.id != updated.id);
                if state.admits(updated.organization_id) {
                    state.senior_citizens.push(updated.clone());
                }
            });
        }
        self.record(result)
    }

    pub async fn delete_senior_citizen(&self, id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.delete_senior_citizen(id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            state.senior_citizens.retain(|s| s.id != id);
            for d in state.doctors.iter_mut() {
                d.unassign_from_senior(id);
            }
            for c in state.caregivers.iter_mut() {
                c.unassign_from_senior(id);
            }
        }
        self.record(result)
    }

    // Admins

    pub async fn fetch_admins(&self) -> Result<Vec<Admin>, ApiError> {
        self.fetch_scoped(
            "admins",
            &self.admins_flight,
            |q| self.api.fetch_admins(q),
            |state, items| {
                state.admins = items;
                state.admins_loaded = true;
            },
        )
        .await
    }

    pub fn admins(&self) -> Vec<Admin> {
        self.state.read().unwrap().admins.clone()
    }

    pub fn admins_loaded(&self) -> bool {
        self.state.read().unwrap().admins_loaded
    }

    // Assignments

    /// Assign `doctor_id` to the senior. A senior has at most one doctor, so any
    /// previous doctor loses the senior locally.
    pub async fn assign_doctor(&self, senior_id: i64, doctor_id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.assign_doctor(doctor_id, senior_id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            for s in state.senior_citizens.iter_mut().filter(|s| s.id == senior_id) {
                s.assigned_doctor_id = Some(doctor_id);
            }
            for d in state.doctors.iter_mut() {
                if d.id == doctor_id {
                    d.assign_to_senior(senior_id);
                } else {
                    d.unassign_from_senior(senior_id);
                }
            }
        }
        self.record(result)
    }

    pub async fn unassign_doctor(&self, senior_id: i64, doctor_id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.unassign_doctor(doctor_id, senior_id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            for s in state
                .senior_citizens
                .iter_mut()
                .filter(|s| s.id == senior_id && s.assigned_doctor_id == Some(doctor_id))
            {
                s.assigned_doctor_id = None;
            }
            for d in state.doctors.iter_mut().filter(|d| d.id == doctor_id) {
                d.unassign_from_senior(senior_id);
            }
        }
        self.record(result)
    }

    /// Assign `caregiver_id` to the senior; a previous caregiver loses the senior locally.
    pub async fn assign_caregiver(&self, senior_id: i64, caregiver_id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.assign_caregiver(caregiver_id, senior_id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            for s in state.senior_citizens.iter_mut().filter(|s| s.id == senior_id) {
                s.assigned_caregiver_id = Some(caregiver_id);
            }
            for c in state.caregivers.iter_mut() {
                if c.id == caregiver_id {
                    c.assign_to_senior(senior_id);
                } else {
                    c.unassign_from_senior(senior_id);
                }
            }
        }
        self.record(result)
    }

    pub async fn unassign_caregiver(&self, senior_id: i64, caregiver_id: i64) -> Result<(), ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.unassign_caregiver(caregiver_id, senior_id).await;
        if result.is_ok() {
            let mut state = self.state.write().unwrap();
            for s in state
                .senior_citizens
                .iter_mut()
                .filter(|s| s.id == senior_id && s.assigned_caregiver_id == Some(caregiver_id))
            {
                s.assigned_caregiver_id = None;
            }
            for c in state.caregivers.iter_mut().filter(|c| c.id == caregiver_id) {
                c.unassign_from_senior(senior_id);
            }
        }
        self.record(result)
    }
}
