//! The signed-in relative's own record and plan.

use std::sync::{Mutex, RwLock};

use crate::api::RelativesApi;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::loading::LoadingFlag;
use crate::model::{is_premium, CurrentUser, PlanType, Relative, Role};

pub struct RelativesStore {
    api: RelativesApi,
    relative: RwLock<Option<Relative>>,
    errors: Mutex<Vec<ApiError>>,
    loading: LoadingFlag,
}

impl RelativesStore {
    pub fn new(api: RelativesApi) -> Self {
        Self {
            api,
            relative: RwLock::new(None),
            errors: Mutex::new(Vec::new()),
            loading: LoadingFlag::new(),
        }
    }

    pub fn from_config(client: ApiClient, cfg: &ClientConfig) -> Self {
        Self::new(RelativesApi::new(client, cfg.endpoints.clone()))
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

    /// Load the relative record of the signed-in user.
    ///
    /// Uses the session's `entity_id` when known, otherwise looks the record up by
    /// user id. Only relatives have such a record.
    pub async fn fetch_relative_for(&self, user: &CurrentUser) -> Result<Relative, ApiError> {
        let _loading = self.loading.begin();
        let result = match (user.role, user.entity_id, user.id) {
            (Role::Relative, Some(entity_id), _) => self.api.fetch_relative(entity_id).await,
            (Role::Relative, None, Some(user_id)) => self.api.fetch_relative_by_user_id(user_id).await,
            (role, ..) => Err(ApiError::NotFound {
                resource: format!("relative record for {role} session"),
                status: 404,
            }),
        };
        self.store(result)
    }

    pub async fn fetch_relative_by_user_id(&self, user_id: i64) -> Result<Relative, ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.fetch_relative_by_user_id(user_id).await;
        self.store(result)
    }

    pub async fn update_relative(&self, relative: &Relative) -> Result<Relative, ApiError> {
        let _loading = self.loading.begin();
        let result = self.api.update_relative(relative).await;
        self.store(result)
    }

    fn store(&self, result: Result<Relative, ApiError>) -> Result<Relative, ApiError> {
        if let Ok(relative) = &result {
            tracing::debug!(id = ?relative.id, plan = %relative.plan_type, "relative loaded");
            *self.relative.write().unwrap() = Some(relative.clone());
        }
        self.record(result)
    }

    pub fn relative(&self) -> Option<Relative> {
        self.relative.read().unwrap().clone()
    }

    pub fn clear(&self) {
        *self.relative.write().unwrap() = None;
    }

    /// Plan of the loaded relative; freemium until one is loaded.
    pub fn plan_type(&self) -> PlanType {
        self.relative
            .read()
            .unwrap()
            .as_ref()
            .map(|r| r.plan_type)
            .unwrap_or_default()
    }

    pub fn is_premium(&self) -> bool {
        self.relative.read().unwrap().as_ref().is_some_and(is_premium)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EndpointPaths;
    use crate::http::mock::MockTransport;
    use crate::http::Method;
    use crate::storage::ClientStorage;
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> (Arc<MockTransport>, RelativesStore) {
        let mock = Arc::new(MockTransport::new());
        let client =
            ApiClient::new("http://api.test/api/v1", mock.clone(), ClientStorage::in_memory())
                .unwrap();
        let store = RelativesStore::new(RelativesApi::new(client, EndpointPaths::default()));
        (mock, store)
    }

    fn relative_user(entity_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: Some(12),
            role: Role::Relative,
            entity_id,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn fetch_for_session_uses_entity_id() {
        let (mock, store) = store();
        mock.on(
            Method::Get,
            "/relatives/3",
            200,
            json!({"id": 3, "userId": 12, "firstName": "Lucia", "PlanType": "premium", "seniorCitizenId": 1}),
        );
        assert_eq!(store.plan_type(), PlanType::Freemium);

        let r = store.fetch_relative_for(&relative_user(Some(3))).await.unwrap();
        assert_eq!(r.first_name, "Lucia");
        assert!(store.is_premium());
        assert_eq!(store.plan_type(), PlanType::Premium);
        assert_eq!(mock.count(Method::Get, "/relatives/3"), 1);
    }

    #[tokio::test]
    async fn fetch_for_session_falls_back_to_user_lookup() {
        let (mock, store) = store();
        mock.on(Method::Get, "/relatives/user/12", 200, json!({"id": 3, "userId": 12}));
        let r = store.fetch_relative_for(&relative_user(None)).await.unwrap();
        assert_eq!(r.id, Some(3));
        assert!(!store.is_premium());
    }

    #[tokio::test]
    async fn non_relative_session_has_no_record() {
        let (mock, store) = store();
        let user = CurrentUser {
            id: Some(4),
            role: Role::Doctor,
            ..Default::default()
        };
        let err = store.fetch_relative_for(&user).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound { .. }));
        assert!(mock.requests().is_empty());
        assert_eq!(store.errors().len(), 1);
        assert!(store.relative().is_none());
    }

    #[tokio::test]
    async fn missing_record_is_not_found() {
        let (mock, store) = store();
        mock.on(Method::Get, "/relatives/user/99", 404, json!({}));
        let err = store.fetch_relative_by_user_id(99).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::NotFound {
                resource: "relative for user 99".to_string(),
                status: 404
            }
        );
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn update_without_id_is_rejected_locally() {
        let (mock, store) = store();
        let err = store.update_relative(&Relative::default()).await.unwrap_err();
        assert_eq!(err.validation_errors(), ["relative id is required".to_string()]);
        assert!(mock.requests().is_empty());
    }
}
