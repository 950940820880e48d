use super::{create, delete, get_one, list, resource_path, update};
use crate::assemble::{self, to_resource};
use crate::config::EndpointPaths;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::model::Relative;

#[derive(Debug, Clone)]
pub struct RelativesApi {
    client: ApiClient,
    paths: EndpointPaths,
}

impl RelativesApi {
    pub fn new(client: ApiClient, paths: EndpointPaths) -> Self {
        Self { client, paths }
    }

    pub async fn fetch_relatives(&self) -> Result<Vec<Relative>, ApiError> {
        list(&self.client, &self.paths.relatives, &[], assemble::relatives).await
    }

    pub async fn fetch_relative(&self, id: i64) -> Result<Relative, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.relatives, id),
            &format!("relative {id}"),
            assemble::relative,
        )
        .await
    }

    /// `GET {relatives}/user/{userId}`.
    pub async fn fetch_relative_by_user_id(&self, user_id: i64) -> Result<Relative, ApiError> {
        let path = format!("{}/user/{}", self.paths.relatives.trim_end_matches('/'), user_id);
        get_one(
            &self.client,
            &path,
            &format!("relative for user {user_id}"),
            assemble::relative,
        )
        .await
    }

    pub async fn create_relative(&self, relative: &Relative) -> Result<Relative, ApiError> {
        let body = to_resource(relative, true)?;
        create(&self.client, &self.paths.relatives, &body, assemble::relative).await
    }

    pub async fn update_relative(&self, relative: &Relative) -> Result<Relative, ApiError> {
        let id = relative
            .id
            .ok_or_else(|| ApiError::Validation(vec!["relative id is required".to_string()]))?;
        let body = to_resource(relative, false)?;
        update(
            &self.client,
            &resource_path(&self.paths.relatives, id),
            &body,
            assemble::relative,
        )
        .await
    }

    pub async fn delete_relative(&self, id: i64) -> Result<(), ApiError> {
        delete(&self.client, &resource_path(&self.paths.relatives, id)).await
    }
}
