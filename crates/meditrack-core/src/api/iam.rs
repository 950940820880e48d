use serde_json::{json, Value};

use super::{get_one, list, resource_path};
use crate::assemble::{self, SignInResource, SignUpResource};
use crate::config::EndpointPaths;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::model::User;

/// Authentication and user directory.
#[derive(Debug, Clone)]
pub struct IamApi {
    client: ApiClient,
    paths: EndpointPaths,
}

fn rejected(what: &str) -> impl FnOnce(ApiError) -> ApiError + '_ {
    move |e| match e {
        ApiError::Status { status, .. } => {
            ApiError::Authentication(format!("{what} rejected (HTTP {status})"))
        }
        other => other,
    }
}

impl IamApi {
    pub fn new(client: ApiClient, paths: EndpointPaths) -> Self {
        Self { client, paths }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SignInResource, ApiError> {
        let body = json!({ "email": email, "password": password });
        let resp = self
            .client
            .post(&self.paths.sign_in, &body)
            .await
            .map_err(rejected("sign in"))?;
        assemble::sign_in_resource(resp.json()?)
    }

    pub async fn sign_up(&self, payload: &Value) -> Result<SignUpResource, ApiError> {
        let resp = self
            .client
            .post(&self.paths.sign_up, payload)
            .await
            .map_err(rejected("sign up"))?;
        assemble::sign_up_resource(resp.json()?)
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        list(&self.client, &self.paths.users, &[], assemble::users).await
    }

    pub async fn fetch_user(&self, id: i64) -> Result<User, ApiError> {
        get_one(
            &self.client,
            &resource_path(&self.paths.users, id),
            &format!("user {id}"),
            assemble::user,
        )
        .await
    }
}
