//! Endpoint wrappers: one struct per backend area, each pairing `ApiClient`
//! requests with the matching assembler.
//!
//! Status mapping:
//! - collection fetches and mutations surface non-2xx as `ApiError::Status`
//! - single-resource fetches surface non-2xx as `ApiError::NotFound`
//! - sign-in / sign-up surface non-2xx as `ApiError::Authentication`

mod devices;
mod iam;
mod organization;
mod relatives;

pub use devices::DevicesApi;
pub use iam::IamApi;
pub use organization::{ListQuery, OrganizationApi};
pub use relatives::RelativesApi;

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{ApiClient, ResponseBody};

type Assemble<T> = fn(&Value) -> Result<T, ApiError>;

pub(crate) fn resource_path(base: &str, id: i64) -> String {
    format!("{}/{}", base.trim_end_matches('/'), id)
}

/// GET a collection and assemble every item.
pub(crate) async fn list<T>(
    client: &ApiClient,
    path: &str,
    query: &[(&str, String)],
    assemble: Assemble<Vec<T>>,
) -> Result<Vec<T>, ApiError> {
    let resp = client.get(path, query).await?;
    assemble(resp.json()?)
}

/// GET one resource; any non-2xx means it is not there (for us).
pub(crate) async fn get_one<T>(
    client: &ApiClient,
    path: &str,
    resource: &str,
    assemble: Assemble<T>,
) -> Result<T, ApiError> {
    let resp = client.get(path, &[]).await.map_err(|e| match e {
        ApiError::Status { status, .. } => ApiError::NotFound {
            resource: resource.to_string(),
            status,
        },
        other => other,
    })?;
    assemble(resp.json()?)
}

/// POST/PUT `body` and assemble what comes back. An empty reply (204) echoes the
/// submitted resource.
async fn write<T>(
    client: &ApiClient,
    put: bool,
    path: &str,
    body: &Value,
    assemble: Assemble<T>,
) -> Result<T, ApiError> {
    let resp = if put {
        client.put(path, body).await?
    } else {
        client.post(path, body).await?
    };
    match &resp.body {
        ResponseBody::Empty => assemble(body),
        _ => assemble(resp.json()?),
    }
}

pub(crate) async fn create<T>(
    client: &ApiClient,
    path: &str,
    body: &Value,
    assemble: Assemble<T>,
) -> Result<T, ApiError> {
    write(client, false, path, body, assemble).await
}

pub(crate) async fn update<T>(
    client: &ApiClient,
    path: &str,
    body: &Value,
    assemble: Assemble<T>,
) -> Result<T, ApiError> {
    write(client, true, path, body, assemble).await
}

pub(crate) async fn delete(client: &ApiClient, path: &str) -> Result<(), ApiError> {
    client.delete(path).await.map(|_| ())
}
