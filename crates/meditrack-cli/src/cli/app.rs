//! Shared wiring for command handlers: config, storage, API client and stores.

use anyhow::{bail, Context, Result};
use meditrack_core::config::ClientConfig;
use meditrack_core::devices::DevicesStore;
use meditrack_core::http::ApiClient;
use meditrack_core::model::CurrentUser;
use meditrack_core::organization::OrganizationStore;
use meditrack_core::relatives::RelativesStore;
use meditrack_core::session::SessionManager;
use meditrack_core::storage::ClientStorage;

pub struct App {
    cfg: ClientConfig,
    client: ApiClient,
    pub session: SessionManager,
}

impl App {
    pub fn open(cfg: ClientConfig) -> Result<Self> {
        let storage = ClientStorage::open_default().context("open client storage")?;
        let client = ApiClient::from_config(&cfg, storage)
            .with_context(|| format!("API base URL {:?}", cfg.base_url))?;
        let session = SessionManager::from_config(client.clone(), &cfg);
        Ok(Self {
            cfg,
            client,
            session,
        })
    }

    /// The stored session; commands that talk to protected endpoints need one.
    pub fn require_user(&self) -> Result<CurrentUser> {
        match self.session.restore_session() {
            Some(user) => Ok(user),
            None => bail!("not signed in (run `meditrack sign-in <email> --password ...`)"),
        }
    }

    pub fn organization(&self) -> OrganizationStore {
        OrganizationStore::from_config(self.client.clone(), &self.cfg)
    }

    /// Organization store with the context of the signed-in user installed.
    pub async fn scoped_organization(&self) -> Result<OrganizationStore> {
        let user = self.require_user()?;
        let store = self.organization();
        let ctx = store.resolve_context(&user).await?;
        tracing::debug!(organization = ctx.organization_id, role = %ctx.role, "organization context");
        Ok(store)
    }

    pub fn devices(&self) -> DevicesStore {
        DevicesStore::from_config(self.client.clone(), &self.cfg)
    }

    pub fn relatives(&self) -> RelativesStore {
        RelativesStore::from_config(self.client.clone(), &self.cfg)
    }
}
