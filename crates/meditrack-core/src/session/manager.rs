use std::sync::{Mutex, RwLock};

use serde_json::Value;

use crate::api::IamApi;
use crate::assemble::{SignInResource, SignUpResource};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::flight::{FlightKey, SingleFlight};
use crate::http::ApiClient;
use crate::loading::LoadingFlag;
use crate::model::{CurrentUser, Role, User};
use crate::registration::{RegistrationFlow, SignUpCommand};
use crate::storage::{ClientStorage, CURRENT_USER_KEY, TOKEN_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// What `sign_up` should submit.
#[derive(Debug, Clone)]
pub enum SignUpRequest {
    /// A command built by the caller.
    Command(SignUpCommand),
    /// Raw registration-flow data (flat or nested keys).
    Flow(Value),
    /// Whatever the manager's own registration flow currently holds.
    Pending,
}

#[derive(Debug, Default)]
struct SessionState {
    auth: AuthState,
    current_user: Option<CurrentUser>,
    token: Option<String>,
    users: Vec<User>,
    users_loaded: bool,
}

pub struct SessionManager {
    iam: IamApi,
    storage: ClientStorage,
    require_payment_confirmation: bool,
    state: RwLock<SessionState>,
    errors: Mutex<Vec<ApiError>>,
    loading: LoadingFlag,
    registration: Mutex<RegistrationFlow>,
    users_flight: SingleFlight<Vec<User>>,
}

impl SessionManager {
    pub fn new(iam: IamApi, storage: ClientStorage, require_payment_confirmation: bool) -> Self {
        Self {
            iam,
            storage,
            require_payment_confirmation,
            state: RwLock::new(SessionState::default()),
            errors: Mutex::new(Vec::new()),
            loading: LoadingFlag::new(),
            registration: Mutex::new(RegistrationFlow::new()),
            users_flight: SingleFlight::new(),
        }
    }

    /// Manager sharing `client`'s storage, with endpoints and payment policy from `cfg`.
    pub fn from_config(client: ApiClient, cfg: &ClientConfig) -> Self {
        let storage = client.storage().clone();
        Self::new(
            IamApi::new(client, cfg.endpoints.clone()),
            storage,
            cfg.require_payment_confirmation,
        )
    }

    pub fn auth_state(&self) -> AuthState {
        self.state.read().unwrap().auth
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_state() == AuthState::Authenticated
    }

    pub fn current_user(&self) -> Option<CurrentUser> {
        self.state.read().unwrap().current_user.clone()
    }

    /// True exactly when a current user is held.
    pub fn current_user_loaded(&self) -> bool {
        self.state.read().unwrap().current_user.is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().unwrap().token.clone()
    }

    pub fn users(&self) -> Vec<User> {
        self.state.read().unwrap().users.clone()
    }

    pub fn users_loaded(&self) -> bool {
        self.state.read().unwrap().users_loaded
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    /// Errors recorded by actions so far, oldest first.
    pub fn errors(&self) -> Vec<ApiError> {
        self.errors.lock().unwrap().clone()
    }

    pub fn clear_errors(&self) {
        self.errors.lock().unwrap().clear();
    }

    /// Run `f` against the registration flow holder (the sign-up steps fill it in).
    pub fn with_registration<R>(&self, f: impl FnOnce(&mut RegistrationFlow) -> R) -> R {
        let mut flow = self
            .registration
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut flow)
    }

    fn record<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            self.errors.lock().unwrap().push(e.clone());
        }
        result
    }

    fn set_auth(&self, auth: AuthState) {
        self.state.write().unwrap().auth = auth;
    }

    fn reset_session(&self) {
        let mut state = self.state.write().unwrap();
        state.auth = AuthState::Unauthenticated;
        state.current_user = None;
        state.token = None;
    }

    /// Submit credentials; resolve a missing or generic role through the user directory.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<CurrentUser, ApiError> {
        let _loading = self.loading.begin();
        self.set_auth(AuthState::Authenticating);

        let result = async {
            let resource: SignInResource = self.iam.sign_in(email, password).await?;
            let mut user = resource.to_current_user();
            if resource.needs_role_lookup() {
                self.resolve_role(&mut user).await;
            }
            self.establish(user)
        }
        .await;

        if result.is_err() {
            self.reset_session();
        }
        self.record(result)
    }

    /// Validate and submit a registration. Validation failures never reach the network.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<CurrentUser, ApiError> {
        let _loading = self.loading.begin();
        let command = match request {
            SignUpRequest::Command(cmd) => cmd,
            SignUpRequest::Flow(data) => SignUpCommand::from_registration_flow(&data),
            SignUpRequest::Pending => self.with_registration(|flow| flow.to_command()),
        };

        let outcome = command.validate(self.require_payment_confirmation);
        if !outcome.valid {
            tracing::debug!(errors = ?outcome.errors, "sign-up rejected by validation");
            return self.record(Err(ApiError::Validation(outcome.errors)));
        }

        self.set_auth(AuthState::Authenticating);
        let result = async {
            let resource: SignUpResource = self.iam.sign_up(&command.to_payload()).await?;
            let mut user = resource.to_current_user();
            if resource.needs_role_lookup() {
                match command.role.filter(|r| r.is_specific()) {
                    Some(role) => user.role = role,
                    None => self.resolve_role(&mut user).await,
                }
            }
            self.establish(user)
        }
        .await;

        match &result {
            Ok(_) => self.cleanup_registration(&command),
            Err(_) => self.reset_session(),
        }
        self.record(result)
    }

    /// Ask the user directory for a specific role. Leaves `user` untouched when the
    /// lookup fails or only knows the generic role.
    async fn resolve_role(&self, user: &mut CurrentUser) {
        let Some(id) = user.id else {
            return;
        };
        // The directory only answers authenticated requests.
        if let Some(token) = user.token.as_deref().filter(|t| !t.trim().is_empty()) {
            if let Err(e) = self.storage.write(TOKEN_KEY, token) {
                tracing::warn!("could not stage token for role lookup: {}", e);
            }
        }
        match self.iam.fetch_user(id).await {
            Ok(found) if found.role.is_specific() => {
                tracing::debug!(user_id = id, role = %found.role, "resolved role from user directory");
                user.role = found.role;
                user.entity_id = user.entity_id.or(found.entity_id);
                user.organization_id = user.organization_id.or(found.organization_id);
            }
            Ok(_) => {
                tracing::debug!(user_id = id, "user directory has no specific role; keeping generic role");
            }
            Err(e) => {
                tracing::warn!(user_id = id, "role lookup failed: {}", e);
            }
        }
    }

    /// Persist `{token, currentUser}` and mark the session authenticated.
    fn establish(&self, user: CurrentUser) -> Result<CurrentUser, ApiError> {
        match user.token.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(token) => self.storage.write(TOKEN_KEY, token)?,
            None => self.storage.clear_tokens(),
        }
        let serialized = serde_json::to_string(&user)
            .map_err(|e| ApiError::Storage(format!("serialize current user: {e}")))?;
        self.storage.write(CURRENT_USER_KEY, &serialized)?;

        let mut state = self.state.write().unwrap();
        state.auth = AuthState::Authenticated;
        state.token = user.token.clone();
        state.current_user = Some(user.clone());
        tracing::info!(role = %user.role, "session established");
        Ok(user)
    }

    fn cleanup_registration(&self, command: &SignUpCommand) {
        let mut flow = match self.registration.lock() {
            Ok(flow) => flow,
            Err(e) => {
                tracing::warn!("registration flow cleanup failed: {}", e);
                return;
            }
        };
        match command.role {
            Some(Role::Admin) => flow.clear(),
            Some(Role::Relative) => {
                flow.clear_except_plan();
                if let Some(plan) = command.plan_type {
                    flow.set_plan_type(plan.as_str());
                }
                flow.clear_sensitive();
            }
            _ => flow.clear_sensitive(),
        }
    }

    /// Load the persisted session. Placeholder literals count as absent; anything
    /// that does not parse to a user with an identity is removed from storage.
    pub fn restore_session(&self) -> Option<CurrentUser> {
        let stored = match self.storage.read(CURRENT_USER_KEY) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("could not read persisted session: {}", e);
                None
            }
        };

        let restored = stored.and_then(|raw| match serde_json::from_str::<CurrentUser>(&raw) {
            Ok(user) if user.has_identity() => Some(user),
            Ok(_) => {
                tracing::warn!("persisted user has no identity; discarding");
                None
            }
            Err(e) => {
                tracing::warn!("persisted user is not valid JSON ({}); discarding", e);
                None
            }
        });

        let Some(mut user) = restored else {
            self.storage.clear_session();
            self.reset_session();
            return None;
        };

        // Only the token keys count; a 401 may have cleared them since.
        user.token = self.storage.token();
        let mut state = self.state.write().unwrap();
        state.auth = AuthState::Authenticated;
        state.token = user.token.clone();
        state.current_user = Some(user.clone());
        tracing::info!(role = %user.role, "session restored");
        Some(user)
    }

    /// Drop the session in memory and in storage. Never fails.
    pub fn logout(&self) {
        self.reset_session();
        self.storage.clear_session();
        tracing::info!("signed out");
    }

    /// Adopt an already-obtained resource as the current user (not persisted).
    pub fn set_current_user_from_resource(&self, resource: Option<CurrentUser>) {
        let mut state = self.state.write().unwrap();
        state.auth = if resource.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        match resource.as_ref() {
            Some(r) => {
                if let Some(token) = r.token.clone() {
                    state.token = Some(token);
                }
            }
            None => state.token = None,
        }
        state.current_user = resource;
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        let _loading = self.loading.begin();
        let result = self
            .users_flight
            .run(FlightKey::unscoped("users"), || self.iam.fetch_users())
            .await;
        if let Ok(users) = &result {
            let mut state = self.state.write().unwrap();
            state.users = users.clone();
            state.users_loaded = true;
        }
        self.record(result)
    }

    pub async fn fetch_user_by_id(&self, id: i64) -> Result<User, ApiError> {
        let _loading = self.loading.begin();
        let result = self.iam.fetch_user(id).await;
        self.record(result)
    }
}
