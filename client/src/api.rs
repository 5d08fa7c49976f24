use std::sync::Arc;

use shared::types::ClientConfig;
use tracing::info;

use crate::cancel::CancelToken;
use crate::credentials::{CredentialStore, FileCredentialStore};
use crate::http::RequestExecutor;
use crate::resources::{
    AuditClient, AuthClient, CodesClient, CoursesClient, EsquelasClient, HealthClient,
    PermissionsClient, PersonsClient, ReportsClient, RolesClient, StaffClient, UsersClient,
};
use crate::session::{SessionController, SessionHandle};
use crate::store::AdminStore;

/// Every client wired to one session and one executor.
///
/// Built explicitly and passed to whoever needs it; cloning shares the
/// session.
#[derive(Debug, Clone)]
pub struct AdminApi {
    session: SessionHandle,
    executor: RequestExecutor,
    pub controller: SessionController,
    pub auth: AuthClient,
    pub users: UsersClient,
    pub roles: RolesClient,
    pub permissions: PermissionsClient,
    pub audit: AuditClient,
    pub persons: PersonsClient,
    pub reports: ReportsClient,
    pub health: HealthClient,
    pub esquelas: EsquelasClient,
    pub codes: CodesClient,
    pub staff: StaffClient,
    pub courses: CoursesClient,
}

impl AdminApi {
    pub fn new(config: &ClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        let session = SessionHandle::new(store);
        let executor = RequestExecutor::from_config(&config.api, session.clone());
        info!("API client targeting {}", executor.base_url());
        Self::from_executor(executor)
    }

    /// Use the file credential store at `config.storage.credentials_path`.
    pub fn with_file_store(config: &ClientConfig) -> Self {
        let store = FileCredentialStore::new(&config.storage.credentials_path);
        Self::new(config, Arc::new(store))
    }

    pub fn from_executor(executor: RequestExecutor) -> Self {
        let session: SessionHandle = executor.session().clone();
        let auth = AuthClient::new(executor.clone());

        Self {
            controller: SessionController::new(session.clone(), auth.clone()),
            auth,
            users: UsersClient::new(executor.clone()),
            roles: RolesClient::new(executor.clone()),
            permissions: PermissionsClient::new(executor.clone()),
            audit: AuditClient::new(executor.clone()),
            persons: PersonsClient::new(executor.clone()),
            reports: ReportsClient::new(executor.clone()),
            health: HealthClient::new(executor.clone()),
            esquelas: EsquelasClient::new(executor.clone()),
            codes: CodesClient::new(executor.clone()),
            staff: StaffClient::new(executor.clone()),
            courses: CoursesClient::new(executor.clone()),
            session,
            executor,
        }
    }

    /// Every client bound to `token`; cancelling it aborts their in-flight
    /// requests.
    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self::from_executor(self.executor.with_cancel(token))
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    pub fn admin_store(&self) -> AdminStore {
        AdminStore::new(
            self.users.clone(),
            self.roles.clone(),
            self.permissions.clone(),
            self.audit.clone(),
        )
    }
}
