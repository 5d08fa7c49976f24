pub mod audit;
pub mod client_config;
pub mod envelope;
pub mod esquela;
pub mod json_error;
pub mod login;
pub mod permission;
pub mod person;
pub mod report;
pub mod role;
pub mod student;
pub mod user;

pub use self::audit::{
    ActionTypes, AuditEntry, AuditFilters, AuditPage, ExportFormat, LoginLog, LoginLogs,
};
pub use self::client_config::{ApiConfig, ClientConfig, ConfigError, StorageConfig};
pub use self::envelope::{Envelope, ResponseShape};
pub use self::esquela::{
    CodigoEsquela, CodigoEsquelaInput, CodigoTipo, DEFAULT_GROUP_BY, Esquela, EsquelaCourse,
    EsquelaCreate, EsquelaStudent, EsquelaTeacher,
};
pub use self::json_error::{ErrorBody, ErrorDetail, LocSegment, ValidationItem};
pub use self::login::{CurrentUser, DetailedPermissions, LoginData, LoginPayload, RefreshPayload};
pub use self::permission::{Permission, PermissionAction, PermissionInput, PermissionUpdate};
pub use self::person::{Person, PersonFilters, PersonKind, PersonPage};
pub use self::report::{ReportFilters, SchoolLevel};
pub use self::role::{Role, RoleInput};
pub use self::student::Student;
pub use self::user::{
    ChangePasswordData, NewUserCredentials, PasswordReset, User, UserCreate, UserUpdate,
};
