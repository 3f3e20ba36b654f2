//! CLI error type

use crm_admin_lib::error::ApiError;
use crm_admin_lib::error::ConfigError;
use crm_admin_lib::error::Error;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("no API URL; pass --url or set CRM_API_URL")]
    MissingUrl,

    #[error("invalid --set argument '{0}', expected field=value")]
    InvalidAssignment(String),

    #[error("nothing to send; pass at least one --set field=value")]
    EmptyRecord,

    #[error("'{0}' has no permissions column; pass --field")]
    NoPermissionsField(String),

    #[error(transparent)]
    Lib(#[from] Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        Self::Lib(Error::Api(err))
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Lib(Error::Config(err))
    }
}
