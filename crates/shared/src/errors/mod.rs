mod provider;
mod repository;
mod service;
mod validate;

pub use self::provider::ProviderError;
pub use self::repository::RepositoryError;
pub use self::service::ServiceError;
pub use self::validate::format_validation_errors;
