use super::domain::{Applicant, ApplicantId, Application, ApplicationId, Scheme};

/// Read access to registered applicants.
pub trait ApplicantRepository: Send + Sync {
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
}

/// Read access to the scheme registry, in the registry's stored order.
pub trait SchemeRepository: Send + Sync {
    fn all(&self) -> Result<Vec<Scheme>, RepositoryError>;
}

/// Storage abstraction for recorded applications.
pub trait ApplicationRepository: Send + Sync {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError>;
    fn update(&self, application: Application) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError>;
    fn list(&self) -> Result<Vec<Application>, RepositoryError>;
    fn remove(&self, id: &ApplicationId) -> Result<Application, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
