use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use scheme_eligibility::eligibility::{
    Applicant, ApplicantId, ApplicantRepository, Application, ApplicationId,
    ApplicationRepository, RepositoryError, Scheme, SchemeRepository,
};
use scheme_eligibility::seed::SeedData;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local backing store for applicants, schemes and applications.
///
/// Schemes keep their seed order so listings come back in registry order.
#[derive(Default)]
pub(crate) struct InMemoryStore {
    applicants: RwLock<HashMap<ApplicantId, Applicant>>,
    schemes: RwLock<Vec<Scheme>>,
    applications: RwLock<HashMap<ApplicationId, Application>>,
}

impl InMemoryStore {
    pub(crate) fn from_seed(seed: SeedData) -> Self {
        let applicants = seed
            .applicants
            .into_iter()
            .map(|applicant| (applicant.id, applicant))
            .collect();

        Self {
            applicants: RwLock::new(applicants),
            schemes: RwLock::new(seed.schemes),
            applications: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn counts(&self) -> (usize, usize) {
        let applicants = self.applicants.read().map(|guard| guard.len()).unwrap_or(0);
        let schemes = self.schemes.read().map(|guard| guard.len()).unwrap_or(0);
        (applicants, schemes)
    }
}

fn poisoned<T>(_: T) -> RepositoryError {
    RepositoryError::Unavailable("in-memory store lock poisoned".to_string())
}

impl ApplicantRepository for InMemoryStore {
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.applicants.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }
}

impl SchemeRepository for InMemoryStore {
    fn all(&self) -> Result<Vec<Scheme>, RepositoryError> {
        let guard = self.schemes.read().map_err(poisoned)?;
        Ok(guard.clone())
    }
}

impl ApplicationRepository for InMemoryStore {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.applications.write().map_err(poisoned)?;
        if guard.contains_key(&application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(application.id, application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.applications.write().map_err(poisoned)?;
        match guard.get_mut(&application.id) {
            Some(stored) => {
                *stored = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.applications.read().map_err(poisoned)?;
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        let guard = self.applications.read().map_err(poisoned)?;
        let mut applications: Vec<Application> = guard.values().cloned().collect();
        applications.sort_by_key(|application| application.created_at);
        Ok(applications)
    }

    fn remove(&self, id: &ApplicationId) -> Result<Application, RepositoryError> {
        let mut guard = self.applications.write().map_err(poisoned)?;
        guard.remove(id).ok_or(RepositoryError::NotFound)
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
