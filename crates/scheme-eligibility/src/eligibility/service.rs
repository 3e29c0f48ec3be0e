use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{
    Applicant, ApplicantId, Application, ApplicationId, ApplicationStatus, Scheme, SchemeId,
};
use super::evaluation::{EligibilityEvaluator, RuleCheck};
use super::repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};

/// Answers "which schemes does this applicant qualify for" against the backing stores.
pub struct EligibilityService<A, S> {
    applicants: Arc<A>,
    schemes: Arc<S>,
    evaluator: EligibilityEvaluator,
}

impl<A, S> EligibilityService<A, S>
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
{
    pub fn new(applicants: Arc<A>, schemes: Arc<S>) -> Self {
        Self {
            applicants,
            schemes,
            evaluator: EligibilityEvaluator::new(),
        }
    }

    /// Schemes the applicant qualifies for as of `today`, in registry order.
    ///
    /// Schemes whose stored criteria cannot be parsed are left out rather than failing the
    /// whole query.
    pub fn find_eligible_schemes(
        &self,
        applicant_id: &str,
        today: NaiveDate,
    ) -> Result<Vec<Scheme>, EligibilityError> {
        let applicant = self.load_applicant(applicant_id)?;
        let schemes = self
            .schemes
            .all()
            .map_err(EligibilityError::StoreUnavailable)?;

        Ok(self.eligible_among(&applicant, schemes, today))
    }

    pub fn eligible_among(
        &self,
        applicant: &Applicant,
        schemes: Vec<Scheme>,
        today: NaiveDate,
    ) -> Vec<Scheme> {
        schemes
            .into_iter()
            .filter(|scheme| match scheme.criteria() {
                Ok(criteria) => self.evaluator.is_eligible(applicant, &criteria, today),
                Err(err) => {
                    warn!(scheme = %scheme.id, error = %err, "skipping scheme with malformed criteria");
                    false
                }
            })
            .collect()
    }

    /// Rule-by-rule account of how one scheme treats the applicant.
    pub fn explain(
        &self,
        applicant_id: &str,
        scheme_id: &str,
        today: NaiveDate,
    ) -> Result<SchemeExplanation, EligibilityError> {
        let applicant = self.load_applicant(applicant_id)?;
        let wanted = SchemeId::parse(scheme_id)
            .ok_or_else(|| EligibilityError::SchemeNotFound(scheme_id.to_string()))?;
        let scheme = self
            .schemes
            .all()
            .map_err(EligibilityError::StoreUnavailable)?
            .into_iter()
            .find(|scheme| scheme.id == wanted)
            .ok_or_else(|| EligibilityError::SchemeNotFound(scheme_id.to_string()))?;

        let explanation = match scheme.criteria() {
            Ok(criteria) => SchemeExplanation {
                scheme_id: scheme.id,
                scheme_name: scheme.name,
                eligible: self.evaluator.is_eligible(&applicant, &criteria, today),
                rules: self.evaluator.explain(&applicant, &criteria, today),
                criteria_error: None,
            },
            Err(err) => SchemeExplanation {
                scheme_id: scheme.id,
                scheme_name: scheme.name,
                eligible: false,
                rules: Vec::new(),
                criteria_error: Some(err.to_string()),
            },
        };

        Ok(explanation)
    }

    fn load_applicant(&self, applicant_id: &str) -> Result<Applicant, EligibilityError> {
        let not_found = || EligibilityError::ApplicantNotFound(applicant_id.to_string());
        let id = ApplicantId::parse(applicant_id).ok_or_else(not_found)?;

        match self.applicants.fetch(&id) {
            Ok(Some(applicant)) => Ok(applicant),
            Ok(None) | Err(RepositoryError::NotFound) => Err(not_found()),
            Err(other) => Err(EligibilityError::StoreUnavailable(other)),
        }
    }
}

/// Audit view of a single scheme for a single applicant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemeExplanation {
    pub scheme_id: SchemeId,
    pub scheme_name: String,
    pub eligible: bool,
    pub rules: Vec<RuleCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria_error: Option<String>,
}

/// Errors the eligibility query reports to its callers.
#[derive(Debug, thiserror::Error)]
pub enum EligibilityError {
    #[error("applicant {0} not found")]
    ApplicantNotFound(String),
    #[error("scheme {0} not found")]
    SchemeNotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] RepositoryError),
}

/// Records applications, admitting only applicants the scheme's criteria accept.
pub struct ApplicationService<A, S, R> {
    eligibility: Arc<EligibilityService<A, S>>,
    applications: Arc<R>,
}

impl<A, S, R> ApplicationService<A, S, R>
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    pub fn new(eligibility: Arc<EligibilityService<A, S>>, applications: Arc<R>) -> Self {
        Self {
            eligibility,
            applications,
        }
    }

    /// Submit a new application; refused unless the scheme is currently one the applicant
    /// qualifies for.
    pub fn submit(
        &self,
        applicant_id: &str,
        scheme_id: &str,
        today: NaiveDate,
    ) -> Result<Application, ApplicationServiceError> {
        let eligible = self
            .eligibility
            .find_eligible_schemes(applicant_id, today)?;

        let not_eligible = || ApplicationServiceError::NotEligible {
            applicant_id: applicant_id.to_string(),
            scheme_id: scheme_id.to_string(),
        };
        let scheme_id = SchemeId::parse(scheme_id).ok_or_else(not_eligible)?;
        if !eligible.iter().any(|scheme| scheme.id == scheme_id) {
            return Err(not_eligible());
        }

        let applicant_id = ApplicantId::parse(applicant_id).ok_or_else(not_eligible)?;
        let now = Utc::now();
        let application = Application {
            id: ApplicationId::new(),
            applicant_id,
            scheme_id,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let stored = self.applications.insert(application)?;
        info!(
            application = %stored.id,
            applicant = %stored.applicant_id,
            scheme = %stored.scheme_id,
            "application recorded"
        );
        Ok(stored)
    }

    pub fn get(&self, application_id: &str) -> Result<Application, ApplicationServiceError> {
        let id = ApplicationId::parse(application_id).ok_or(RepositoryError::NotFound)?;
        let application = self
            .applications
            .fetch(&id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(application)
    }

    pub fn list(&self) -> Result<Vec<Application>, ApplicationServiceError> {
        Ok(self.applications.list()?)
    }

    pub fn update_status(
        &self,
        application_id: &str,
        status: ApplicationStatus,
    ) -> Result<Application, ApplicationServiceError> {
        let mut application = self.get(application_id)?;
        application.status = status;
        application.updated_at = Utc::now();
        self.applications.update(application.clone())?;
        Ok(application)
    }

    pub fn withdraw(&self, application_id: &str) -> Result<Application, ApplicationServiceError> {
        let id = ApplicationId::parse(application_id).ok_or(RepositoryError::NotFound)?;
        Ok(self.applications.remove(&id)?)
    }
}

/// Error raised by the application service.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationServiceError {
    #[error("applicant {applicant_id} is not eligible for scheme {scheme_id}")]
    NotEligible {
        applicant_id: String,
        scheme_id: String,
    },
    #[error(transparent)]
    Eligibility(#[from] EligibilityError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
