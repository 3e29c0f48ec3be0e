use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::eligibility::domain::{
    Applicant, ApplicantId, Application, ApplicationId, Scheme, SchemeId,
};
use crate::eligibility::repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};
use crate::eligibility::{ApplicationService, EligibilityService};

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn applicant_id() -> ApplicantId {
    ApplicantId(Uuid::from_u128(0xa11ce))
}

pub(super) fn applicant() -> Applicant {
    Applicant {
        id: applicant_id(),
        name: "Mary Tan".to_string(),
        employment_status: "employed".to_string(),
        sex: "female".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1984, 3, 2).expect("valid date"),
        last_employed: None,
        income: 15_000,
        marital_status: "married".to_string(),
        disability_status: "none".to_string(),
        number_of_children: 2,
        household: Vec::new(),
    }
}

pub(super) fn unemployed_applicant(last_employed: NaiveDate) -> Applicant {
    Applicant {
        employment_status: "unemployed".to_string(),
        last_employed: Some(last_employed),
        ..applicant()
    }
}

pub(super) fn scheme(seq: u128, name: &str, criteria: Value) -> Scheme {
    Scheme {
        id: SchemeId(Uuid::from_u128(seq)),
        name: name.to_string(),
        criteria,
        benefits: json!({ "amount": 500 }),
    }
}

pub(super) fn low_income_scheme() -> Scheme {
    scheme(
        1,
        "Low Income Assistance",
        json!({ "rules": [{ "field": "income", "operator": "<=", "value": 20000 }] }),
    )
}

pub(super) fn retrenchment_scheme() -> Scheme {
    scheme(
        2,
        "Retrenchment Assistance",
        json!({ "rules": [
            { "field": "employment_status", "operator": "==", "value": "unemployed" },
            { "field": "last_employed", "operator": ">=", "value": 6 }
        ] }),
    )
}

pub(super) fn universal_scheme() -> Scheme {
    scheme(3, "Universal Grant", json!({ "rules": [] }))
}

pub(super) fn malformed_scheme() -> Scheme {
    scheme(4, "Broken Scheme", json!({ "rules": { "field": "income" } }))
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplicants {
    records: Arc<Mutex<HashMap<ApplicantId, Applicant>>>,
}

impl MemoryApplicants {
    pub(super) fn with(applicants: Vec<Applicant>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.records.lock().expect("applicant mutex poisoned");
            for applicant in applicants {
                guard.insert(applicant.id, applicant);
            }
        }
        store
    }
}

impl ApplicantRepository for MemoryApplicants {
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("applicant mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySchemes {
    records: Arc<Mutex<Vec<Scheme>>>,
}

impl MemorySchemes {
    pub(super) fn with(schemes: Vec<Scheme>) -> Self {
        Self {
            records: Arc::new(Mutex::new(schemes)),
        }
    }
}

impl SchemeRepository for MemorySchemes {
    fn all(&self) -> Result<Vec<Scheme>, RepositoryError> {
        Ok(self.records.lock().expect("scheme mutex poisoned").clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryApplications {
    pub(super) records: Arc<Mutex<Vec<Application>>>,
}

impl ApplicationRepository for MemoryApplications {
    fn insert(&self, application: Application) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        if guard.iter().any(|stored| stored.id == application.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        match guard.iter_mut().find(|stored| stored.id == application.id) {
            Some(stored) => {
                *stored = application;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        let guard = self.records.lock().expect("application mutex poisoned");
        Ok(guard.iter().find(|stored| &stored.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Ok(self.records.lock().expect("application mutex poisoned").clone())
    }

    fn remove(&self, id: &ApplicationId) -> Result<Application, RepositoryError> {
        let mut guard = self.records.lock().expect("application mutex poisoned");
        let position = guard
            .iter()
            .position(|stored| &stored.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(position))
    }
}

pub(super) struct UnavailableRepository;

impl ApplicantRepository for UnavailableRepository {
    fn fetch(&self, _id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl SchemeRepository for UnavailableRepository {
    fn all(&self) -> Result<Vec<Scheme>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl ApplicationRepository for UnavailableRepository {
    fn insert(&self, _application: Application) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _application: Application) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ApplicationId) -> Result<Option<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Application>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &ApplicationId) -> Result<Application, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryEligibility = EligibilityService<MemoryApplicants, MemorySchemes>;
pub(super) type MemoryApplicationService =
    ApplicationService<MemoryApplicants, MemorySchemes, MemoryApplications>;

pub(super) fn eligibility_service(
    applicants: Vec<Applicant>,
    schemes: Vec<Scheme>,
) -> MemoryEligibility {
    EligibilityService::new(
        Arc::new(MemoryApplicants::with(applicants)),
        Arc::new(MemorySchemes::with(schemes)),
    )
}

pub(super) fn standard_schemes() -> Vec<Scheme> {
    vec![
        low_income_scheme(),
        malformed_scheme(),
        retrenchment_scheme(),
        universal_scheme(),
    ]
}

pub(super) fn build_application_service(
    applicants: Vec<Applicant>,
) -> (MemoryApplicationService, Arc<MemoryApplications>) {
    let eligibility = Arc::new(eligibility_service(applicants, standard_schemes()));
    let applications = Arc::new(MemoryApplications::default());
    let service = ApplicationService::new(eligibility, applications.clone());
    (service, applications)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
