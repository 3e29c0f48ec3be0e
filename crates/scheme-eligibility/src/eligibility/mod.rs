//! Scheme eligibility: stored criteria documents, the rule evaluation engine, and the services
//! that query it and record applications.

pub mod criteria;
pub mod domain;
pub mod evaluation;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use criteria::{Criteria, MalformedCriteria, Rule, RuleValue};
pub use domain::{
    Applicant, ApplicantId, Application, ApplicationId, ApplicationStatus, HouseholdMember,
    Scheme, SchemeId,
};
pub use evaluation::{EligibilityEvaluator, FieldKind, Operator, RuleCheck, RuleVerdict};
pub use repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};
pub use router::{application_router, eligibility_router};
pub use service::{
    ApplicationService, ApplicationServiceError, EligibilityError, EligibilityService,
    SchemeExplanation,
};
