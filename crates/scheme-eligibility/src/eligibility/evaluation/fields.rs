use chrono::{Datelike, NaiveDate};

use super::super::domain::Applicant;

/// Applicant attributes a rule may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Income,
    EmploymentStatus,
    MaritalStatus,
    DisabilityStatus,
    NumberOfChildren,
    Age,
    /// Stored under `last_employed`; resolves to whole months out of work.
    MonthsUnemployed,
}

impl FieldKind {
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Income,
        FieldKind::EmploymentStatus,
        FieldKind::MaritalStatus,
        FieldKind::DisabilityStatus,
        FieldKind::NumberOfChildren,
        FieldKind::Age,
        FieldKind::MonthsUnemployed,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "income" => Some(FieldKind::Income),
            "employment_status" => Some(FieldKind::EmploymentStatus),
            "marital_status" => Some(FieldKind::MaritalStatus),
            "disability_status" => Some(FieldKind::DisabilityStatus),
            "number_of_children" => Some(FieldKind::NumberOfChildren),
            "age" => Some(FieldKind::Age),
            "last_employed" => Some(FieldKind::MonthsUnemployed),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldKind::Income => "income",
            FieldKind::EmploymentStatus => "employment_status",
            FieldKind::MaritalStatus => "marital_status",
            FieldKind::DisabilityStatus => "disability_status",
            FieldKind::NumberOfChildren => "number_of_children",
            FieldKind::Age => "age",
            FieldKind::MonthsUnemployed => "last_employed",
        }
    }
}

/// Typed applicant value a rule literal is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedValue<'a> {
    Integer(i64),
    Text(&'a str),
}

/// Looks up (or derives) `kind` on the applicant as of `today`.
///
/// `None` means the value is absent, e.g. an applicant with no `last_employed` date.
pub fn resolve(kind: FieldKind, applicant: &Applicant, today: NaiveDate) -> Option<ResolvedValue<'_>> {
    match kind {
        FieldKind::Income => i64::try_from(applicant.income)
            .ok()
            .map(ResolvedValue::Integer),
        FieldKind::EmploymentStatus => Some(ResolvedValue::Text(&applicant.employment_status)),
        FieldKind::MaritalStatus => Some(ResolvedValue::Text(&applicant.marital_status)),
        FieldKind::DisabilityStatus => Some(ResolvedValue::Text(&applicant.disability_status)),
        FieldKind::NumberOfChildren => Some(ResolvedValue::Integer(i64::from(
            applicant.number_of_children,
        ))),
        FieldKind::Age => Some(ResolvedValue::Integer(age_on(applicant.date_of_birth, today))),
        FieldKind::MonthsUnemployed => applicant
            .last_employed
            .map(|last_employed| ResolvedValue::Integer(months_between(last_employed, today))),
    }
}

/// Completed years since `date_of_birth`, compared by day of year.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let mut age = i64::from(today.year()) - i64::from(date_of_birth.year());
    if today.ordinal() < date_of_birth.ordinal() {
        age -= 1;
    }
    age
}

/// Whole calendar months from `since` to `today`; a partial month does not count.
pub fn months_between(since: NaiveDate, today: NaiveDate) -> i64 {
    let years = i64::from(today.year()) - i64::from(since.year());
    let months = i64::from(today.month()) - i64::from(since.month());
    let mut total = years * 12 + months;
    if today.day() < since.day() {
        total -= 1;
    }
    total
}
