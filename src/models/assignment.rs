use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Links a resume to a recruiter within a company scope. At most one row per
/// `(resume_id, company_id)` pair, maintained by the create path rather than a
/// unique constraint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentRecord {
    pub id: Uuid,
    pub resume_id: String,
    pub recruiter_id: String,
    pub company_id: String,
    pub companyname: String,
    pub notes: Option<String>,
    pub locked: bool,
    pub tagged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAssignment {
    pub resume_id: String,
    pub recruiter_id: String,
    pub company_id: String,
    pub companyname: String,
    pub notes: Option<String>,
}
