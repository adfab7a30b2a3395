use crate::error::{Error, Result};
use crate::models::assignment::NewAssignment;
use crate::models::candidate::HiringStatus;
use crate::services::metadata_service::RosterFilters;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSessionPayload {
    #[validate(length(min = 1))]
    #[serde(rename = "companyId")]
    pub company_id: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreatedResponse {
    #[serde(rename = "sessionId")]
    pub session_id: Uuid,
}

/// Raw filter inputs as typed by the user. Trimming and empty-means-unset
/// normalization happens in `into_filters`, so posting all-empty fields is the
/// "clear filters" action.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ApplyFiltersPayload {
    #[serde(default)]
    #[validate(length(max = 200))]
    pub search: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub skill: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub sector: String,
    #[serde(default, rename = "sortBy")]
    #[validate(length(max = 50))]
    pub sort_by: String,
}

impl ApplyFiltersPayload {
    pub fn into_filters(self) -> RosterFilters {
        RosterFilters::new(
            &self.search,
            &self.skill,
            &self.location,
            &self.sector,
            &self.sort_by,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct ScrollPayload {
    #[serde(rename = "visibleStopIndex")]
    pub visible_stop_index: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub hiringstatus: String,
}

impl UpdateStatusPayload {
    /// Empty string clears the pipeline stage; anything else must be a known
    /// stage name.
    pub fn parsed(&self) -> Result<Option<HiringStatus>> {
        let raw = self.hiringstatus.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        HiringStatus::parse(raw)
            .map(Some)
            .ok_or_else(|| Error::BadRequest(format!("Unknown hiring status: {}", raw)))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssignmentPayload {
    #[validate(length(min = 1))]
    #[serde(rename = "resumeId")]
    pub resume_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "recruiterId")]
    pub recruiter_id: String,
    #[validate(length(min = 1))]
    #[serde(rename = "companyId")]
    pub company_id: String,
    #[validate(length(min = 1))]
    pub companyname: String,
    pub notes: Option<String>,
}

impl CreateAssignmentPayload {
    pub fn into_new(self) -> NewAssignment {
        NewAssignment {
            resume_id: self.resume_id,
            recruiter_id: self.recruiter_id,
            company_id: self.company_id,
            companyname: self.companyname,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignmentScopeQuery {
    #[serde(rename = "companyId")]
    pub company_id: String,
}
