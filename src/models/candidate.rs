use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Document-store timestamp carrying seconds plus nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTimestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

impl DocTimestamp {
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.nanoseconds).single()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HiringStatus {
    Applied,
    Screening,
    Interview,
    Offer,
    Hired,
    Rejected,
}

impl HiringStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HiringStatus::Applied => "applied",
            HiringStatus::Screening => "screening",
            HiringStatus::Interview => "interview",
            HiringStatus::Offer => "offer",
            HiringStatus::Hired => "hired",
            HiringStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "applied" => Some(HiringStatus::Applied),
            "screening" => Some(HiringStatus::Screening),
            "interview" => Some(HiringStatus::Interview),
            "offer" => Some(HiringStatus::Offer),
            "hired" => Some(HiringStatus::Hired),
            "rejected" => Some(HiringStatus::Rejected),
            _ => None,
        }
    }
}

// The metadata service emits "" for candidates that never entered the pipeline,
// and older documents carry arbitrary junk in the field.
fn deserialize_status_flexible<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<HiringStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(HiringStatus::parse))
}

// Skills arrive as an array, a comma-separated string, or null.
fn deserialize_skills_flexible<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SkillsWire {
        List(Vec<String>),
        Joined(String),
    }

    match Option::<SkillsWire>::deserialize(deserializer)? {
        Some(SkillsWire::List(list)) => Ok(list),
        Some(SkillsWire::Joined(s)) => Ok(s
            .split(',')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()),
        None => Ok(Vec::new()),
    }
}

// Legacy documents store phone as a bare number.
fn deserialize_phone_flexible<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PhoneWire {
        Text(String),
        Number(i64),
    }

    Ok(Option::<PhoneWire>::deserialize(deserializer)?.map(|p| match p {
        PhoneWire::Text(s) => s,
        PhoneWire::Number(n) => n.to_string(),
    }))
}

/// One parsed resume as served by the metadata API. Every field except `id` is
/// tolerated missing so a half-parsed upload never fails a whole page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_phone_flexible")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "deserialize_skills_flexible")]
    pub skills: Vec<String>,
    pub location: Option<String>,
    pub sector: Option<String>,
    pub role: Option<String>,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: Option<DocTimestamp>,
    #[serde(rename = "updatedAt")]
    pub updated_at: Option<DocTimestamp>,
    #[serde(default, deserialize_with = "deserialize_status_flexible")]
    pub hiringstatus: Option<HiringStatus>,
    pub notes: Option<String>,
    #[serde(rename = "fileURL")]
    pub file_url: Option<String>,
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
}

/// A candidate record widened with its company-scoped recruiter assignment.
/// Recomputed on every page fetch, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedCandidate {
    #[serde(flatten)]
    pub record: CandidateRecord,
    #[serde(rename = "recruiterId")]
    pub recruiter_id: Option<String>,
    #[serde(rename = "companyId")]
    pub company_id: Option<String>,
    pub companyname: Option<String>,
}

impl MergedCandidate {
    pub fn unassigned(record: CandidateRecord) -> Self {
        Self {
            record,
            recruiter_id: None,
            company_id: None,
            companyname: None,
        }
    }
}
