use crate::error::{Error, Result};
use crate::models::candidate::{CandidateRecord, HiringStatus};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

/// Page size the metadata API is always asked for.
pub const PAGE_SIZE: u32 = 10;

/// Active filter set for a roster query. Empty fields mean "no constraint";
/// construction trims surrounding whitespace so `" rust "` and `"rust"` produce
/// the same query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilters {
    pub search: Option<String>,
    pub skill: Option<String>,
    pub location: Option<String>,
    pub sector: Option<String>,
    pub sort_by: Option<String>,
}

impl RosterFilters {
    pub fn new(search: &str, skill: &str, location: &str, sector: &str, sort_by: &str) -> Self {
        Self {
            search: non_empty(search),
            skill: non_empty(skill),
            location: non_empty(location),
            sector: non_empty(sector),
            sort_by: non_empty(sort_by),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One page of the metadata listing. Both fields are defaulted so an empty or
/// truncated body reads as an empty final page instead of an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataPage {
    #[serde(default)]
    pub metadata: Vec<CandidateRecord>,
    #[serde(default, rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn fetch_page(
        &self,
        filters: RosterFilters,
        page_token: Option<String>,
    ) -> Result<MetadataPage>;

    async fn fetch_record(&self, id: String) -> Result<CandidateRecord>;

    async fn update_hiring_status(&self, id: String, status: Option<HiringStatus>) -> Result<()>;
}

/// Client for the remote resume-metadata service.
#[derive(Clone)]
pub struct HttpMetadataApi {
    client: Client,
    base_url: String,
}

impl HttpMetadataApi {
    pub fn new(client: Client, base_url: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, filters: &RosterFilters, page_token: Option<&str>) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/getmetadata", self.base_url))
            .map_err(|e| Error::Config(format!("Invalid metadata API url: {}", e)))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("pageSize", &PAGE_SIZE.to_string());
            if let Some(token) = page_token {
                pairs.append_pair("pageToken", token);
            }
            if let Some(search) = &filters.search {
                pairs.append_pair("search", search);
            }
            if let Some(skill) = &filters.skill {
                pairs.append_pair("skill", skill);
            }
            if let Some(location) = &filters.location {
                pairs.append_pair("location", location);
            }
            if let Some(sector) = &filters.sector {
                pairs.append_pair("sector", sector);
            }
            if let Some(sort_by) = &filters.sort_by {
                pairs.append_pair("sortBy", sort_by);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl MetadataApi for HttpMetadataApi {
    async fn fetch_page(
        &self,
        filters: RosterFilters,
        page_token: Option<String>,
    ) -> Result<MetadataPage> {
        let url = self.page_url(&filters, page_token.as_deref())?;
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;

        match response.json::<MetadataPage>().await {
            Ok(page) => Ok(page),
            Err(e) => {
                tracing::warn!(
                    url = %url,
                    "Metadata page body was not parseable ({}), treating as final empty page",
                    e
                );
                Ok(MetadataPage::default())
            }
        }
    }

    async fn fetch_record(&self, id: String) -> Result<CandidateRecord> {
        let url = format!("{}/api/getmetadata/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("Candidate {} not found", id)));
        }
        let record = response.error_for_status()?.json::<CandidateRecord>().await?;
        Ok(record)
    }

    async fn update_hiring_status(&self, id: String, status: Option<HiringStatus>) -> Result<()> {
        let url = format!("{}/api/upload/hiringstatus/{}", self.base_url, id);
        let body = json!({
            "hiringstatus": status.map(|s| s.as_str()).unwrap_or(""),
        });

        self.client
            .patch(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpMetadataApi {
        HttpMetadataApi::new(Client::new(), "https://metadata.example.com/".to_string())
    }

    #[test]
    fn filters_trim_and_drop_empty_fields() {
        let filters = RosterFilters::new(" ana ", "", "  ", "fintech", "recent");
        assert_eq!(filters.search.as_deref(), Some("ana"));
        assert_eq!(filters.skill, None);
        assert_eq!(filters.location, None);
        assert_eq!(filters.sector.as_deref(), Some("fintech"));
        assert_eq!(filters.sort_by.as_deref(), Some("recent"));
    }

    #[test]
    fn first_page_url_has_only_page_size() {
        let url = api().page_url(&RosterFilters::default(), None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://metadata.example.com/api/getmetadata?pageSize=10"
        );
    }

    #[test]
    fn cleared_filters_match_initial_query_shape() {
        let api = api();
        let initial = api.page_url(&RosterFilters::default(), None).unwrap();
        let applied = api
            .page_url(&RosterFilters::new("ana", "", "", "", ""), None)
            .unwrap();
        let cleared = api
            .page_url(&RosterFilters::new("", "", "", "", ""), None)
            .unwrap();
        assert_ne!(initial.as_str(), applied.as_str());
        assert_eq!(initial.as_str(), cleared.as_str());
    }

    #[test]
    fn continuation_url_carries_token_and_filters() {
        let filters = RosterFilters::new("ana", "rust", "", "", "recent");
        let url = api().page_url(&filters, Some("abc")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://metadata.example.com/api/getmetadata?pageSize=10&pageToken=abc&search=ana&skill=rust&sortBy=recent"
        );
    }

    #[test]
    fn empty_body_parses_as_final_page() {
        let page: MetadataPage = serde_json::from_str("{}").unwrap();
        assert!(page.metadata.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn null_next_token_parses_as_exhausted() {
        let page: MetadataPage =
            serde_json::from_value(serde_json::json!({
                "metadata": [{ "id": "r1" }],
                "nextPageToken": null
            }))
            .unwrap();
        assert_eq!(page.metadata.len(), 1);
        assert_eq!(page.next_page_token, None);
    }
}
