use crate::error::{Error, Result};
use crate::models::assignment::AssignmentRecord;
use crate::models::candidate::{CandidateRecord, HiringStatus, MergedCandidate};
use crate::services::assignment_service::AssignmentStore;
use crate::services::metadata_service::{MetadataApi, RosterFilters};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How many rows before the end of the loaded list a scroll event starts
/// prefetching the next page.
pub const SCROLL_LOOKAHEAD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterPhase {
    Idle,
    Fetching,
    Exhausted,
}

#[derive(Debug)]
struct RosterState {
    records: Vec<MergedCandidate>,
    cursor: Option<String>,
    filters: RosterFilters,
    phase: RosterPhase,
    // Both live under the state lock: the busy flag must be seized in the
    // same critical section that snapshots (epoch, cursor), or two triggers
    // can fetch the same cursor under one live epoch.
    busy: bool,
    epoch: u64,
}

/// Snapshot of a session handed to the HTTP layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView {
    pub records: Vec<MergedCandidate>,
    pub phase: RosterPhase,
    pub has_more: bool,
    pub total: usize,
}

/// Incrementally loaded, filtered view of candidates merged with their
/// company-scoped recruiter assignment.
///
/// Fetch triggers (filter change, scroll, explicit next-page) are serialized
/// by a busy flag so at most one round-trip runs per cursor. Each fetch is
/// tagged with the filter epoch it was issued under; a fetch that resolves
/// after its filters were replaced is discarded instead of appended.
pub struct RosterSession {
    metadata: Arc<dyn MetadataApi>,
    assignments: Arc<dyn AssignmentStore>,
    company_id: String,
    state: Mutex<RosterState>,
}

impl RosterSession {
    pub fn new(
        metadata: Arc<dyn MetadataApi>,
        assignments: Arc<dyn AssignmentStore>,
        company_id: String,
    ) -> Self {
        Self {
            metadata,
            assignments,
            company_id,
            state: Mutex::new(RosterState {
                records: Vec::new(),
                cursor: None,
                filters: RosterFilters::default(),
                phase: RosterPhase::Idle,
                busy: false,
                epoch: 0,
            }),
        }
    }

    /// Replaces the active filter set, clears the list and cursor, and fetches
    /// a fresh first page. A fetch still in flight for the previous filters
    /// keeps running but its result is discarded (see `finish_fetch`).
    pub async fn apply_filters(&self, filters: RosterFilters) -> Result<()> {
        let epoch = {
            let mut state = self.lock_state();
            state.filters = filters;
            state.records.clear();
            state.cursor = None;
            state.phase = RosterPhase::Fetching;
            state.epoch += 1;
            // Seizing busy here, not after the lock drops: a page trigger
            // racing in between would otherwise fetch under the new epoch.
            state.busy = true;
            state.epoch
        };
        self.run_fetch(epoch, None).await
    }

    /// Re-runs the current filters from the first page.
    pub async fn refresh(&self) -> Result<()> {
        let filters = self.lock_state().filters.clone();
        self.apply_filters(filters).await
    }

    /// Fetches the next page behind the stored cursor. No-op while another
    /// fetch is in flight or after the result set is exhausted.
    pub async fn load_next_page(&self) -> Result<()> {
        // Busy-check, phase-check and (epoch, cursor) snapshot in one
        // critical section, so a concurrent filter change either has
        // already seized busy (this trigger no-ops) or bumps the epoch
        // after the snapshot (this fetch resolves dead and is discarded).
        let pending = {
            let mut state = self.lock_state();
            if state.busy || state.phase == RosterPhase::Exhausted {
                None
            } else {
                state.busy = true;
                state.phase = RosterPhase::Fetching;
                Some((state.epoch, state.cursor.clone()))
            }
        };

        match pending {
            Some((epoch, cursor)) => self.run_fetch(epoch, cursor).await,
            None => Ok(()),
        }
    }

    /// Infinite-scroll trigger: starts the next page once the viewport is
    /// within `SCROLL_LOOKAHEAD` rows of the end of the loaded list.
    pub async fn on_scroll_near_end(&self, visible_stop_index: usize) -> Result<()> {
        let near_end = {
            let state = self.lock_state();
            !state.busy
                && state.cursor.is_some()
                && visible_stop_index + SCROLL_LOOKAHEAD >= state.records.len()
        };
        if near_end {
            self.load_next_page().await
        } else {
            Ok(())
        }
    }

    /// Optimistically sets the status locally, then pushes it to the metadata
    /// service. On push failure the single affected record is re-fetched so
    /// the view returns to ground truth; if that also fails the optimistic
    /// value stays until the next refresh.
    pub async fn update_hiring_status(
        &self,
        candidate_id: &str,
        new_status: Option<HiringStatus>,
    ) -> Result<()> {
        {
            let mut state = self.lock_state();
            let slot = state
                .records
                .iter_mut()
                .find(|m| m.record.id == candidate_id)
                .ok_or_else(|| {
                    Error::NotFound(format!(
                        "Candidate {} is not in the current roster",
                        candidate_id
                    ))
                })?;
            slot.record.hiringstatus = new_status;
        }

        match self
            .metadata
            .update_hiring_status(candidate_id.to_string(), new_status)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                tracing::warn!(
                    candidate_id,
                    "Hiring status update failed, re-fetching record: {}",
                    err
                );
                match self.metadata.fetch_record(candidate_id.to_string()).await {
                    Ok(fresh) => {
                        let mut state = self.lock_state();
                        if let Some(slot) =
                            state.records.iter_mut().find(|m| m.record.id == candidate_id)
                        {
                            slot.record = fresh;
                        }
                    }
                    Err(refetch_err) => {
                        tracing::warn!(
                            candidate_id,
                            "Could not re-fetch candidate after failed update: {}",
                            refetch_err
                        );
                    }
                }
                Err(err)
            }
        }
    }

    pub fn view(&self) -> RosterView {
        let state = self.lock_state();
        RosterView {
            records: state.records.clone(),
            phase: state.phase,
            has_more: state.cursor.is_some(),
            total: state.records.len(),
        }
    }

    async fn run_fetch(&self, epoch: u64, page_token: Option<String>) -> Result<()> {
        let filters = self.lock_state().filters.clone();

        let page = match self.metadata.fetch_page(filters, page_token).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(company_id = %self.company_id, "Roster page fetch failed: {}", err);
                self.finish_fetch(epoch, |state| state.phase = RosterPhase::Idle);
                return Err(err);
            }
        };

        // The assignment query is scoped to the resumes on this page, so it
        // has to run after the page resolves.
        let resume_ids: Vec<String> = page.metadata.iter().map(|r| r.id.clone()).collect();
        let assignments = if resume_ids.is_empty() {
            Vec::new()
        } else {
            match self
                .assignments
                .list_for_resumes(self.company_id.clone(), resume_ids)
                .await
            {
                Ok(assignments) => assignments,
                Err(err) => {
                    // The page is dropped whole rather than merged partially.
                    tracing::warn!(company_id = %self.company_id, "Assignment lookup failed: {}", err);
                    self.finish_fetch(epoch, |state| state.phase = RosterPhase::Idle);
                    return Err(err);
                }
            }
        };

        let merged = merge_with_assignments(page.metadata, &assignments);
        let next_cursor = page.next_page_token;
        let applied = self.finish_fetch(epoch, move |state| {
            state.records.extend(merged);
            state.phase = if next_cursor.is_some() {
                RosterPhase::Idle
            } else {
                RosterPhase::Exhausted
            };
            state.cursor = next_cursor;
        });
        if !applied {
            tracing::debug!(
                company_id = %self.company_id,
                epoch,
                "Discarded roster page issued under a superseded filter set"
            );
        }
        Ok(())
    }

    /// Applies `update` and releases the busy flag, but only when `epoch` is
    /// still live. A fetch whose filters were replaced mid-flight must neither
    /// touch the list nor release a flag it no longer owns.
    fn finish_fetch(&self, epoch: u64, update: impl FnOnce(&mut RosterState)) -> bool {
        let mut state = self.lock_state();
        if state.epoch != epoch {
            return false;
        }
        update(&mut state);
        state.busy = false;
        true
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, RosterState> {
        self.state.lock().expect("roster state mutex poisoned")
    }
}

/// Attaches each record's company-scoped assignment, keyed by resume id.
/// Records without one carry the `None` triple.
pub fn merge_with_assignments(
    records: Vec<CandidateRecord>,
    assignments: &[AssignmentRecord],
) -> Vec<MergedCandidate> {
    let by_resume: HashMap<&str, &AssignmentRecord> = assignments
        .iter()
        .map(|a| (a.resume_id.as_str(), a))
        .collect();

    records
        .into_iter()
        .map(|record| match by_resume.get(record.id.as_str()) {
            Some(assignment) => MergedCandidate {
                record,
                recruiter_id: Some(assignment.recruiter_id.clone()),
                company_id: Some(assignment.company_id.clone()),
                companyname: Some(assignment.companyname.clone()),
            },
            None => MergedCandidate::unassigned(record),
        })
        .collect()
}
