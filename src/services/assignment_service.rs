use crate::error::{Error, Result};
use crate::models::assignment::{AssignmentRecord, NewAssignment};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Assignments for the given company, restricted to the resumes on the
    /// current page.
    async fn list_for_resumes(
        &self,
        company_id: String,
        resume_ids: Vec<String>,
    ) -> Result<Vec<AssignmentRecord>>;

    async fn list_for_company(&self, company_id: String) -> Result<Vec<AssignmentRecord>>;

    async fn create(&self, assignment: NewAssignment) -> Result<AssignmentRecord>;
}

#[derive(Clone)]
pub struct PgAssignmentStore {
    pool: PgPool,
}

impl PgAssignmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn list_for_resumes(
        &self,
        company_id: String,
        resume_ids: Vec<String>,
    ) -> Result<Vec<AssignmentRecord>> {
        if resume_ids.is_empty() {
            return Ok(Vec::new());
        }

        let assignments = sqlx::query_as::<_, AssignmentRecord>(
            r#"
            SELECT id, resume_id, recruiter_id, company_id, companyname, notes, locked, tagged_at
            FROM resume_assignments
            WHERE company_id = $1 AND resume_id = ANY($2)
            "#,
        )
        .bind(&company_id)
        .bind(&resume_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    async fn list_for_company(&self, company_id: String) -> Result<Vec<AssignmentRecord>> {
        let assignments = sqlx::query_as::<_, AssignmentRecord>(
            r#"
            SELECT id, resume_id, recruiter_id, company_id, companyname, notes, locked, tagged_at
            FROM resume_assignments
            WHERE company_id = $1
            ORDER BY tagged_at DESC
            "#,
        )
        .bind(&company_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(assignments)
    }

    async fn create(&self, assignment: NewAssignment) -> Result<AssignmentRecord> {
        // One assignment per (resume, company) pair is an application
        // convention, not a constraint, so check before inserting.
        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM resume_assignments WHERE resume_id = $1 AND company_id = $2",
        )
        .bind(&assignment.resume_id)
        .bind(&assignment.company_id)
        .fetch_optional(&self.pool)
        .await?;
        if exists.is_some() {
            return Err(Error::BadRequest(
                "This resume is already assigned to a recruiter for this company".to_string(),
            ));
        }

        let created = sqlx::query_as::<_, AssignmentRecord>(
            r#"
            INSERT INTO resume_assignments (id, resume_id, recruiter_id, company_id, companyname, notes, locked, tagged_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW())
            RETURNING id, resume_id, recruiter_id, company_id, companyname, notes, locked, tagged_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&assignment.resume_id)
        .bind(&assignment.recruiter_id)
        .bind(&assignment.company_id)
        .bind(&assignment.companyname)
        .bind(&assignment.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }
}
