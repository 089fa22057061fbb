use anyhow::Result;
use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::candidate::{CandidateRow, CandidateUpdate, NewCandidate};
use crate::models::job::{JobAttributes, JobChanges, JobRow};
use crate::models::matching::{MatchResult, MatchRow};
use crate::pagination::PageParams;
use crate::store::{JobEdit, Store};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_candidate(&self, candidate: NewCandidate) -> Result<Option<CandidateRow>> {
        let a = &candidate.attributes;
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            INSERT INTO candidates
                (id, cv_name, filehash, candidate_name, phone_number, email,
                 degree, experience, technical_skill, responsibility, certificate,
                 soft_skill, comment, job_recommended, office, sql)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (filehash) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&candidate.cv_name)
        .bind(&candidate.filehash)
        .bind(&a.candidate_name)
        .bind(&a.phone_number)
        .bind(&a.email)
        .bind(&a.degree)
        .bind(&a.experience)
        .bind(&a.technical_skill)
        .bind(&a.responsibility)
        .bind(&a.certificate)
        .bind(&a.soft_skill)
        .bind(&a.comment)
        .bind(&a.job_recommended)
        .bind(a.office)
        .bind(a.sql)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_candidate_by_hash(&self, filehash: &str) -> Result<Option<CandidateRow>> {
        let row = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE filehash = $1")
            .bind(filehash)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>> {
        let row = sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_candidates(&self, page: PageParams) -> Result<(Vec<CandidateRow>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok((rows, total))
    }

    async fn all_candidates(&self) -> Result<Vec<CandidateRow>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            "SELECT * FROM candidates ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update_candidate(&self, id: Uuid, update: &CandidateUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE candidates SET
                candidate_name = COALESCE($2, candidate_name),
                phone_number   = COALESCE($3, phone_number),
                email          = COALESCE($4, email),
                comment        = COALESCE($5, comment)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.candidate_name)
        .bind(&update.phone_number)
        .bind(&update.email)
        .bind(&update.comment)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_candidate(&self, id: Uuid) -> Result<bool> {
        // matches rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_job(
        &self,
        job_name: &str,
        job_description: &str,
        attributes: &JobAttributes,
    ) -> Result<Option<JobRow>> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs
                (id, job_name, job_description, degree, experience, technical_skill,
                 responsibility, certificate, soft_skill)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (job_name) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job_name)
        .bind(job_description)
        .bind(&attributes.degree)
        .bind(&attributes.experience)
        .bind(&attributes.technical_skill)
        .bind(&attributes.responsibility)
        .bind(&attributes.certificate)
        .bind(&attributes.soft_skill)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_job_by_name(&self, job_name: &str) -> Result<Option<JobRow>> {
        let row = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE job_name = $1")
            .bind(job_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_jobs(&self, page: PageParams) -> Result<(Vec<JobRow>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&self.pool)
            .await?;
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;
        Ok((rows, total))
    }

    async fn all_jobs(&self) -> Result<Vec<JobRow>> {
        let rows = sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY job_name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_job(&self, id: Uuid, changes: &JobChanges) -> Result<JobEdit> {
        let attrs = changes.attributes.as_ref();
        let result = sqlx::query(
            r#"
            UPDATE jobs SET
                job_name        = COALESCE($2, job_name),
                job_description = COALESCE($3, job_description),
                degree          = COALESCE($4, degree),
                experience      = COALESCE($5, experience),
                technical_skill = COALESCE($6, technical_skill),
                responsibility  = COALESCE($7, responsibility),
                certificate     = COALESCE($8, certificate),
                soft_skill      = COALESCE($9, soft_skill)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&changes.job_name)
        .bind(&changes.job_description)
        .bind(attrs.map(|a| &a.degree))
        .bind(attrs.map(|a| &a.experience))
        .bind(attrs.map(|a| &a.technical_skill))
        .bind(attrs.map(|a| &a.responsibility))
        .bind(attrs.map(|a| &a.certificate))
        .bind(attrs.map(|a| &a.soft_skill))
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() > 0 => Ok(JobEdit::Updated),
            Ok(_) => Ok(JobEdit::NotFound),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Ok(JobEdit::NameTaken),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_job(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_existing_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
    ) -> Result<Option<MatchRow>> {
        let row = sqlx::query_as::<_, MatchRow>(
            "SELECT * FROM matches WHERE candidate_id = $1 AND job_id = $2",
        )
        .bind(candidate_id)
        .bind(job_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_match(
        &self,
        candidate_id: Uuid,
        job_id: Uuid,
        result: &MatchResult,
    ) -> Result<bool> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO matches (id, candidate_id, job_id, categories, summary_comment, score)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (candidate_id, job_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(candidate_id)
        .bind(job_id)
        .bind(Json(&result.categories))
        .bind(&result.summary_comment)
        .bind(result.score)
        .execute(&self.pool)
        .await?;
        Ok(inserted.rows_affected() > 0)
    }

    async fn matches_for_job(&self, job_id: Uuid) -> Result<Vec<MatchRow>> {
        let rows = sqlx::query_as::<_, MatchRow>("SELECT * FROM matches WHERE job_id = $1")
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}
