use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::leads::repo_types::{Lead, LeadFilter, LeadPatch, NewLead};

/// Persistence contract for leads. Every call is a single round trip with
/// last-write-wins semantics; nothing is retried.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn list_all(&self, filter: &LeadFilter) -> StoreResult<Vec<Lead>>;
    async fn get_by_id(&self, id: Uuid) -> StoreResult<Lead>;
    async fn create(&self, lead: NewLead) -> StoreResult<Lead>;
    async fn update(&self, id: Uuid, patch: LeadPatch) -> StoreResult<Lead>;
    async fn delete(&self, id: Uuid) -> StoreResult<()>;
}

const LEAD_COLUMNS: &str = "id, full_name, email, phone, role, birth_date, message, \
     utm_source, utm_medium, utm_campaign, utm_term, utm_content, gclid, fbclid, \
     created_at, updated_at";

#[derive(Clone)]
pub struct PgLeadStore {
    db: PgPool,
}

impl PgLeadStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Escapes LIKE wildcards so the search term matches literally.
fn like_pattern(search: &str) -> String {
    let mut out = String::with_capacity(search.len() + 2);
    out.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn list_all(&self, filter: &LeadFilter) -> StoreResult<Vec<Lead>> {
        let sql = format!(
            r#"
            SELECT {LEAD_COLUMNS}
            FROM leads
            WHERE $1::text IS NULL OR full_name ILIKE $1 OR email ILIKE $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#
        );
        let rows = sqlx::query_as::<_, Lead>(&sql)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<Lead> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1");
        sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound("lead"))
    }

    async fn create(&self, lead: NewLead) -> StoreResult<Lead> {
        let a = lead.attribution;
        let sql = format!(
            r#"
            INSERT INTO leads (full_name, email, phone, role, birth_date, message,
                               utm_source, utm_medium, utm_campaign, utm_term, utm_content, gclid, fbclid)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {LEAD_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Lead>(&sql)
            .bind(lead.full_name)
            .bind(lead.email)
            .bind(lead.phone)
            .bind(lead.role)
            .bind(lead.birth_date)
            .bind(lead.message)
            .bind(a.utm_source)
            .bind(a.utm_medium)
            .bind(a.utm_campaign)
            .bind(a.utm_term)
            .bind(a.utm_content)
            .bind(a.gclid)
            .bind(a.fbclid)
            .fetch_one(&self.db)
            .await?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, patch: LeadPatch) -> StoreResult<Lead> {
        let sql = format!(
            r#"
            UPDATE leads
            SET full_name  = COALESCE($2, full_name),
                email      = COALESCE($3, email),
                phone      = COALESCE($4, phone),
                role       = COALESCE($5, role),
                birth_date = COALESCE($6, birth_date),
                message    = COALESCE($7, message),
                updated_at = GREATEST(now(), created_at)
            WHERE id = $1
            RETURNING {LEAD_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Lead>(&sql)
            .bind(id)
            .bind(patch.full_name)
            .bind(patch.email)
            .bind(patch.phone)
            .bind(patch.role)
            .bind(patch.birth_date)
            .bind(patch.message)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound("lead"))
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        let res = sqlx::query("DELETE FROM leads WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound("lead"));
        }
        Ok(())
    }
}
