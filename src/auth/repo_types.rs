use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

pub const ADMIN_ROLE: &str = "admin";

/// Administrative credential record.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String, // Argon2 PHC string, never exposed
    pub role: String,
    pub created_at: OffsetDateTime,
}
