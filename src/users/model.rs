use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored user record.
///
/// The JSON payload carries only the public fields; the identifier stays
/// internal and every field is dropped from the payload when empty/zero,
/// so a response only shows what is actually set.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    #[serde(skip_serializing)]
    pub id: Uuid,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub avatar_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub avatar_type: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub age: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_of_birth: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}
