use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

/// Languages every installation starts with.
pub const DEFAULT_LANGUAGES: [(&str, &str); 4] = [
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
];
