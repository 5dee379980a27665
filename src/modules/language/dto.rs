use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::model::Language;

#[derive(Debug, Serialize, ToSchema)]
pub struct LanguageResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub is_active: bool,
}

impl From<Language> for LanguageResponse {
    fn from(l: Language) -> Self {
        Self {
            id: l.id,
            code: l.code,
            name: l.name,
            is_active: l.is_active,
        }
    }
}
