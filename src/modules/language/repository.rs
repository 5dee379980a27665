use super::model::Language;
use anyhow::{anyhow, Result};
use sqlx::PgPool;
use uuid::Uuid;

pub struct LanguageRepository;

impl LanguageRepository {
    pub async fn create(pool: &PgPool, code: &str, name: &str) -> Result<Language> {
        let language = sqlx::query_as::<_, Language>(
            r#"
            INSERT INTO languages (id, code, name, is_active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, code, name, is_active
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(code)
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(|e| anyhow!("Failed to create language: {}", e))?;

        Ok(language)
    }

    pub async fn find_active(pool: &PgPool) -> Result<Vec<Language>> {
        let languages = sqlx::query_as::<_, Language>(
            r#"
            SELECT id, code, name, is_active
            FROM languages
            WHERE is_active
            ORDER BY name ASC
            "#,
        )
        .fetch_all(pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch languages: {}", e))?;

        Ok(languages)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Language>> {
        let language = sqlx::query_as::<_, Language>(
            "SELECT id, code, name, is_active FROM languages WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| anyhow!("Failed to fetch language: {}", e))?;

        Ok(language)
    }

    pub async fn find_by_code(pool: &PgPool, code: &str) -> Result<Option<Language>> {
        let language = sqlx::query_as::<_, Language>(
            "SELECT id, code, name, is_active FROM languages WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(pool)
        .await?;

        Ok(language)
    }
}
