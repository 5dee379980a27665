use super::model::{Language, DEFAULT_LANGUAGES};
use crate::infrastructure::store::Store;
use anyhow::Result;
use tracing::{error, info};
use uuid::Uuid;

pub struct LanguageService;

impl LanguageService {
    /// All active languages. A store fault yields an empty list.
    pub async fn languages(store: &dyn Store) -> Vec<Language> {
        match store.active_languages().await {
            Ok(languages) => languages,
            Err(e) => {
                error!("Failed to load languages: {}", e);
                Vec::new()
            }
        }
    }

    /// Active languages other than `source_language_id`. An id that matches
    /// nothing filters nothing.
    pub async fn target_languages(store: &dyn Store, source_language_id: Uuid) -> Vec<Language> {
        Self::languages(store)
            .await
            .into_iter()
            .filter(|l| l.id != source_language_id)
            .collect()
    }

    /// Inserts the default languages that are missing. Safe to call on every start.
    pub async fn seed_defaults(store: &dyn Store) -> Result<usize> {
        let mut created = 0;
        for (code, name) in DEFAULT_LANGUAGES {
            if store.find_language_by_code(code).await?.is_none() {
                store.create_language(code, name).await?;
                created += 1;
            }
        }

        if created > 0 {
            info!("Seeded {} languages", created);
        }
        Ok(created)
    }
}
