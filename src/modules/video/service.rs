use super::model::{NewVideo, Video};
use crate::common::upload::StoredFile;
use crate::error::{DubbingError, Entity};
use crate::state::AppState;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{error, info};
use uuid::Uuid;

pub struct VideoService;

impl VideoService {
    /// `video_<YYYYmmdd_HHMMSS>_<short id><ext>`
    pub fn storage_name(original_filename: &str, at: OffsetDateTime) -> String {
        let stamp = at
            .format(format_description!("[year][month][day]_[hour][minute][second]"))
            .unwrap_or_default();
        let short_id = Uuid::new_v4().simple().to_string()[..6].to_string();
        let extension = Path::new(original_filename)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        format!("video_{}_{}{}", stamp, short_id, extension)
    }

    pub fn storage_path(state: &AppState, original_filename: &str) -> PathBuf {
        state
            .config
            .upload_dir
            .join(Self::storage_name(original_filename, OffsetDateTime::now_utc()))
    }

    pub async fn ensure_source_language(state: &AppState, source_language_id: Uuid) -> Result<()> {
        if state.store.find_language(source_language_id).await?.is_none() {
            return Err(DubbingError::not_found(Entity::Language, source_language_id).into());
        }
        Ok(())
    }

    /// Saves in-memory upload content and registers it.
    pub async fn save_video(
        state: &AppState,
        content: &[u8],
        original_filename: &str,
        mime_type: &str,
        source_language_id: Uuid,
    ) -> Result<Video> {
        if !mime_type.starts_with("video/") {
            return Err(anyhow!("Invalid content type: only video/* allowed"));
        }
        Self::ensure_source_language(state, source_language_id).await?;

        let path = Self::storage_path(state, original_filename);
        tokio::fs::write(&path, content)
            .await
            .map_err(|e| anyhow!("Failed to save {}: {}", path.display(), e))?;

        let stored = StoredFile {
            path,
            original_filename: original_filename.to_string(),
            content_type: mime_type.to_string(),
            size: content.len() as u64,
        };
        Self::register_upload(state, stored, source_language_id).await
    }

    /// Probes a stored file and creates its immutable record.
    pub async fn register_upload(
        state: &AppState,
        stored: StoredFile,
        source_language_id: Uuid,
    ) -> Result<Video> {
        let duration_centis = state.probe.duration_centis(&stored.path).await;
        let filename = stored
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let result = state
            .store
            .create_video(NewVideo {
                filename,
                original_filename: stored.original_filename,
                file_path: stored.path.to_string_lossy().into_owned(),
                file_size: stored.size as i64,
                duration_centis,
                mime_type: stored.content_type,
                source_language_id,
            })
            .await;

        match result {
            Ok(video) => {
                info!("Registered video {} ({})", video.id, video.file_path);
                Ok(video)
            }
            Err(e) => {
                error!("Failed to register {}: {}", stored.path.display(), e);
                let _ = tokio::fs::remove_file(&stored.path).await;
                Err(e)
            }
        }
    }

    pub async fn get(state: &AppState, id: Uuid) -> Option<Video> {
        match state.store.find_video(id).await {
            Ok(video) => video,
            Err(e) => {
                error!("Failed to fetch video {}: {}", id, e);
                None
            }
        }
    }

    pub async fn list(state: &AppState) -> Vec<Video> {
        match state.store.list_videos().await {
            Ok(videos) => videos,
            Err(e) => {
                error!("Failed to fetch videos: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn storage_name_keeps_extension() {
        let name = VideoService::storage_name("My Clip.MOV", datetime!(2024-01-02 03:04:05 UTC));
        assert!(name.starts_with("video_20240102_030405_"));
        assert!(name.ends_with(".MOV"));
        assert_eq!(name.len(), "video_20240102_030405_abcdef.MOV".len());
    }

    #[test]
    fn storage_name_without_extension() {
        let name = VideoService::storage_name("clip", datetime!(2024-01-02 03:04:05 UTC));
        assert!(!name.contains('.'));
    }
}
