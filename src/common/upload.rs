use anyhow::{anyhow, Result};
use axum::extract::multipart::Field;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{error, info};

/// A file written to local storage from a multipart field.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub original_filename: String,
    pub content_type: String,
    pub size: u64,
}

/// Writes a `video/*` multipart field to `path` chunk by chunk.
///
/// A partially written file is removed when the stream breaks.
pub async fn stream_to_disk(mut field: Field<'_>, path: &Path) -> Result<StoredFile> {
    let content_type = field
        .content_type()
        .map(str::to_string)
        .or_else(|| {
            field
                .file_name()
                .and_then(|n| mime_guess::from_path(n).first())
                .map(|m| m.to_string())
        })
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.to_string());

    if !content_type.starts_with("video/") {
        return Err(anyhow!("Invalid content type: only video/* allowed"));
    }

    let original_filename = field.file_name().unwrap_or("video.mp4").to_string();
    let mut file = File::create(path)
        .await
        .map_err(|e| anyhow!("Failed to create {}: {}", path.display(), e))?;
    let mut size = 0u64;

    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            Err(e) => {
                error!("Stream error: {}", e);
                drop(file);
                let _ = tokio::fs::remove_file(path).await;
                return Err(anyhow!("Stream interrupted"));
            }
        };

        if let Err(e) = file.write_all(&chunk).await {
            error!("Write error: {}", e);
            drop(file);
            let _ = tokio::fs::remove_file(path).await;
            return Err(anyhow!("Failed to write upload: {}", e));
        }
        size += chunk.len() as u64;
    }

    file.flush().await?;
    info!("Stored upload {} ({} bytes)", path.display(), size);

    Ok(StoredFile {
        path: path.to_path_buf(),
        original_filename,
        content_type,
        size,
    })
}
