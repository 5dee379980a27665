use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error};
use uuid::Uuid;

use super::AudioExtractor;
use super::process::run_tool;
use crate::config::settings::ToolConfig;
use crate::error::{DubbingError, DubbingResult};

pub struct FfmpegExtractor {
    ffmpeg_bin: String,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl FfmpegExtractor {
    pub fn new(tools: &ToolConfig, scratch_dir: &Path) -> Self {
        Self {
            ffmpeg_bin: tools.ffmpeg_bin.clone(),
            scratch_dir: scratch_dir.to_path_buf(),
            timeout: tools.extract_timeout,
        }
    }

    async fn try_extract(&self, video: &Path, audio: &Path) -> DubbingResult<()> {
        let args: Vec<&OsStr> = vec![
            "-y".as_ref(),
            "-i".as_ref(),
            video.as_os_str(),
            "-vn".as_ref(),
            "-acodec".as_ref(),
            "pcm_s16le".as_ref(),
            "-ar".as_ref(),
            "16000".as_ref(),
            "-ac".as_ref(),
            "1".as_ref(),
            audio.as_os_str(),
        ];
        run_tool(&self.ffmpeg_bin, args, self.timeout).await?;

        if !tokio::fs::try_exists(audio).await.unwrap_or(false) {
            return Err(DubbingError::tool(
                &self.ffmpeg_bin,
                format!("no audio written to {}", audio.display()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, video: &Path) -> Option<PathBuf> {
        let audio = self.scratch_dir.join(format!("audio_{}.wav", Uuid::new_v4().simple()));
        debug!("Extracting audio from {} to {}", video.display(), audio.display());

        match self.try_extract(video, &audio).await {
            Ok(()) => Some(audio),
            Err(e) => {
                error!("Error extracting audio: {}", e);
                let _ = tokio::fs::remove_file(&audio).await;
                None
            }
        }
    }
}
