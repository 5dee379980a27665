use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{debug, error};

use super::Muxer;
use super::process::run_tool;
use crate::config::settings::ToolConfig;
use crate::error::{DubbingError, DubbingResult};

pub struct FfmpegMuxer {
    ffmpeg_bin: String,
    timeout: Duration,
}

impl FfmpegMuxer {
    pub fn new(tools: &ToolConfig) -> Self {
        Self {
            ffmpeg_bin: tools.ffmpeg_bin.clone(),
            timeout: tools.mux_timeout,
        }
    }

    async fn try_mux(&self, video: &Path, audio: &Path, output: &Path) -> DubbingResult<()> {
        // keep the original video stream, replace the audio
        let args: Vec<&OsStr> = vec![
            "-y".as_ref(),
            "-i".as_ref(),
            video.as_os_str(),
            "-i".as_ref(),
            audio.as_os_str(),
            "-c:v".as_ref(),
            "copy".as_ref(),
            "-c:a".as_ref(),
            "aac".as_ref(),
            "-map".as_ref(),
            "0:v:0".as_ref(),
            "-map".as_ref(),
            "1:a:0".as_ref(),
            output.as_os_str(),
        ];
        run_tool(&self.ffmpeg_bin, args, self.timeout).await?;

        if !tokio::fs::try_exists(output).await.unwrap_or(false) {
            return Err(DubbingError::tool(
                &self.ffmpeg_bin,
                format!("no output written to {}", output.display()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Muxer for FfmpegMuxer {
    async fn mux(&self, video: &Path, audio: &Path, output: &Path) -> Option<PathBuf> {
        debug!("Replacing audio of {} into {}", video.display(), output.display());

        match self.try_mux(video, audio, output).await {
            Ok(()) => Some(output.to_path_buf()),
            Err(e) => {
                error!("Error replacing video audio: {}", e);
                let _ = tokio::fs::remove_file(output).await;
                None
            }
        }
    }
}

/// `<video stem>_dubbed_<code>_<YYYYmmdd_HHMMSS>.mp4`
pub fn output_file_name(video_path: &Path, language_code: &str, at: OffsetDateTime) -> String {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    let stamp = at
        .format(format_description!("[year][month][day]_[hour][minute][second]"))
        .unwrap_or_default();

    format!("{}_dubbed_{}_{}.mp4", stem, language_code, stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn output_name_uses_stem_code_and_timestamp() {
        let at = datetime!(2024-03-05 07:08:09 UTC);
        assert_eq!(
            output_file_name(Path::new("/uploads/clip.mp4"), "es", at),
            "clip_dubbed_es_20240305_070809.mp4"
        );
        assert_eq!(
            output_file_name(Path::new("movie.final.mkv"), "fr", at),
            "movie.final_dubbed_fr_20240305_070809.mp4"
        );
    }
}
