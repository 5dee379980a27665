use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::MetadataProbe;
use super::process::run_tool;
use crate::config::settings::ToolConfig;

pub struct FfprobeProbe {
    ffprobe_bin: String,
    timeout: Duration,
}

impl FfprobeProbe {
    pub fn new(tools: &ToolConfig) -> Self {
        Self {
            ffprobe_bin: tools.ffprobe_bin.clone(),
            timeout: tools.probe_timeout,
        }
    }
}

#[async_trait]
impl MetadataProbe for FfprobeProbe {
    async fn duration_centis(&self, path: &Path) -> Option<i64> {
        let args: Vec<&OsStr> = vec![
            "-v".as_ref(),
            "quiet".as_ref(),
            "-show_entries".as_ref(),
            "format=duration".as_ref(),
            "-of".as_ref(),
            "csv=p=0".as_ref(),
            path.as_os_str(),
        ];

        match run_tool(&self.ffprobe_bin, args, self.timeout).await {
            Ok(output) => parse_duration_centis(&String::from_utf8_lossy(&output.stdout)),
            Err(e) => {
                warn!("Failed to get video duration for {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Parses ffprobe's seconds output into hundredths, rounding half away from zero.
pub fn parse_duration_centis(raw: &str) -> Option<i64> {
    let seconds: f64 = raw.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((seconds * 100.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_decimal_precision() {
        assert_eq!(parse_duration_centis("12.300000\n"), Some(1230));
        assert_eq!(parse_duration_centis("0.004"), Some(0));
        assert_eq!(parse_duration_centis("59.996"), Some(6000));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_duration_centis(""), None);
        assert_eq!(parse_duration_centis("N/A"), None);
        assert_eq!(parse_duration_centis("-1"), None);
    }
}
