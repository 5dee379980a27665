//! Stand-ins for ffmpeg, ffprobe and the OpenAI endpoint used by adapter tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::settings::{OpenAiConfig, ToolConfig};

/// Writes to its last argument, then exits 1.
pub(crate) const WRITES_THEN_FAILS: &str =
    "for last; do :; done\necho partial > \"$last\"\necho 'conversion failed' >&2\nexit 1\n";

/// Writes to its last argument, then hangs.
pub(crate) const WRITES_THEN_HANGS: &str =
    "for last; do :; done\necho partial > \"$last\"\nexec sleep 30\n";

/// Writes to its last argument and succeeds.
pub(crate) const WRITES_OUTPUT: &str = "for last; do :; done\necho media > \"$last\"\n";

/// Creates an executable shell script named `name` in `dir`.
#[cfg(unix)]
pub(crate) fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    write!(file, "#!/bin/sh\n{}", body).unwrap();
    file.sync_all().unwrap();
    drop(file);
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

pub(crate) fn tools(bin: &Path, timeout: Duration) -> ToolConfig {
    let bin = bin.to_string_lossy().into_owned();
    ToolConfig {
        ffmpeg_bin: bin.clone(),
        ffprobe_bin: bin,
        probe_timeout: timeout,
        extract_timeout: timeout,
        mux_timeout: timeout,
    }
}

/// Files in `dir` whose names start with `prefix`.
pub(crate) fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| n.to_string_lossy().starts_with(prefix))
        })
        .collect()
}

/// Points every call at a closed local port.
pub(crate) fn unreachable_openai() -> OpenAiConfig {
    OpenAiConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        transcription_timeout: Duration::from_secs(5),
        translation_timeout: Duration::from_secs(5),
        synthesis_timeout: Duration::from_secs(5),
        ..OpenAiConfig::default()
    }
}
