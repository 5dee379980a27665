/// Human readable byte size, e.g. `1.5 KB`.
pub fn format_file_size(size_bytes: i64) -> String {
    let mut size = size_bytes.max(0) as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

/// `MM:SS` from hundredths of a second; fractions are dropped.
pub fn format_duration(duration_centis: i64) -> String {
    let total_seconds = duration_centis.max(0) / 100;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0.0 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_file_size(3 * 1024_i64.pow(4)), "3.0 TB");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(1230), "00:12");
        assert_eq!(format_duration(6_199), "01:01");
        assert_eq!(format_duration(360_000), "60:00");
    }
}
