use super::LoggingConfig;
use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// 清理历史日志: 超过保留天数的删除, 早于今天且未压缩的按配置压缩为 .gz
pub fn cleanup_logs(config: &LoggingConfig) -> Result<()> {
    // 滚动文件按 UTC 日期命名
    let today = Utc::now().date_naive();
    cleanup_logs_at(config, today)
}

pub(super) fn cleanup_logs_at(config: &LoggingConfig, today: NaiveDate) -> Result<()> {
    let directory = Path::new(&config.directory);
    if !directory.exists() {
        return Ok(());
    }

    let cutoff = today - ChronoDuration::days(config.retention_days);

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let file_path = entry.path();

        let (date, compressed) = match parse_rotated_log_name(&file_name, &config.file_prefix) {
            Some(value) => value,
            None => continue,
        };

        if date < cutoff {
            let _ = fs::remove_file(&file_path);
            continue;
        }

        if config.compress_history && !compressed && date < today {
            compress_to_gz(&file_path)?;
        }
    }

    Ok(())
}

fn compress_to_gz(path: &Path) -> Result<()> {
    let gz_path = PathBuf::from(format!("{}.gz", path.display()));
    if gz_path.exists() {
        return Ok(());
    }

    let mut input =
        File::open(path).with_context(|| format!("打开待压缩日志失败, path={}", path.display()))?;
    let output = File::create(&gz_path)
        .with_context(|| format!("创建压缩日志失败, path={}", gz_path.display()))?;
    let mut encoder = GzEncoder::new(output, Compression::default());

    let mut buf = [0u8; 8 * 1024];
    loop {
        let read = input.read(&mut buf)?;
        if read == 0 {
            break;
        }
        encoder.write_all(&buf[..read])?;
    }

    encoder.finish()?;
    fs::remove_file(path)
        .with_context(|| format!("删除已压缩日志失败, path={}", path.display()))?;
    Ok(())
}

fn parse_rotated_log_name(file_name: &str, prefix: &str) -> Option<(NaiveDate, bool)> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('.')?;

    if let Some(date_part) = rest.strip_suffix(".log") {
        return parse_date(date_part).map(|d| (d, false));
    }
    if let Some(date_part) = rest.strip_suffix(".log.gz") {
        return parse_date(date_part).map(|d| (d, true));
    }
    None
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_for(dir: &TempDir) -> LoggingConfig {
        LoggingConfig {
            level: "info".to_string(),
            directory: dir.path().to_string_lossy().to_string(),
            file_prefix: "cedar".to_string(),
            console_level: "warn".to_string(),
            retention_days: 7,
            compress_history: true,
        }
    }

    #[test]
    fn test_parse_rotated_log_name() {
        let d = NaiveDate::from_ymd_opt(2026, 2, 6);
        assert_eq!(parse_rotated_log_name("cedar.2026-02-06.log", "cedar"), d.map(|d| (d, false)));
        assert_eq!(parse_rotated_log_name("cedar.2026-02-06.log.gz", "cedar"), d.map(|d| (d, true)));
        assert!(parse_rotated_log_name("cedar.log", "cedar").is_none());
        assert!(parse_rotated_log_name("other.2026-02-06.log", "cedar").is_none());
    }

    #[test]
    fn test_cleanup_removes_expired_and_compresses_history() {
        let dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(err) => panic!("创建临时目录失败: {}", err),
        };
        let config = config_for(&dir);
        let today = NaiveDate::from_ymd_opt(2026, 3, 20).unwrap();

        let expired = dir.path().join("cedar.2026-03-01.log");
        let yesterday = dir.path().join("cedar.2026-03-19.log");
        let current = dir.path().join("cedar.2026-03-20.log");
        let unrelated = dir.path().join("notes.txt");
        for path in [&expired, &yesterday, &current, &unrelated] {
            fs::write(path, b"line\n").unwrap();
        }

        cleanup_logs_at(&config, today).unwrap();

        assert!(!expired.exists(), "过期日志应被删除");
        assert!(!yesterday.exists(), "昨天的日志应被压缩");
        assert!(dir.path().join("cedar.2026-03-19.log.gz").exists());
        assert!(current.exists(), "当天日志不应改动");
        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_missing_directory_is_ok() {
        let config = LoggingConfig {
            directory: "/nonexistent/cedar-logs".to_string(),
            ..LoggingConfig::with_verbosity("cedar", 0)
        };
        assert!(cleanup_logs(&config).is_ok());
    }
}
