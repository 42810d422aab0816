use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tempfile::NamedTempFile;

/// Self-documenting header written at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- tend recovery log — append-only
     This file captures persisted data that tend read but could not use.
     If tasks went missing after an error, the raw data is here.
     Safe to delete if empty or stale. -->

---
";

/// A single entry in the recovery log.
#[derive(Debug, Clone)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    /// The raw payload that failed to parse
    pub body: String,
}

/// Return the path to the recovery log file.
pub fn recovery_log_path(dir: &Path) -> PathBuf {
    dir.join(".recovery.log")
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

impl RecoveryEntry {
    fn to_block(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "## {} — {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.description,
        ));
        out.push_str("```\n");
        out.push_str(&self.body);
        if !self.body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n\n---\n");
        out
    }
}

/// Append an entry to the recovery log. Best-effort: a failure to log is
/// swallowed, since the log itself is the fallback path.
pub fn log_recovery(dir: &Path, entry: RecoveryEntry) {
    let _ = try_log(dir, &entry);
}

fn try_log(dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(dir);
    if !path.exists() {
        atomic_write(&path, FILE_HEADER.as_bytes())?;
    }
    let mut file = OpenOptions::new().append(true).open(&path)?;
    file.write_all(entry.to_block().as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn entry(description: &str, body: &str) -> RecoveryEntry {
        RecoveryEntry {
            timestamp: "2024-05-01T09:30:00Z".parse().unwrap(),
            description: description.into(),
            body: body.into(),
        }
    }

    #[test]
    fn first_entry_writes_header() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), entry("malformed tasks value", "not json {{{"));

        let content = fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        assert!(content.starts_with("<!-- tend recovery log"));
        assert!(content.contains("2024-05-01T09:30:00Z — malformed tasks value"));
        assert!(content.contains("not json {{{"));
    }

    #[test]
    fn entries_append_in_order() {
        let dir = TempDir::new().unwrap();
        log_recovery(dir.path(), entry("first", "aaa"));
        log_recovery(dir.path(), entry("second", "bbb"));

        let content = fs::read_to_string(recovery_log_path(dir.path())).unwrap();
        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        assert!(first < second);
        // Header only once
        assert_eq!(content.matches("tend recovery log").count(), 1);
    }

    #[test]
    fn logging_into_missing_dir_is_swallowed() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");
        // Must not panic
        log_recovery(&gone, entry("x", "y"));
        assert!(!recovery_log_path(&gone).exists());
    }
}
