use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Error;

const BANNER: &str = r"                                   __
   ____  ____  _____ ____ ___     / /_
  / __ \/ __ \/ ___// __ `__ \   / __ \
 / / / / /_/ / /   / / / / / /  / /_/ /
/_/ /_/\____/_/   /_/ /_/ /_/  /_.___/
";

/// Banner, version line and the report sections joined in order.
pub(crate) fn assemble(sections: &[String]) -> String {
    let mut report = String::new();
    report.push_str(BANNER);
    report.push_str(&format!("\nVersion: {}\n\n", env!("CARGO_PKG_VERSION")));
    report.push_str(&sections.join("\n\n"));
    report.push('\n');
    report
}

/// Writes `contents` to `<dir>/NormalityReport_<timestamp>.txt`, creating
/// the directory first. Returns the path of the written file.
pub(crate) fn write(dir: &Path, contents: &str) -> Result<PathBuf, Error> {
    fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreation {
        dir: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("NormalityReport_{}.txt", timestamp()));
    fs::write(&path, contents)?;
    log::info!("normality report written to {}", path.display());
    Ok(path)
}

// ISO-8601 UTC timestamp with ':' and '.' replaced by '-', so the result is
// a portable filename component.
fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format_timestamp(now.as_secs(), now.subsec_micros())
}

fn format_timestamp(unix_secs: u64, micros: u32) -> String {
    let days = (unix_secs / 86_400) as i64;
    let rem = unix_secs % 86_400;
    let (year, month, day) = civil_from_days(days);
    let (hour, minute, second) = (rem / 3600, rem % 3600 / 60, rem % 60);
    format!("{year:04}-{month:02}-{day:02}T{hour:02}-{minute:02}-{second:02}-{micros:06}")
}

// Gregorian date for a day count since 1970-01-01 (Hinnant's civil_from_days).
fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_timestamp() {
        assert_eq!(format_timestamp(0, 0), "1970-01-01T00-00-00-000000");
    }

    #[test]
    fn known_instant() {
        // 2021-03-14 15:09:26.535897 UTC
        assert_eq!(
            format_timestamp(1_615_734_566, 535_897),
            "2021-03-14T15-09-26-535897"
        );
    }

    #[test]
    fn leap_day() {
        let (y, m, d) = civil_from_days(18_321); // 2020-02-29
        assert_eq!((y, m, d), (2020, 2, 29));
    }

    #[test]
    fn timestamp_has_no_reserved_characters() {
        let stamp = timestamp();
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
    }

    #[test]
    fn assembled_report_starts_with_banner_and_version() {
        let report = assemble(&["section a".to_string(), "section b".to_string()]);
        assert!(report.starts_with(BANNER));
        assert!(report.contains(concat!("Version: ", env!("CARGO_PKG_VERSION"))));
        assert!(report.contains("section a\n\nsection b"));
    }

    #[test]
    fn write_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports").join("txt");
        let path = write(&target, "report body").unwrap();
        assert!(path.starts_with(&target));
        assert_eq!(fs::read_to_string(&path).unwrap(), "report body");
    }

    #[test]
    fn unwritable_directory_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A file occupies the place where the directory should go.
        let blocker = dir.path().join("blocked");
        fs::write(&blocker, "").unwrap();
        let err = write(&blocker.join("txt"), "report body").unwrap_err();
        assert!(matches!(err, Error::DirectoryCreation { .. }));
    }
}
