use std::fs::File;
use std::path::Path;

use chrono::Local;

use crate::error::{HistoryError, Result};
use crate::models::{CheckResult, ProfileHistory};

/// Column set for CSV export. Only successful checks produce rows; failed
/// ones have no history to flatten.
const CSV_HEADER: [&str; 5] = [
    "username",
    "is_clean",
    "total_changes",
    "history",
    "timestamp",
];

/// Write results to `path` as pretty JSON or CSV.
///
/// Any other format value fails with [`HistoryError::UnsupportedFormat`]
/// before anything is written.
pub fn export_results(results: &[CheckResult], path: impl AsRef<Path>, format: &str) -> Result<()> {
    match format {
        "json" => export_json(results, path.as_ref()),
        "csv" => export_csv(results, path.as_ref()),
        other => Err(HistoryError::UnsupportedFormat(other.to_string())),
    }
}

/// Timestamped filename for `--save` runs without an explicit `--output`.
pub fn default_export_path(stem: &str, extension: &str) -> String {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    format!("{}_{}.{}", stem, timestamp, extension)
}

fn export_json(results: &[CheckResult], path: &Path) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, results)?;
    Ok(())
}

fn export_csv(results: &[CheckResult], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;

    for result in results.iter().filter(|r| r.success) {
        let default = ProfileHistory::default();
        let data = result.data.as_ref().unwrap_or(&default);
        writer.write_record(&[
            result.username.clone().unwrap_or_default(),
            data.is_clean.to_string(),
            data.total_changes.to_string(),
            data.history.join(", "),
            result.timestamp.clone().unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean_result() -> CheckResult {
        let result: CheckResult = serde_json::from_value(serde_json::json!({
            "success": true,
            "data": {
                "current_username": "jack",
                "is_clean": true,
                "total_changes": 0,
                "history": [],
                "insights": []
            }
        }))
        .unwrap();
        result.tagged("jack")
    }

    #[test]
    fn csv_export_of_single_clean_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        export_results(&[clean_result()], &path, "csv").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "username,is_clean,total_changes,history,timestamp");
        assert!(lines[1].starts_with("jack,true,0,,"));
    }

    #[test]
    fn csv_export_skips_failed_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let results = vec![clean_result(), CheckResult::failed("ghost", "boom")];
        export_results(&results, &path, "csv").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(!contents.contains("ghost"));
    }

    #[test]
    fn csv_quotes_history_entries_containing_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let result: CheckResult = serde_json::from_value(serde_json::json!({
            "success": true,
            "data": {
                "current_username": "jack",
                "is_clean": false,
                "total_changes": 2,
                "history": ["jck", "j4ck"],
                "insights": []
            }
        }))
        .unwrap();
        export_results(&[result.tagged("jack")], &path, "csv").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"jck, j4ck\""));
    }

    #[test]
    fn json_export_is_pretty_printed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        export_results(&[clean_result()], &path, "json").unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("[\n"));
        assert!(contents.contains("  {"));
        let parsed: Vec<CheckResult> = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].success);
    }

    #[test]
    fn unknown_format_fails_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xml");

        let err = export_results(&[clean_result()], &path, "xml").unwrap_err();
        assert!(matches!(err, HistoryError::UnsupportedFormat(ref f) if f == "xml"));
        assert!(!path.exists());
    }

    #[test]
    fn default_path_carries_stem_and_extension() {
        let path = default_export_path("handlecheck_jack", "csv");
        assert!(path.starts_with("handlecheck_jack_"));
        assert!(path.ends_with(".csv"));
    }
}
