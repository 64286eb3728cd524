//! Loaders for job description files and previously-found candidate lists.
//!
//! - job files are JSON objects shaped like [`JobDescription`]
//! - seen-candidate files hold one username per line; blank lines and
//!   lines starting with `#` are ignored

use crate::error::{ModelError, Result};
use crate::types::{JobDescription, Username};
use std::fs;
use std::path::Path;

fn read_file(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(ModelError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

/// Parse a job description from JSON text.
pub fn parse_job(content: &str, file: &str) -> Result<JobDescription> {
    let job: JobDescription =
        serde_json::from_str(content).map_err(|e| ModelError::ParseError {
            file: file.to_string(),
            reason: e.to_string(),
        })?;

    if job.id.trim().is_empty() {
        return Err(ModelError::InvalidValue {
            field: "id".to_string(),
            value: job.id,
        });
    }
    if job.title.trim().is_empty() {
        return Err(ModelError::InvalidValue {
            field: "title".to_string(),
            value: job.title,
        });
    }
    Ok(job)
}

/// Load a job description from a JSON file.
pub fn load_job(path: &Path) -> Result<JobDescription> {
    let content = read_file(path)?;
    parse_job(&content, &path.display().to_string())
}

/// Parse a newline-separated username list.
pub fn parse_seen_usernames(content: &str) -> Vec<Username> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_start_matches('@').to_string())
        .collect()
}

/// Load the usernames already found for a job.
pub fn load_seen_usernames(path: &Path) -> Result<Vec<Username>> {
    let content = read_file(path)?;
    Ok(parse_seen_usernames(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_minimal() {
        let job = parse_job(r#"{"id": "job-1", "title": "Rust Engineer"}"#, "job.json").unwrap();
        assert_eq!(job.id, "job-1");
        assert_eq!(job.title, "Rust Engineer");
        assert!(job.requirements.is_empty());
        assert_eq!(job.search_location(), None);
    }

    #[test]
    fn test_parse_job_rejects_blank_title() {
        let result = parse_job(r#"{"id": "job-1", "title": "  "}"#, "job.json");
        assert!(matches!(result, Err(ModelError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_job_reports_malformed_json() {
        let result = parse_job("{not json", "broken.json");
        match result {
            Err(ModelError::ParseError { file, .. }) => assert_eq!(file, "broken.json"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_location_is_absent() {
        let job = parse_job(
            r#"{"id": "j", "title": "t", "location": "   "}"#,
            "job.json",
        )
        .unwrap();
        assert_eq!(job.search_location(), None);
    }

    #[test]
    fn test_parse_seen_usernames() {
        let seen = parse_seen_usernames("octocat\n\n# comment\n@torvalds\n  alice  \n");
        assert_eq!(seen, vec!["octocat", "torvalds", "alice"]);
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_job(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ModelError::FileNotFound { .. })));
    }
}
