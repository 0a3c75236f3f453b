//! Inputs for the pull-request action that runs after the sync.
//!
//! The branch, commit and PR are created by the CI workflow; this module
//! only decides their names and text, and writes them to the
//! `GITHUB_OUTPUT` file so later workflow steps can read them.

use crate::publisher::ChangeSet;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

pub const BRANCH_PREFIX: &str = "chore/update-localization-";
pub const COMMIT_MESSAGE: &str = "chore: update localization";
pub const TITLE: &str = "chore: update localization";

const BODY_HEADER: &str = "Automated update of translation files from POEditor.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestPlan {
    pub branch: String,
    pub commit_message: String,
    pub title: String,
    pub body: String,
    pub changed_files: Vec<String>,
}

impl PullRequestPlan {
    pub fn new(date: NaiveDate, changes: &ChangeSet) -> Self {
        let changed_files: Vec<String> = changes
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        Self {
            branch: branch_name(date),
            commit_message: COMMIT_MESSAGE.to_string(),
            title: TITLE.to_string(),
            body: build_body(&changed_files),
            changed_files,
        }
    }

    /// A PR is only worth opening when some file actually changed.
    pub fn has_changes(&self) -> bool {
        !self.changed_files.is_empty()
    }

    /// Render as GitHub Actions step outputs.
    pub fn to_github_output(&self) -> String {
        let mut out = String::new();
        push_output(&mut out, "changed", if self.has_changes() { "true" } else { "false" });
        push_output(&mut out, "branch", &self.branch);
        push_output(&mut out, "commit-message", &self.commit_message);
        push_output(&mut out, "title", &self.title);
        push_output(&mut out, "body", &self.body);
        push_output(&mut out, "changed-files", &self.changed_files.join("\n"));
        out
    }

    /// Append the outputs to the file named by `GITHUB_OUTPUT`.
    pub fn append_to(&self, path: &Path) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.to_github_output().as_bytes())
    }
}

pub fn branch_name(date: NaiveDate) -> String {
    format!("{}{}", BRANCH_PREFIX, date.format("%Y-%m-%d"))
}

fn build_body(changed_files: &[String]) -> String {
    if changed_files.is_empty() {
        return format!("{}\n\nNo translation files changed.", BODY_HEADER);
    }

    let list = changed_files
        .iter()
        .map(|f| format!("- `{}`", f))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\nUpdated files:\n{}", BODY_HEADER, list)
}

/// Single-line values use `key=value`; anything with a newline uses the
/// heredoc form with a delimiter that does not occur in the value.
fn push_output(out: &mut String, key: &str, value: &str) {
    if !value.contains('\n') {
        out.push_str(&format!("{}={}\n", key, value));
        return;
    }

    let mut delimiter = "LOCALE_SYNC_EOF".to_string();
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    out.push_str(&format!("{}<<{}\n{}\n{}\n", key, delimiter, value, delimiter));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    fn changes(paths: &[&str]) -> ChangeSet {
        let mut set = ChangeSet::default();
        for p in paths {
            set.insert(PathBuf::from(p));
        }
        set
    }

    #[test]
    fn test_branch_name_uses_date() {
        assert_eq!(branch_name(date()), "chore/update-localization-2024-03-07");
    }

    #[test]
    fn test_plan_with_changes() {
        let plan = PullRequestPlan::new(date(), &changes(&["locale/fr.json", "locale/en.json"]));

        assert!(plan.has_changes());
        assert_eq!(plan.changed_files, vec!["locale/en.json", "locale/fr.json"]);
        assert_eq!(plan.commit_message, COMMIT_MESSAGE);
        assert_eq!(plan.title, TITLE);
        assert!(plan.body.contains("- `locale/en.json`"));
        assert!(plan.body.contains("- `locale/fr.json`"));
    }

    #[test]
    fn test_plan_without_changes() {
        let plan = PullRequestPlan::new(date(), &ChangeSet::default());

        assert!(!plan.has_changes());
        assert!(plan.to_github_output().starts_with("changed=false\n"));
    }

    #[test]
    fn test_github_output_format() {
        let plan = PullRequestPlan::new(date(), &changes(&["locale/en.json", "locale/fr.json"]));
        let output = plan.to_github_output();

        assert!(output.contains("changed=true\n"));
        assert!(output.contains("branch=chore/update-localization-2024-03-07\n"));
        assert!(output.contains("commit-message=chore: update localization\n"));
        assert!(output
            .contains("changed-files<<LOCALE_SYNC_EOF\nlocale/en.json\nlocale/fr.json\nLOCALE_SYNC_EOF\n"));
        assert!(output.contains("body<<LOCALE_SYNC_EOF\n"));
    }

    #[test]
    fn test_heredoc_delimiter_avoids_value() {
        let mut out = String::new();
        push_output(&mut out, "body", "line one\nLOCALE_SYNC_EOF\nline three");

        assert!(out.starts_with("body<<LOCALE_SYNC_EOF_\n"));
        assert!(out.ends_with("\nLOCALE_SYNC_EOF_\n"));
    }

    #[test]
    fn test_append_to_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let output_path = temp_dir.path().join("github_output");
        std::fs::write(&output_path, "previous=1\n").unwrap();

        let plan = PullRequestPlan::new(date(), &changes(&["locale/en.json"]));
        plan.append_to(&output_path).expect("should append");

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.starts_with("previous=1\n"));
        assert!(content.contains("changed=true\n"));
        assert!(content.contains("changed-files=locale/en.json\n"));
    }
}
