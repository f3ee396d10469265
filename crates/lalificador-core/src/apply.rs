use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::plan::{RenameEntry, RenamePlan};
use crate::LalificadorError;

#[derive(Debug)]
pub struct RenameFailure {
    pub entry: RenameEntry,
    pub error: LalificadorError,
}

/// Outcome of applying a plan. Renames are independent; one failure does not
/// stop the rest.
#[derive(Debug, Default)]
pub struct ApplyReport {
    pub succeeded: usize,
    pub skipped: usize,
    pub failures: Vec<RenameFailure>,
}

impl ApplyReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Renames attempted, skipped entries not included.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn apply_plan(plan: RenamePlan) -> ApplyReport {
    let mut report = ApplyReport::default();
    for entry in plan.into_entries() {
        apply_entry(entry, &mut report);
    }
    log_report(&report);
    report
}

/// Like [`apply_plan`], asking `confirm` before each rename. An error from the
/// callback stops the batch; renames already done stay done.
pub fn apply_plan_interactive<F>(plan: RenamePlan, mut confirm: F) -> Result<ApplyReport>
where
    F: FnMut(&RenameEntry) -> Result<bool>,
{
    let mut report = ApplyReport::default();
    for entry in plan.into_entries() {
        if confirm(&entry)? {
            apply_entry(entry, &mut report);
        } else {
            debug!("Skipped by user: {:?}", entry.original);
            report.skipped += 1;
        }
    }
    log_report(&report);
    Ok(report)
}

fn apply_entry(entry: RenameEntry, report: &mut ApplyReport) {
    match rename_entry(&entry) {
        Ok(()) => report.succeeded += 1,
        Err(error) => {
            warn!("Rename failed for {:?}: {}", entry.original, error);
            report.failures.push(RenameFailure { entry, error });
        }
    }
}

/// Moves one file to its proposed name in the same directory. Never overwrites.
pub fn rename_entry(entry: &RenameEntry) -> Result<(), LalificadorError> {
    let target = entry.target();

    if target.symlink_metadata().is_ok() && !is_same_file(&entry.original, &target) {
        return Err(LalificadorError::Collision { path: target });
    }

    info!("Renaming file: {:?} -> {:?}", entry.original, target);
    fs::rename(&entry.original, &target).map_err(|source| LalificadorError::Rename {
        from: entry.original.clone(),
        to: target.clone(),
        source,
    })
}

// Case-only renames on case-insensitive filesystems resolve to the same file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn log_report(report: &ApplyReport) {
    info!(
        "Apply complete: {} renamed, {} failed, {} skipped",
        report.succeeded,
        report.failed(),
        report.skipped
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::OrgCode;
    use crate::plan::Scanner;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn scan(root: &Path) -> RenamePlan {
        Scanner::new(OrgCode::new("HBO").unwrap())
            .unwrap()
            .with_today(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap())
            .scan(root)
            .unwrap()
    }

    #[test]
    fn test_apply_renames_every_entry() {
        let temp_dir = TempDir::new().unwrap();
        let june = temp_dir.path().join("2024.06");
        fs::create_dir(&june).unwrap();
        fs::write(june.join("35. Agua (06 Bim 2024).pdf"), "agua").unwrap();
        fs::write(june.join("01. Digital server F.114.PDF"), "server").unwrap();

        let plan = scan(temp_dir.path());
        let originals: Vec<_> = plan.entries().iter().map(|e| e.original.clone()).collect();
        let targets: Vec<_> = plan.entries().iter().map(|e| e.target()).collect();
        assert_eq!(plan.len(), 2);

        let report = apply_plan(plan);
        assert_eq!(report.succeeded, 2);
        assert!(report.is_success());

        for original in &originals {
            assert!(!original.exists());
        }
        for target in &targets {
            assert!(target.exists());
        }
        assert_eq!(
            fs::read_to_string(june.join("2024-06 035. Agua (06 Bim 2024) HBO.pdf")).unwrap(),
            "agua"
        );
        assert!(june.join("2024-06 001. Digital_Server F.00114 HBO.pdf").exists());

        assert!(scan(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_collision_fails_only_that_entry() {
        let temp_dir = TempDir::new().unwrap();
        let june = temp_dir.path().join("2024.06");
        fs::create_dir(&june).unwrap();
        fs::write(june.join("5. Luz.pdf"), "first").unwrap();
        fs::write(june.join("05. Luz.PDF"), "second").unwrap();
        fs::write(june.join("7. Gas.pdf"), "gas").unwrap();

        let report = apply_plan(scan(temp_dir.path()));

        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.total(), 3);
        assert!(matches!(
            report.failures[0].error,
            LalificadorError::Collision { .. }
        ));
        assert!(june.join("2024-06 007. Gas HBO.pdf").exists());
        assert!(june.join("2024-06 005. Luz HBO.pdf").exists());
        assert!(report.failures[0].entry.original.exists());
    }

    #[test]
    fn test_missing_source_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let entry = RenameEntry {
            original: temp_dir.path().join("gone.pdf"),
            proposed: "2025-03 gone HBO.pdf".to_string(),
        };

        let result = rename_entry(&entry);
        assert!(matches!(result, Err(LalificadorError::Rename { .. })));
    }

    #[test]
    fn test_interactive_skips_declined_entries() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("1. Agua.pdf"), "").unwrap();
        fs::write(temp_dir.path().join("2. Luz.pdf"), "").unwrap();

        let plan = scan(temp_dir.path());
        let report = apply_plan_interactive(plan, |entry| {
            Ok(entry.original_name() == "1. Agua.pdf")
        })
        .unwrap();

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.total(), 1);
        assert!(temp_dir.path().join("2. Luz.pdf").exists());
        assert!(!temp_dir.path().join("1. Agua.pdf").exists());
    }

    #[test]
    fn test_interactive_callback_error_stops_batch() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("1. Agua.pdf"), "").unwrap();

        let plan = scan(temp_dir.path());
        let result = apply_plan_interactive(plan, |_| Err(anyhow::anyhow!("prompt cancelled")));
        assert!(result.is_err());
        assert!(temp_dir.path().join("1. Agua.pdf").exists());
    }
}
