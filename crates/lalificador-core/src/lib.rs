use anyhow::Result;
use std::path::{Path, PathBuf};

pub mod apply;
pub mod formatter;
pub mod period;
pub mod plan;

pub use apply::{apply_plan, apply_plan_interactive, rename_entry, ApplyReport, RenameFailure};
pub use formatter::{FilenameFormatter, OrgCode, DEFAULT_ORG_CODE};
pub use period::{resolve_period, Period};
pub use plan::{RenameEntry, RenamePlan, ScanWarning, Scanner};

#[derive(thiserror::Error, Debug)]
pub enum LalificadorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Path error: {message}")]
    Path { message: String },
    #[error("Invalid organization code: {value:?}")]
    InvalidOrgCode { value: String },
    #[error("Invalid period {value:?}, expected YYYY-MM")]
    InvalidPeriod { value: String },
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Target already exists: {}", path.display())]
    Collision { path: PathBuf },
    #[error("Could not rename {} -> {}: {source}", from.display(), to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Scans `root` and returns the renames that would bring every file in line
/// with the naming convention. The running executable is never included.
pub fn scan(root: &Path, org: &OrgCode) -> Result<RenamePlan> {
    Scanner::new(org.clone())?.excluding_current_exe().scan(root)
}

/// Applies every rename in `plan`, reporting failures per file.
pub fn apply(plan: RenamePlan) -> ApplyReport {
    apply_plan(plan)
}
