use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::formatter::{FilenameFormatter, OrgCode};
use crate::period::resolve_period;
use crate::LalificadorError;

/// A file whose name does not follow the convention, and the name it should get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub original: PathBuf,
    pub proposed: String,
}

impl RenameEntry {
    pub fn original_name(&self) -> Cow<'_, str> {
        self.original
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default()
    }

    /// Same directory as the original, proposed name.
    pub fn target(&self) -> PathBuf {
        match self.original.parent() {
            Some(parent) => parent.join(&self.proposed),
            None => PathBuf::from(&self.proposed),
        }
    }
}

/// A file or directory the scan could not look at. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct RenamePlan {
    entries: Vec<RenameEntry>,
    warnings: Vec<ScanWarning>,
    files_scanned: usize,
}

impl RenamePlan {
    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn warnings(&self) -> &[ScanWarning] {
        &self.warnings
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by their current file name, for display.
    pub fn sorted_by_name(&self) -> Vec<&RenameEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.original_name().cmp(&b.original_name()));
        sorted
    }

    pub fn into_entries(self) -> Vec<RenameEntry> {
        self.entries
    }

    fn warn(&mut self, path: &Path, message: impl Into<String>) {
        let message = message.into();
        warn!("Skipping {:?}: {}", path, message);
        self.warnings.push(ScanWarning {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// Walks a directory tree and collects the renames needed to make every file
/// follow the naming convention.
pub struct Scanner {
    formatter: FilenameFormatter,
    today: NaiveDate,
    exclude: Option<PathBuf>,
}

impl Scanner {
    pub fn new(org: OrgCode) -> Result<Self, LalificadorError> {
        Ok(Self {
            formatter: FilenameFormatter::new(org)?,
            today: Local::now().date_naive(),
            exclude: None,
        })
    }

    /// Date used for files whose folder carries no period.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn excluding(mut self, path: &Path) -> Self {
        self.exclude = Some(fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()));
        self
    }

    /// Leaves the running executable alone when it lives inside the scanned tree.
    pub fn excluding_current_exe(self) -> Self {
        match std::env::current_exe() {
            Ok(exe) => self.excluding(&exe),
            Err(e) => {
                debug!("Could not locate current executable: {}", e);
                self
            }
        }
    }

    pub fn scan(&self, root: &Path) -> Result<RenamePlan> {
        if !root.is_dir() {
            return Err(LalificadorError::Path {
                message: format!("not a directory: {}", root.display()),
            }
            .into());
        }

        // `.` and `..` have no folder name to read a period from
        let root = fs::canonicalize(root).map_err(LalificadorError::from)?;

        info!("Scanning directory: {:?}", root);
        let mut plan = RenamePlan::default();
        let entries = fs::read_dir(&root).map_err(LalificadorError::from)?;
        self.scan_entries(&root, entries, &mut plan);

        info!(
            "Scan complete: {} files checked, {} renames proposed, {} warnings",
            plan.files_scanned,
            plan.entries.len(),
            plan.warnings.len()
        );
        Ok(plan)
    }

    fn scan_entries(&self, dir: &Path, entries: fs::ReadDir, plan: &mut RenamePlan) {
        let mut directories = Vec::new();

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    plan.warn(dir, format!("unreadable entry: {}", e));
                    continue;
                }
            };
            let path = entry.path();
            match entry.file_type() {
                Ok(file_type) if file_type.is_file() => self.check_file(&path, plan),
                Ok(file_type) if file_type.is_dir() => directories.push(path),
                Ok(_) => debug!("Skipping non-regular entry: {:?}", path),
                Err(e) => plan.warn(&path, e.to_string()),
            }
        }

        for directory in directories {
            debug!("Scanning directory: {:?}", directory);
            match fs::read_dir(&directory) {
                Ok(entries) => self.scan_entries(&directory, entries, plan),
                Err(e) => plan.warn(&directory, e.to_string()),
            }
        }
    }

    fn check_file(&self, path: &Path, plan: &mut RenamePlan) {
        if self.is_excluded(path) {
            debug!("Skipping own executable: {:?}", path);
            return;
        }

        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            plan.warn(path, "file name is not valid UTF-8");
            return;
        };
        plan.files_scanned += 1;

        let parent_name = path
            .parent()
            .and_then(|parent| parent.file_name())
            .and_then(|name| name.to_str());
        let period = resolve_period(parent_name, self.today);
        let proposed = self.formatter.format(file_name, &period);

        if proposed != file_name {
            debug!("Proposed rename: '{}' -> '{}'", file_name, proposed);
            plan.entries.push(RenameEntry {
                original: path.to_path_buf(),
                proposed,
            });
        }
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        if path.file_name() != exclude.file_name() {
            return false;
        }
        fs::canonicalize(path).map_or(false, |canonical| &canonical == exclude)
    }
}
