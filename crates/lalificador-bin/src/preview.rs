use anyhow::Result;
use inquire::Confirm;
use lalificador_core::{ApplyReport, RenameEntry, RenamePlan};
use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

pub const EXAMPLES: &str = "\
Accepted input shapes:

- 35. Agua (06 Bim 2024).pdf
- 35. Agua Pago (06 Bim 2024).pdf
- 35.Agua (06 Bim casa) Pago.pdf
- 35. Agua (06 Bim 2024) F.0354.PDF
- 01. Digital server (06 Bim 2024) F.114.PDF
- 2. Asociacion Hoteles y Moteles VM F.A450.xml

Expected parts:

- A number of 1 to 3 digits followed by a dot, e.g. 01.
- Free text, anywhere in the name.
- An optional comment in parentheses.
- An optional invoice code, always written F.XXXXX.

Every name is rewritten to this pattern:

- 2025-03 035. Agua (06 Bim 2024) F.00354 HBO.pdf
- 2025-03 002. Asociacion_Hoteles_Y_Moteles_VM F.0A450 HBO.xml

The period comes from a parent folder named YYYY.MM, or the current month.";

/// Renders `old` with removed characters in red and `new` with inserted ones in green.
pub fn highlight_rename(old: &str, new: &str) -> Result<(String, String)> {
    let diff = TextDiff::from_chars(old, new);
    let mut before = String::new();
    let mut after = String::new();

    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Delete => write!(before, "\x1b[31m{}\x1b[0m", change.value())?,
            ChangeTag::Insert => write!(after, "\x1b[32m{}\x1b[0m", change.value())?,
            ChangeTag::Equal => {
                before.push_str(change.value());
                after.push_str(change.value());
            }
        }
    }

    Ok((before, after))
}

pub fn render_entry(entry: &RenameEntry) -> Result<String> {
    let (before, after) = highlight_rename(&entry.original_name(), &entry.proposed)?;
    Ok(format!("❌ {} -> ✅ {}", before, after))
}

pub fn show_plan(plan: &RenamePlan) -> Result<()> {
    for warning in plan.warnings() {
        println!("⚠️  {}: {}", warning.path.display(), warning.message);
    }

    if plan.is_empty() {
        println!("✅ No files to rename.");
        return Ok(());
    }

    for entry in plan.sorted_by_name() {
        println!("{}", render_entry(entry)?);
    }
    println!("\n{} of {} files need renaming.", plan.len(), plan.files_scanned());

    Ok(())
}

pub fn confirm_batch(count: usize) -> Result<bool> {
    let apply_changes = Confirm::new(&format!("{} changes will be applied. Continue?", count))
        .with_default(false)
        .prompt()?;

    Ok(apply_changes)
}

pub fn confirm_rename(entry: &RenameEntry) -> Result<bool> {
    println!("\n📁 {}", entry.original.parent().map_or_else(String::new, |p| p.display().to_string()));
    println!("  {}", render_entry(entry)?);

    let apply_change = Confirm::new("Apply this rename?")
        .with_default(true)
        .prompt()?;

    Ok(apply_change)
}

pub fn show_report(report: &ApplyReport) {
    for failure in &report.failures {
        println!("❌ {}: {}", failure.entry.original.display(), failure.error);
    }

    println!("Renaming complete!");
    println!("  Renamed: {}", report.succeeded);
    println!("  Failed: {}", report.failed());
    if report.skipped > 0 {
        println!("  Skipped: {}", report.skipped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn strip_colors(text: &str) -> String {
        text.replace("\x1b[31m", "").replace("\x1b[32m", "").replace("\x1b[0m", "")
    }

    #[test]
    fn test_highlight_keeps_both_names() {
        let (before, after) = highlight_rename("35. Agua.pdf", "2025-03 035. Agua HBO.pdf").unwrap();

        assert_eq!(strip_colors(&before), "35. Agua.pdf");
        assert_eq!(strip_colors(&after), "2025-03 035. Agua HBO.pdf");
        assert!(after.contains("\x1b[32m"));
    }

    #[test]
    fn test_highlight_marks_removed_characters() {
        let (before, _) = highlight_rename("Luz.PDF", "Luz.pdf").unwrap();
        assert!(before.contains("\x1b[31m"));
        assert!(before.starts_with("Luz."));
    }

    #[test]
    fn test_identical_names_have_no_highlight() {
        let (before, after) = highlight_rename("same.pdf", "same.pdf").unwrap();
        assert_eq!(before, "same.pdf");
        assert_eq!(after, "same.pdf");
    }

    #[test]
    fn test_render_entry() {
        let entry = RenameEntry {
            original: PathBuf::from("/docs/2024.06/5. Gas.pdf"),
            proposed: "2024-06 005. Gas XXX.pdf".to_string(),
        };
        let rendered = strip_colors(&render_entry(&entry).unwrap());
        assert_eq!(rendered, "❌ 5. Gas.pdf -> ✅ 2024-06 005. Gas XXX.pdf");
    }
}
