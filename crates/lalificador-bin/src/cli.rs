use clap::{Parser, Subcommand};
use lalificador_core::{OrgCode, Period, DEFAULT_ORG_CODE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lalificador")]
#[command(version)]
#[command(about = "Rename files to the dated, numbered, org-tagged naming convention")]
#[command(long_about = "Walks a directory tree and renames every file to the pattern \
'YYYY-MM NNN. Free_Text (comment) F.XXXXX ORG.ext', taking the period from \
'YYYY.MM' folder names or the current month.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show the renames needed without changing anything")]
    Scan {
        #[arg(help = "Target directory (defaults to current directory)")]
        target: Option<PathBuf>,

        #[arg(short, long, env = "LALIFICADOR_ORG", default_value = DEFAULT_ORG_CODE, help = "Organization code appended to every name")]
        org: OrgCode,
    },

    #[command(about = "Rename non-conformant files")]
    Apply {
        #[arg(help = "Target directory (defaults to current directory)")]
        target: Option<PathBuf>,

        #[arg(short, long, env = "LALIFICADOR_ORG", default_value = DEFAULT_ORG_CODE, help = "Organization code appended to every name")]
        org: OrgCode,

        #[arg(short, long, help = "Apply without asking for confirmation")]
        yes: bool,

        #[arg(short, long, help = "Interactive mode - prompt for each rename")]
        interactive: bool,
    },

    #[command(about = "Format a single file name")]
    Format {
        #[arg(help = "File name to format (e.g., '35. Agua (06 Bim 2024).pdf')")]
        name: String,

        #[arg(short, long, help = "Period as YYYY-MM (defaults to the current month)")]
        period: Option<Period>,

        #[arg(short, long, env = "LALIFICADOR_ORG", default_value = DEFAULT_ORG_CODE, help = "Organization code appended to every name")]
        org: OrgCode,
    },

    #[command(about = "Show accepted input shapes and the target pattern")]
    Examples,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_command() {
        let args = vec!["lalificador", "scan", "/docs/2025", "--org", "hbo"];

        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Scan { target, org } => {
                assert_eq!(target, Some(PathBuf::from("/docs/2025")));
                assert_eq!(org.to_upper(), "HBO");
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_apply_command() {
        let args = vec!["lalificador", "apply", "--yes", "-o", "HBO"];

        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Apply { target, org, yes, interactive } => {
                assert_eq!(target, None);
                assert_eq!(org.as_str(), "HBO");
                assert!(yes);
                assert!(!interactive);
            }
            _ => panic!("Expected Apply command"),
        }
    }

    #[test]
    fn test_format_command() {
        let args = vec![
            "lalificador",
            "format",
            "35. Agua (06 Bim 2024).pdf",
            "--period",
            "2025-03",
        ];

        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Format { name, period, .. } => {
                assert_eq!(name, "35. Agua (06 Bim 2024).pdf");
                assert_eq!(period.unwrap().as_str(), "2025-03");
            }
            _ => panic!("Expected Format command"),
        }
    }

    #[test]
    fn test_invalid_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["lalificador", "format", "a.pdf", "--period", "2025.03"]).is_err());
        assert!(Cli::try_parse_from(["lalificador", "scan", "--org", "a/b"]).is_err());
    }
}
