use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "lalificador";

const SAMPLE_FILES: &[(&str, &str)] = &[
    ("2025.03 Marzo", "35. Agua (06 Bim 2024).pdf"),
    ("2025.03 Marzo", "35.Agua (06 Bim casa) Pago.pdf"),
    ("2025.03 Marzo", "01. Digital server (06 Bim 2024) F.114.PDF"),
    ("2025.03 Marzo", "2. Asociacion Hoteles y Moteles VM F.A450.xml"),
    ("2025.03 Marzo", "2025-03 010. Renta HBO.pdf"),
    ("sin fecha", "Recibo luz 2024-05.pdf"),
];

fn main() -> Result<()> {
    let args = clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about("Install lalificador binary locally"))
        .subcommand(
            Command::new("run")
                .about("Build and run lalificador with arguments")
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(clap::Arg::new("args")
                    .help("Arguments to pass to lalificador")
                    .action(clap::ArgAction::Append)
                    .num_args(0..))
        )
        .subcommand(
            Command::new("demo")
                .about("Create a sample directory tree of badly named files")
                .arg(clap::Arg::new("dir")
                    .help("Directory to create (defaults to target/demo)")
                    .value_parser(clap::value_parser!(PathBuf)))
        )
        .subcommand(
            Command::new("test")
                .about("Test Operations")
                .subcommand(Command::new("all").about("Run all tests for the entire project"))
                .subcommand(Command::new("core").about("Run tests for lalificador-core"))
                .subcommand(Command::new("bin").about("Run tests for lalificador-bin"))
                .subcommand(Command::new("integration").about("Run integration tests"))
        )
        .get_matches();

    match args.subcommand() {
        Some(("install", args)) => handle_install_command(args),
        Some(("run", args)) => handle_run_command(args),
        Some(("demo", args)) => handle_demo_command(args),
        Some(("test", args)) => handle_test_commands(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn handle_install_command(_args: &ArgMatches) -> Result<()> {
    println!("Installing lalificador...");
    let status = process::Command::new("cargo")
        .args(["install", "--path", "crates/lalificador-bin"])
        .status()?;

    if status.success() {
        println!("✓ lalificador installed successfully");
    } else {
        anyhow::bail!("Failed to install lalificador");
    }

    Ok(())
}

fn handle_run_command(args: &ArgMatches) -> Result<()> {
    println!("Building and running lalificador...");

    let run_args: Vec<String> = args.get_many::<String>("args")
        .map_or(Vec::new(), |vals| vals.cloned().collect());

    let mut command = process::Command::new("cargo");
    command.args(["run", "--bin", BIN_NAME, "--"]);

    if !run_args.is_empty() {
        command.args(&run_args);
    }

    let status = command.status()?;

    if !status.success() {
        anyhow::bail!("Failed to run lalificador");
    }

    Ok(())
}

fn handle_demo_command(args: &ArgMatches) -> Result<()> {
    let root = args.get_one::<PathBuf>("dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("target/demo"));

    for (folder, name) in SAMPLE_FILES {
        let dir = root.join(folder);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(name), "")?;
    }

    println!("✓ Sample files written to {}", root.display());
    println!("  Try: cargo xtask run scan {} --org HBO", root.display());

    Ok(())
}

fn handle_test_commands(args: &ArgMatches) -> Result<()> {
    match args.subcommand() {
        Some(("all", _args)) => test_all(),
        Some(("core", _args)) => test_core(),
        Some(("bin", _args)) => test_bin(),
        Some(("integration", _args)) => test_integration(),
        _ => {
            println!("Available test commands:");
            println!("  all          - Run all tests for the entire project");
            println!("  core         - Run tests for lalificador-core");
            println!("  bin          - Run tests for lalificador-bin");
            println!("  integration  - Run integration tests");
            Ok(())
        }
    }
}

fn test_all() -> Result<()> {
    println!("🧪 Running all tests for the lalificador project...\n");

    let suites: [(&str, fn() -> Result<()>); 6] = [
        ("lalificador-core", test_core_internal),
        ("lalificador-bin", test_bin_internal),
        ("workspace", test_workspace_internal),
        ("documentation", test_docs_internal),
        ("integration", test_integration_internal),
        ("CLI validation", test_cli_internal),
    ];

    let mut all_passed = true;
    for (name, suite) in suites {
        println!("▶ Running {} tests...", name);
        match suite() {
            Ok(()) => println!("✅ {} tests passed", name),
            Err(e) => {
                all_passed = false;
                println!("❌ {} tests failed: {:?}", name, e);
            }
        }
        println!();
    }

    if all_passed {
        println!("🎉 All tests passed successfully!");
    } else {
        println!("💥 Some tests failed. Please check the output above.");
        anyhow::bail!("Test suite failed");
    }

    Ok(())
}

fn test_core() -> Result<()> {
    println!("🧪 Running lalificador-core tests...");
    test_core_internal()
}

fn test_bin() -> Result<()> {
    println!("🧪 Running lalificador-bin tests...");
    test_bin_internal()
}

fn test_integration() -> Result<()> {
    println!("🧪 Running integration tests...");
    test_integration_internal()
}

fn cargo(args: &[&str], failure: &str) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;

    if !status.success() {
        anyhow::bail!("{}", failure);
    }
    Ok(())
}

fn test_core_internal() -> Result<()> {
    cargo(&["test", "--package", "lalificador-core"], "Core tests failed")
}

fn test_bin_internal() -> Result<()> {
    cargo(&["test", "--package", "lalificador-bin"], "Binary tests failed")
}

fn test_workspace_internal() -> Result<()> {
    cargo(&["test", "--workspace"], "Workspace tests failed")
}

fn test_docs_internal() -> Result<()> {
    cargo(&["test", "--doc", "--package", "lalificador-core"], "Documentation tests failed")
}

fn test_integration_internal() -> Result<()> {
    cargo(&["build", "--bin", BIN_NAME], "Failed to build lalificador binary")?;
    cargo(&["run", "--bin", BIN_NAME, "--", "--help"], "CLI help command failed")?;
    cargo(
        &["run", "--bin", BIN_NAME, "--", "format", "35. Agua (06 Bim 2024).pdf", "--period", "2025-03", "--org", "HBO"],
        "CLI format command failed",
    )?;
    cargo(&["run", "--bin", BIN_NAME, "--", "examples"], "CLI examples command failed")
}

fn test_cli_internal() -> Result<()> {
    cargo(&["run", "--bin", BIN_NAME, "--", "--version"], "CLI version command failed")
}
