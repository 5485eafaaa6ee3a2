use std::process;

use anyhow::Result;
use clap::{ArgMatches, Command};

const BIN_NAME: &str = "rename-project";

/// A named `cargo test` invocation, exposed as `xtask test <name>`.
struct Suite {
    name: &'static str,
    label: &'static str,
    args: &'static [&'static str],
}

const SUITES: &[Suite] = &[
    Suite {
        name: "core",
        label: "rename-core unit tests",
        args: &["--package", "rename-core", "--lib"],
    },
    Suite {
        name: "bin",
        label: "rename-bin unit tests",
        args: &["--package", "rename-bin", "--bins"],
    },
    Suite {
        name: "integration",
        label: "CLI integration tests",
        args: &["--package", "rename-bin", "--test", "cli_tests"],
    },
    Suite {
        name: "doc",
        label: "documentation tests",
        args: &["--doc", "--package", "rename-core"],
    },
];

fn cli() -> Command {
    let test = SUITES.iter().fold(
        Command::new("test")
            .about("Run test suites")
            .subcommand(Command::new("all").about("Run every suite and report each result")),
        |test, suite| test.subcommand(Command::new(suite.name).about(format!("Run {}", suite.label))),
    );

    clap::command!()
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("install").about(format!("Install {BIN_NAME} with cargo install")))
        .subcommand(
            Command::new("run")
                .about(format!("Build and run {BIN_NAME}, forwarding any arguments"))
                .trailing_var_arg(true)
                .allow_hyphen_values(true)
                .arg(
                    clap::Arg::new("args")
                        .action(clap::ArgAction::Append)
                        .num_args(0..),
                ),
        )
        .subcommand(test)
}

fn main() -> Result<()> {
    match cli().get_matches().subcommand() {
        Some(("install", _)) => cargo(&["install", "--path", "crates/rename-bin"]),
        Some(("run", args)) => run(args),
        Some(("test", args)) => test(args),
        Some((command, _)) => anyhow::bail!("Unexpected command: {command}"),
        None => anyhow::bail!("Expected subcommand"),
    }
}

fn run(args: &ArgMatches) -> Result<()> {
    let mut cargo_args = vec!["run", "--bin", BIN_NAME, "--"];
    if let Some(extra) = args.get_many::<String>("args") {
        cargo_args.extend(extra.map(String::as_str));
    }
    cargo(&cargo_args)
}

fn test(args: &ArgMatches) -> Result<()> {
    match args.subcommand_name() {
        Some("all") | None => test_all(),
        Some(name) => match SUITES.iter().find(|suite| suite.name == name) {
            Some(suite) => run_suite(suite),
            None => anyhow::bail!("Unknown test suite: {name}"),
        },
    }
}

fn test_all() -> Result<()> {
    let failed: Vec<&str> = SUITES
        .iter()
        .filter_map(|suite| match run_suite(suite) {
            Ok(()) => {
                println!("✅ {}", suite.label);
                None
            }
            Err(e) => {
                println!("❌ {}: {e}", suite.label);
                Some(suite.name)
            }
        })
        .collect();

    if !failed.is_empty() {
        anyhow::bail!("Failed suites: {}", failed.join(", "));
    }
    println!("🎉 All suites passed");
    Ok(())
}

fn run_suite(suite: &Suite) -> Result<()> {
    println!("🧪 Running {}...", suite.label);
    let mut args = vec!["test"];
    args.extend_from_slice(suite.args);
    cargo(&args)
}

fn cargo(args: &[&str]) -> Result<()> {
    let status = process::Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("`cargo {}` exited with {status}", args.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        cli().debug_assert();
    }

    #[test]
    fn test_every_suite_is_a_subcommand() {
        for suite in SUITES {
            let matches = cli()
                .try_get_matches_from(["xtask", "test", suite.name])
                .unwrap();
            let (_, test) = matches.subcommand().unwrap();
            assert_eq!(test.subcommand_name(), Some(suite.name));
        }
    }

    #[test]
    fn test_run_forwards_hyphenated_arguments() {
        let matches = cli()
            .try_get_matches_from(["xtask", "run", "--contents", "all", "-v"])
            .unwrap();
        let (_, run) = matches.subcommand().unwrap();
        let args: Vec<&String> = run.get_many::<String>("args").unwrap().collect();

        assert_eq!(args, ["--contents", "all", "-v"]);
    }
}
