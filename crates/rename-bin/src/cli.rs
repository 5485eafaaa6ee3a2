use clap::{Parser, ValueEnum};
use rename_core::Decision;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rename-project")]
#[command(version)]
#[command(about = "Rename a project's package name across its files")]
#[command(long_about = "Replaces the package name recorded in package.json with a new name, \
both inside file contents and in file names, asking before each change unless told to \
apply or skip all of them.")]
pub struct Cli {
    #[arg(long, help = "Project root containing package.json (defaults to current directory)")]
    pub project_dir: Option<PathBuf>,

    #[arg(short, long, help = "New package name (prompted for when omitted)")]
    pub name: Option<String>,

    #[arg(short, long, help = "New project description (prompted for when omitted)")]
    pub description: Option<String>,

    #[arg(long, value_enum, default_value_t = DecisionArg::Ask, help = "How to handle file content rewrites")]
    pub contents: DecisionArg,

    #[arg(long, value_enum, default_value_t = DecisionArg::Ask, help = "How to handle file renames")]
    pub rename: DecisionArg,

    #[arg(long, help = "Show a diff of each content change before asking")]
    pub diff: bool,

    #[arg(short, long)]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DecisionArg {
    /// Ask for every change
    Ask,
    /// Apply every change without asking
    All,
    /// Skip every change without asking
    #[value(name = "none")]
    Skip,
}

impl From<DecisionArg> for Decision {
    fn from(arg: DecisionArg) -> Self {
        match arg {
            DecisionArg::Ask => Decision::Ask,
            DecisionArg::All => Decision::ApplyAll,
            DecisionArg::Skip => Decision::SkipAll,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
