use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use trimerge_merge::Favor;

use crate::document::DocumentFormat;

#[derive(Parser)]
#[command(
    name = "trimerge",
    about = "Three-way structural merge for JSON and TOML documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge head and update against their common ancestor
    Merge(MergeArgs),
    /// Print the effective merge configuration
    Config(ConfigArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FavorArg {
    Head,
    Update,
}

impl From<FavorArg> for Favor {
    fn from(arg: FavorArg) -> Self {
        match arg {
            FavorArg::Head => Favor::Head,
            FavorArg::Update => Favor::Update,
        }
    }
}

#[derive(Args)]
pub struct MergeArgs {
    /// Common ancestor document
    pub root: PathBuf,
    /// Incoming document
    pub update: PathBuf,
    /// Local document; omitted means the head branch has no document
    #[arg(long)]
    pub head: Option<PathBuf>,
    /// TOML merge configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Default tie-break for scalar conflicts
    #[arg(long)]
    pub favor: Option<FavorArg>,
    /// Default identity field for sequence items
    #[arg(long)]
    pub identity_field: Option<String>,
    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, default_value = "json")]
    pub format: DocumentFormat,
    /// Print automatically resolved conflicts to stderr
    #[arg(long)]
    pub report: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_merge_arguments() {
        let cli = Cli::try_parse_from([
            "trimerge", "merge", "root.json", "update.json", "--head", "head.json", "--favor",
            "head", "--format", "toml", "--report", "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Command::Merge(args) = cli.command else {
            panic!("expected merge command");
        };
        assert_eq!(args.root, PathBuf::from("root.json"));
        assert_eq!(args.head, Some(PathBuf::from("head.json")));
        assert_eq!(args.favor, Some(FavorArg::Head));
        assert_eq!(args.format, DocumentFormat::Toml);
        assert!(args.report);
    }

    #[test]
    fn favor_arg_maps_to_favor() {
        assert_eq!(Favor::from(FavorArg::Head), Favor::Head);
        assert_eq!(Favor::from(FavorArg::Update), Favor::Update);
    }
}
