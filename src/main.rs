use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use perf_audit::cmd::{self, AuditArgs};
use std::path::PathBuf;
use std::process;

/// Static performance audit for web projects
///
/// perf-audit inspects package.json, source files and build output without
/// running the project, and prints prioritized recommendations with a score.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(flatten)]
    audit: AuditFlags,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct AuditFlags {
    /// Print the JSON report to stdout instead of console text
    #[arg(long)]
    json: bool,

    /// Also write performance-report.html
    #[arg(long)]
    html: bool,

    /// Skip build output, chunking and compression analysis
    #[arg(long, conflicts_with = "bundle_only")]
    performance_only: bool,

    /// Skip package.json and source pattern analysis
    #[arg(long)]
    bundle_only: bool,

    /// Write no report files
    #[arg(long)]
    no_report: bool,

    /// Project root to audit
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,

    /// Directory for report files (default: project root)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Number of recommendations to show
    #[arg(long, value_name = "N")]
    top: Option<usize>,

    /// Disable emoji output (useful for CI/CD or accessibility)
    #[arg(long)]
    no_emoji: bool,
}

impl From<AuditFlags> for AuditArgs {
    fn from(flags: AuditFlags) -> Self {
        Self {
            root: flags.root,
            output_dir: flags.output_dir,
            json: flags.json,
            html: flags.html,
            performance_only: flags.performance_only,
            bundle_only: flags.bundle_only,
            no_report: flags.no_report,
            top: flags.top,
            no_emoji: flags.no_emoji,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(shell, &mut Cli::command());
            Ok(())
        }
        None => cmd::cmd_audit(&AuditArgs::from(cli.audit)),
    };

    if let Err(e) = result {
        use perf_audit::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert()
    }

    #[test]
    fn test_mode_flags_conflict() {
        let result = Cli::try_parse_from(["perf-audit", "--bundle-only", "--performance-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_map_to_audit_args() {
        let cli = Cli::try_parse_from([
            "perf-audit",
            "--json",
            "--root",
            "web",
            "--top",
            "3",
            "--no-emoji",
        ])
        .unwrap();

        let args = AuditArgs::from(cli.audit);
        assert!(args.json);
        assert_eq!(args.root, PathBuf::from("web"));
        assert_eq!(args.top, Some(3));
        assert!(args.no_emoji);
        assert!(!args.html);
    }
}
