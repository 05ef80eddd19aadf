//! Completions command implementation
//!
//! Handles the `perf-audit completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io::Write;

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// perf-audit completions bash > /etc/bash_completion.d/perf-audit
///
/// # Zsh
/// perf-audit completions zsh > ~/.zfunc/_perf-audit
///
/// # Fish
/// perf-audit completions fish > ~/.config/fish/completions/perf-audit.fish
/// ```
pub fn cmd_completions(shell: Shell, cmd: &mut Command) {
    write_completions(shell, cmd, &mut std::io::stdout());
}

/// Write the completion script for `shell` into `out`
pub fn write_completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Arg;

    fn sample_command() -> Command {
        Command::new("perf-audit")
            .arg(Arg::new("json").long("json").action(clap::ArgAction::SetTrue))
            .subcommand(Command::new("completions"))
    }

    #[test]
    fn test_bash_completions_mention_flags() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut sample_command(), &mut out);

        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("perf-audit"));
        assert!(script.contains("--json"));
    }

    #[test]
    fn test_all_shells_generate_output() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut out = Vec::new();
            write_completions(shell, &mut sample_command(), &mut out);
            assert!(!out.is_empty(), "{shell:?} produced no output");
        }
    }
}
