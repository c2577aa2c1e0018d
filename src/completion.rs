//! `lrec completions`: shell completion scripts for the recommender CLI.
//!
//! Scripts cover every subcommand and the `--format`/`--category` flags of
//! `lrec recommend`, so they only need regenerating when the CLI changes.

use anyhow::{Context, Result};
use clap::{Command, CommandFactory};
use clap_complete::{Shell as CompletionShell, generate, generate_to};
use std::{fs, io};

use crate::cli::{AppContext, Cli, CompletionsArgs, Shell};

const BIN_NAME: &str = "lrec";

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
            Shell::Elvish => CompletionShell::Elvish,
        }
    }
}

/// Render the completion script for `shell` into `out`.
pub fn write_script(shell: Shell, out: &mut dyn io::Write) {
    let mut cmd: Command = Cli::command();
    generate(CompletionShell::from(shell), &mut cmd, BIN_NAME, out);
}

/// Print the script, or write it under `--out-dir` and report the path unless quiet.
pub fn run(args: CompletionsArgs, ctx: &AppContext) -> Result<()> {
    if args.stdout {
        write_script(args.shell, &mut io::stdout());
        return Ok(());
    }

    let mut cmd: Command = Cli::command();
    let shell: CompletionShell = args.shell.into();

    let dir = args
        .out_dir
        .ok_or_else(|| anyhow::anyhow!("--out-dir is required unless --stdout is set"))?;

    fs::create_dir_all(&dir).context("create --out-dir")?;
    let path = generate_to(shell, &mut cmd, BIN_NAME, &dir).context("generate completion file")?;

    if !ctx.quiet {
        eprintln!("Wrote completion to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_knows_recommend_flags() {
        let mut buf = Vec::new();
        write_script(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).expect("utf8");

        assert!(script.contains("lrec"));
        assert!(script.contains("recommend"));
        assert!(script.contains("--min-ratings"));
    }
}
