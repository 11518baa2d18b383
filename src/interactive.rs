//! Interactive mode: a line-oriented shell over stdin.
//!
//! Each line is either a built-in command (`help`, `list`, `exit`) or a module
//! invocation such as `email --target alice@example.com -v`.

use crate::app::Session;
use crate::formatting::module_listing;
use crate::modules::{InvestigationModule, UnknownModule};
use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const PROMPT: &str = "footprint> ";

const HELP: &str = "\
Commands:
  help, h, ?                    Show this help
  list, ls                      List available modules
  exit, quit, q                 Leave interactive mode
  <module> --target <value>     Run a module against a target
      [-v|--verbose]            Show per-collector details
      [-o|--output FILE]        Also write the JSON report to FILE
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Help,
    List,
    Exit,
    Empty,
    Investigate {
        module: InvestigationModule,
        target: String,
        verbose: bool,
        output: Option<PathBuf>,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReplError {
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    UnknownModule(#[from] UnknownModule),
}

/// Arguments of a module invocation.
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_help_flag = true, disable_version_flag = true)]
struct InvestigateArgs {
    module: String,

    /// Everything up to the next flag is part of the target.
    #[arg(short, long, num_args = 1.., required = true)]
    target: Vec<String>,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub fn parse_command(line: &str) -> Result<ReplCommand, ReplError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return Ok(ReplCommand::Empty);
    };

    match first.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => return Ok(ReplCommand::Help),
        "list" | "ls" => return Ok(ReplCommand::List),
        "exit" | "quit" | "q" => return Ok(ReplCommand::Exit),
        _ => {}
    }

    let args = InvestigateArgs::try_parse_from(tokens.iter().copied())
        .map_err(|e| ReplError::Usage(e.render().to_string().trim_end().to_string()))?;
    Ok(ReplCommand::Investigate {
        module: args.module.parse()?,
        target: args.target.join(" "),
        verbose: args.verbose,
        output: args.output,
    })
}

/// What happened during an interactive session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplSummary {
    pub investigations: usize,
    pub errors: usize,
}

/// Reads commands from `input` until `exit` or end of input. Prompts, help
/// and error messages go to `out`; reports go to the session's outputs.
pub async fn run_with<R, W>(session: &Session, input: R, out: &mut W) -> Result<ReplSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut summary = ReplSummary::default();
    writeln!(out, "Interactive mode. Type 'help' for commands.")?;

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse_command(&line) {
            Ok(ReplCommand::Empty) => {}
            Ok(ReplCommand::Help) => write!(out, "{}", HELP)?,
            Ok(ReplCommand::List) => write!(out, "{}", module_listing())?,
            Ok(ReplCommand::Exit) => break,
            Ok(ReplCommand::Investigate {
                module,
                target,
                verbose,
                output,
            }) => {
                debug!(%module, target_id = %target, "Interactive investigation");
                match session.execute(module, &target, verbose, output).await {
                    Ok(_) => summary.investigations += 1,
                    Err(e) => {
                        summary.errors += 1;
                        writeln!(out, "Error: {}", e)?;
                    }
                }
            }
            Err(e) => {
                summary.errors += 1;
                writeln!(out, "Error: {}", e)?;
            }
        }
    }

    writeln!(out, "Goodbye.")?;
    Ok(summary)
}

/// Runs the interactive session on stdin/stdout.
pub async fn run(session: &Session) -> Result<ReplSummary> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    run_with(session, stdin, &mut stdout).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_commands() {
        assert_eq!(parse_command("  "), Ok(ReplCommand::Empty));
        assert_eq!(parse_command("?"), Ok(ReplCommand::Help));
        assert_eq!(parse_command("LS"), Ok(ReplCommand::List));
        assert_eq!(parse_command("quit"), Ok(ReplCommand::Exit));
    }

    #[test]
    fn test_investigate_command() {
        let cmd = parse_command("company --target Acme  Widgets Ltd -v -o out.json").unwrap();
        assert_eq!(
            cmd,
            ReplCommand::Investigate {
                module: InvestigationModule::Company,
                target: "Acme Widgets Ltd".to_string(),
                verbose: true,
                output: Some(PathBuf::from("out.json")),
            }
        );
    }

    #[test]
    fn test_bad_commands() {
        assert!(matches!(
            parse_command("email"),
            Err(ReplError::Usage(_))
        ));
        assert_eq!(
            parse_command("phone -t 555"),
            Err(ReplError::UnknownModule(UnknownModule("phone".to_string())))
        );
    }
}
