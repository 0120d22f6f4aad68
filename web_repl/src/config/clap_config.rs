// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{DEFAULT_INTERPRETER, DEFAULT_INTERPRETER_ARG, DEFAULT_LOG_FILE_NAME};
use clap::{Args, Parser};

/// More info: <https://docs.rs/clap/latest/clap/_derive/_tutorial/chapter_2/index.html>
#[derive(Debug, Parser)]
#[command(bin_name = "wrepl")]
#[command(about = "🐍 A web terminal style REPL, right in your terminal ⚙️")]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(false))]
/// More info: <https://docs.rs/clap/latest/clap/struct.Command.html#method.help_template>
#[command(
    help_template = "{about}\nVersion: {bin} {version} 💻\n\nUSAGE 📓:\n  wrepl [\x1b[34moptions\x1b[0m]\n\n[options]\n{options}"
)]
pub struct CLIArg {
    #[command(flatten)]
    pub global_options: GlobalOption,
}

#[derive(Debug, Args)]
pub struct GlobalOption {
    #[arg(
        global = true,
        long,
        short = 'l',
        help = "Log app output to a file for debugging"
    )]
    pub enable_logging: bool,

    #[arg(
        long,
        value_name = "PATH",
        default_value = DEFAULT_LOG_FILE_NAME,
        help = "File that log output goes to, when logging is enabled"
    )]
    pub log_file: String,

    #[arg(
        long,
        value_name = "DIR",
        help = "Folder for the persisted command history [default: <config dir>/r3bl-web-repl/history]"
    )]
    pub history_dir: Option<String>,

    #[arg(
        long,
        conflicts_with = "history_dir",
        help = "Keep the command history in memory only, it is lost on exit"
    )]
    pub in_memory_history: bool,

    #[arg(
        long,
        value_name = "PROGRAM",
        default_value = DEFAULT_INTERPRETER,
        help = "Program that evaluates lines which aren't built-in commands"
    )]
    pub interpreter: String,

    #[arg(
        long = "interpreter-arg",
        allow_hyphen_values = true,
        value_name = "ARG",
        default_values_t = [DEFAULT_INTERPRETER_ARG.to_string()],
        help = "Argument passed to the interpreter before the line, can be repeated"
    )]
    pub interpreter_args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_is_well_formed() { CLIArg::command().debug_assert(); }

    #[test]
    fn test_defaults() {
        let it = CLIArg::try_parse_from(["wrepl"]).unwrap().global_options;
        assert!(!it.enable_logging);
        assert_eq!(it.log_file, "log.txt");
        assert_eq!(it.history_dir, None);
        assert!(!it.in_memory_history);
        assert_eq!(it.interpreter, "python3");
        assert_eq!(it.interpreter_args, vec!["-c".to_string()]);
    }

    #[test]
    fn test_repeated_interpreter_args() {
        let it = CLIArg::try_parse_from([
            "wrepl",
            "-l",
            "--interpreter",
            "node",
            "--interpreter-arg",
            "--no-warnings",
            "--interpreter-arg",
            "-p",
        ])
        .unwrap()
        .global_options;
        assert!(it.enable_logging);
        assert_eq!(it.interpreter, "node");
        assert_eq!(it.interpreter_args, vec!["--no-warnings", "-p"]);
    }

    #[test]
    fn test_history_dir_conflicts_with_in_memory() {
        let result = CLIArg::try_parse_from([
            "wrepl",
            "--history-dir",
            "/tmp/h",
            "--in-memory-history",
        ]);
        assert!(result.is_err());
    }
}
