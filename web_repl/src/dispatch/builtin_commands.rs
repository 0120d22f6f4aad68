// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The commands a session understands without asking the execution backend. They are
//! registered in alphabetical order, which is also the order `help` lists them in.

use crate::{ArgumentMode, CommandContext, CommandRegistry, FRESH_PROMPT_LINE, PROMPT,
            RegistryError, SessionRequest, normalize_newlines, ok};
use chrono::{DateTime, Local};
use miette::IntoDiagnostic;
use rand::Rng;
use std::{fs, path::Path};

pub const HELP_HEADER: &str = "Listing of commands";

/// DECSCNM, reverse video on and off.
pub const REVERSE_VIDEO_ON: &str = "\x1b[?5h";
pub const REVERSE_VIDEO_OFF: &str = "\x1b[?5l";

pub const LIPSUM_PARAGRAPHS: [&str; 4] = [
    "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor \
     incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, quis nostrud \
     exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat.",
    "Logoden biniou degemer mat an penn ar bed Kernev en boan Kerbabu Groe erc'h, ennon \
     botez plad koumanant outo hon leue ha Gerveur goañv miliner. Gar degouezhout du \
     stagañ flourañ nav vrec'h aotre dor, vrozh werenn miz rimiañ oskaleg an hanternoz \
     fest ur labourat urzh.",
    "Pommy ipsum what a load of cobblers off the hook absolute twoddle scouser I'd reet \
     fancy a, jolly have a butcher's at this the lakes it's me peepers warts and all, \
     well chuffed football down the village green cor blimey' Northeners. A bottle of \
     plonk as diamond geezer.",
    "Taboire de verrat d'estique de patente à gosse de torrieux de maudine d'ostie de \
     câline de bine de cibole de saint-sacrament de bâtard de rigodon de crisse de \
     boswell de cossin de crucifix.",
];

type BuiltinHandler = fn(&mut CommandContext<'_>, &str) -> miette::Result<()>;

/// Name, description, argument mode, handler.
const BUILTIN_COMMANDS: [(&str, &str, ArgumentMode, BuiltinHandler); 14] = [
    ("audio", "To play a sound", ArgumentMode::Exact, audio),
    (
        "cat",
        "A standard utility that reads files sequentially",
        ArgumentMode::TakesArguments,
        cat,
    ),
    (
        "cd",
        "A command-line shell command used to change the current working directory",
        ArgumentMode::TakesArguments,
        cd,
    ),
    ("clear", "Clearing the terminal screen", ArgumentMode::Exact, clear),
    ("cls", "Clears the terminal", ArgumentMode::Exact, clear),
    ("exit", "Use exit() or Ctrl-D (i.e. EOF) to exit", ArgumentMode::Exact, exit),
    ("help", "Used for information or interactive usage", ArgumentMode::Exact, help),
    (
        "lang",
        "Allowing to change the language dynamically",
        ArgumentMode::TakesArguments,
        lang,
    ),
    (
        "lipsum",
        "Lorem Ipsum is a placeholder text demonstration",
        ArgumentMode::Exact,
        lipsum,
    ),
    ("ls", "It can list files and directories", ArgumentMode::TakesArguments, ls),
    ("mode", "Changing the background mode to dark/light", ArgumentMode::Exact, mode),
    ("quit", "Use quit() or Ctrl-D (i.e. EOF) to quit", ArgumentMode::Exact, reload),
    ("reboot", "Used to restart the current instance", ArgumentMode::Exact, reload),
    (
        "version",
        "Information about the Python version of the instance",
        ArgumentMode::Exact,
        version,
    ),
];

/// # Errors
///
/// Returns an error if one of the built-in names is already taken in `registry`.
pub fn register_builtin_commands(registry: &mut CommandRegistry) -> Result<(), RegistryError> {
    for (name, description, mode, handler) in BUILTIN_COMMANDS {
        registry.register(name, description, mode, handler)?;
    }
    ok!()
}

/// A registry holding just the built-in commands.
///
/// # Errors
///
/// Never in practice, the built-in names are unique.
pub fn default_registry() -> Result<CommandRegistry, RegistryError> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry)?;
    ok!(registry)
}

/// The text after the command name, or `default` if there is none.
fn argument_of<'a>(line: &'a str, default: &'a str) -> &'a str {
    line.split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(default)
}

/// `"\r\n{text}\r\n>>> "`, or just a fresh prompt if `text` is empty.
fn write_block(ctx: &mut CommandContext<'_>, text: &str) -> miette::Result<()> {
    let text = if text.is_empty() {
        FRESH_PROMPT_LINE.to_string()
    } else {
        format!("\r\n{}{FRESH_PROMPT_LINE}", normalize_newlines(text))
    };
    ctx.surface.write(&text).into_diagnostic()
}

fn audio(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    ctx.surface.write("\x07").into_diagnostic()?;
    write_block(ctx, "🔊")
}

fn cat(ctx: &mut CommandContext<'_>, line: &str) -> miette::Result<()> {
    let path = argument_of(line, ".");
    match fs::read_to_string(path) {
        Ok(content) => write_block(ctx, content.trim_end_matches(['\r', '\n'])),
        Err(error) => {
            // % is Display, ? is Debug.
            tracing::debug!(message = "🐱 cat failed", path = %path, error = %error);
            write_block(ctx, "cat: No such file or directory")
        }
    }
}

fn cd(ctx: &mut CommandContext<'_>, line: &str) -> miette::Result<()> {
    let path = argument_of(line, ".");
    match std::env::set_current_dir(path) {
        Ok(()) => write_block(ctx, ""),
        Err(error) => {
            tracing::debug!(message = "📁 cd failed", path = %path, error = %error);
            write_block(ctx, "cd: No such file or directory")
        }
    }
}

fn clear(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    ctx.surface.clear().into_diagnostic()?;
    ctx.surface.scroll_to_top().into_diagnostic()?;
    ctx.surface
        .write(&format!("\x1b[2K\r{PROMPT}"))
        .into_diagnostic()
}

fn exit(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    ctx.requests.push(SessionRequest::ResetLocale);
    ctx.requests.push(SessionRequest::Reload);
    ok!()
}

fn reload(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    ctx.requests.push(SessionRequest::Reload);
    ok!()
}

fn help(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    let mut acc = format!("\r\n{HELP_HEADER}:\r\n");
    for command in ctx.commands {
        acc.push_str(&format!(
            " • \x1b[1m{}\x1b[0m => {}\r\n",
            command.name, command.description
        ));
    }
    acc.push_str(PROMPT);
    ctx.surface.write(&acc).into_diagnostic()
}

fn lang(ctx: &mut CommandContext<'_>, line: &str) -> miette::Result<()> {
    let locale = argument_of(line, crate::DEFAULT_LOCALE);
    ctx.settings.locale = locale.to_string();
    tracing::debug!(message = "🌐 Locale changed", locale = %locale);
    write_block(ctx, "🌐")
}

fn lipsum(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    let index = rand::rng().random_range(0..LIPSUM_PARAGRAPHS.len());
    write_block(ctx, LIPSUM_PARAGRAPHS[index])
}

fn ls(ctx: &mut CommandContext<'_>, line: &str) -> miette::Result<()> {
    let path = argument_of(line, ".");
    match list_directory(Path::new(path)) {
        Ok(lines) => write_block(ctx, &lines.join("\r\n")),
        Err(error) => {
            tracing::debug!(message = "📂 ls failed", path = %path, error = %error);
            write_block(ctx, "ls: No such file or directory")
        }
    }
}

/// `.` and `..` first, then every entry under `path` depth first, sorted by name within
/// each directory. Names are relative to `path`. A file lists itself after `.` and `..`.
fn list_directory(path: &Path) -> std::io::Result<Vec<String>> {
    let metadata = fs::symlink_metadata(path)?;
    let dir = if metadata.is_dir() {
        path
    } else {
        path.parent()
            .filter(|it| !it.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    };

    let mut acc = vec![
        format_listing_line(".", &fs::metadata(dir)?),
        format_listing_line("..", &fs::metadata(dir.join(".."))?),
    ];

    if metadata.is_dir() {
        walk_directory(path, Path::new(""), &mut acc)?;
    } else {
        acc.push(format_listing_line(&path.to_string_lossy(), &metadata));
    }

    Ok(acc)
}

/// Subdirectories that can't be read are logged and skipped.
fn walk_directory(root: &Path, relative: &Path, acc: &mut Vec<String>) -> std::io::Result<()> {
    let mut entries = fs::read_dir(root.join(relative))?
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some((relative.join(entry.file_name()), metadata))
        })
        .collect::<Vec<_>>();
    entries.sort_by(|(lhs, _), (rhs, _)| lhs.cmp(rhs));

    for (name, metadata) in entries {
        acc.push(format_listing_line(&name.to_string_lossy(), &metadata));
        if metadata.is_dir()
            && let Err(error) = walk_directory(root, &name, acc)
        {
            // % is Display, ? is Debug.
            tracing::debug!(
                message = "📂 Skipping unreadable directory",
                path = %name.display(),
                error = %error
            );
        }
    }

    Ok(())
}

fn format_listing_line(name: &str, metadata: &fs::Metadata) -> String {
    let kind = if metadata.is_dir() {
        'd'
    } else if metadata.is_symlink() {
        'l'
    } else {
        '-'
    };
    let date = metadata.modified().map_or_else(
        |_| "-".to_string(),
        |modified| {
            DateTime::<Local>::from(modified)
                .format("%b %d %H:%M")
                .to_string()
        },
    );
    format!("{kind} {:>10} {date} {name}", metadata.len())
}

fn mode(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    ctx.settings.inverted_mode = !ctx.settings.inverted_mode;
    if ctx.settings.inverted_mode {
        ctx.surface.write(REVERSE_VIDEO_ON).into_diagnostic()?;
        write_block(ctx, "🎨")
    } else {
        ctx.surface.write(REVERSE_VIDEO_OFF).into_diagnostic()?;
        write_block(ctx, "🖌️")
    }
}

fn version(ctx: &mut CommandContext<'_>, _: &str) -> miette::Result<()> {
    write_block(
        ctx,
        &format!(
            "{} {} on {}\r\nType \"help\" for more information.",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            std::env::consts::OS
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DispatchOutcome, MockBackend, SessionSettings, StdoutMock,
                TerminalSurface, VirtualTerminal, dispatch, try_create_temp_dir};
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    struct Run {
        output: String,
        term: VirtualTerminal<StdoutMock>,
        settings: SessionSettings,
        requests: Vec<SessionRequest>,
    }

    fn run_with(line: &str, settings: SessionSettings) -> Run {
        let registry = default_registry().unwrap();
        let backend = MockBackend::default();
        let stdout_mock = StdoutMock::default();
        let mut term = VirtualTerminal::new(102, Some(stdout_mock.clone()));
        term.write(&format!("{PROMPT}{line}")).unwrap();
        stdout_mock.drain_as_string();

        let mut settings = settings;
        let mut requests = vec![];
        let mut ctx = CommandContext {
            surface: &mut term,
            settings: &mut settings,
            requests: &mut requests,
            commands: registry.commands(),
        };
        let outcome = dispatch(&registry, &backend, line, &mut ctx).unwrap();
        assert!(matches!(outcome, DispatchOutcome::Handled { .. }), "{line}");

        let output = stdout_mock.drain_as_string();
        Run {
            output,
            term,
            settings,
            requests,
        }
    }

    fn run(line: &str) -> Run { run_with(line, SessionSettings::default()) }

    #[test]
    fn test_registry_is_alphabetical() {
        let registry = default_registry().unwrap();
        let names = registry.names();
        assert_eq!(names.len(), 14);
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_argument_of() {
        assert_eq!(argument_of("cd", "."), ".");
        assert_eq!(argument_of("cd   ", "."), ".");
        assert_eq!(argument_of("cd  /tmp ", "."), "/tmp");
        assert_eq!(argument_of("cat my file.txt", "."), "my file.txt");
    }

    #[test]
    fn test_audio_rings_the_bell() {
        let mut it = run("audio");
        assert_eq!(it.output, "\x07\r\n🔊\r\n>>> ");
        assert_eq!(it.term.take_bell_count(), 1);
    }

    #[test]
    fn test_help_lists_every_command() {
        let it = run("help");
        assert!(it.output.starts_with("\r\nListing of commands:\r\n • \x1b[1maudio\x1b[0m"));
        assert!(it.output.contains(" • \x1b[1mls\x1b[0m => It can list files and directories\r\n"));
        assert!(it.output.ends_with("\r\n>>> "));
        assert_eq!(it.output.matches(" • ").count(), 14);
    }

    #[test]
    fn test_lang_sets_locale() {
        let it = run("lang fr");
        assert_eq!(it.settings.locale, "fr");
        assert_eq!(it.output, "\r\n🌐\r\n>>> ");

        let it = run_with(
            "lang",
            SessionSettings {
                locale: "de".into(),
                inverted_mode: false,
            },
        );
        assert_eq!(it.settings.locale, "en");
    }

    #[test]
    fn test_mode_toggles_reverse_video() {
        let it = run("mode");
        assert!(it.settings.inverted_mode);
        assert_eq!(it.output, "\x1b[?5h\r\n🎨\r\n>>> ");

        let it = run_with("mode", it.settings);
        assert!(!it.settings.inverted_mode);
        assert_eq!(it.output, "\x1b[?5l\r\n🖌️\r\n>>> ");
    }

    #[test]
    fn test_lipsum_prints_a_paragraph() {
        let it = run("lipsum");
        assert!(
            LIPSUM_PARAGRAPHS
                .iter()
                .any(|p| it.output == format!("\r\n{p}\r\n>>> "))
        );
    }

    #[test]
    fn test_reload_requests() {
        assert_eq!(run("quit").requests, vec![SessionRequest::Reload]);
        assert_eq!(run("reboot").requests, vec![SessionRequest::Reload]);
        assert_eq!(
            run("exit").requests,
            vec![SessionRequest::ResetLocale, SessionRequest::Reload]
        );
    }

    #[test]
    fn test_clear_leaves_prompt_on_top() {
        for name in ["clear", "cls"] {
            let it = run(name);
            assert_eq!(it.term.row_text(0), ">>>");
            assert_eq!(it.term.cursor_position().row, 0);
            assert_eq!(it.term.cursor_position().col, 4);
        }
    }

    #[test]
    fn test_version() {
        let it = run("version");
        assert!(it.output.starts_with("\r\nr3bl_web_repl "));
        assert!(it.output.ends_with("Type \"help\" for more information.\r\n>>> "));
    }

    #[test]
    fn test_cat_prints_file() {
        let dir = try_create_temp_dir().unwrap();
        let file = dir.join("notes.txt");
        fs::write(&file, "line one\nline two\n").unwrap();

        let it = run(&format!("cat {}", file.display()));
        assert_eq!(it.output, "\r\nline one\r\nline two\r\n>>> ");

        let it = run(&format!("cat {}", dir.join("missing").display()));
        assert_eq!(it.output, "\r\ncat: No such file or directory\r\n>>> ");
    }

    #[test]
    fn test_ls_lists_sorted_entries() {
        let dir = try_create_temp_dir().unwrap();
        fs::write(dir.join("b.txt"), "12345").unwrap();
        fs::create_dir(dir.join("a_dir")).unwrap();
        fs::write(dir.join("a_dir").join("c.txt"), "xy").unwrap();

        let listing = |it: &str| -> Vec<String> {
            it.trim_start_matches("\r\n")
                .trim_end_matches(">>> ")
                .lines()
                .map(ToString::to_string)
                .collect()
        };

        let lines = listing(&run(&format!("ls {}", dir.display())).output);
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("d ") && lines[0].ends_with(" ."));
        assert!(lines[1].starts_with("d ") && lines[1].ends_with(" .."));
        assert!(lines[2].starts_with("d ") && lines[2].ends_with(" a_dir"));
        let nested = Path::new("a_dir").join("c.txt");
        assert!(lines[3].starts_with("-          2 "));
        assert!(lines[3].ends_with(&format!(" {}", nested.display())));
        assert!(lines[4].starts_with("-          5 "));
        assert!(lines[4].ends_with(" b.txt"));

        let file = dir.join("b.txt");
        let lines = listing(&run(&format!("ls {}", file.display())).output);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" ."));
        assert!(lines[2].ends_with(&format!(" {}", file.display())));

        let it = run(&format!("ls {}", dir.join("missing").display()));
        assert_eq!(it.output, "\r\nls: No such file or directory\r\n>>> ");
    }

    #[serial]
    #[test]
    fn test_cd_changes_working_directory() {
        let original = std::env::current_dir().unwrap();
        let dir = try_create_temp_dir().unwrap();

        let it = run(&format!("cd {}", dir.display()));
        assert_eq!(it.output, "\r\n>>> ");
        assert_eq!(
            std::env::current_dir().unwrap().canonicalize().unwrap(),
            dir.canonicalize().unwrap()
        );

        let it = run("cd /r3bl/no/such/dir");
        assert_eq!(it.output, "\r\ncd: No such file or directory\r\n>>> ");

        std::env::set_current_dir(original).unwrap();
    }
}
