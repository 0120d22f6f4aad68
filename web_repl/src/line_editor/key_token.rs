// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// One key press, as the line editor understands it.
///
/// Web terminals deliver keys as raw strings (see [`KeyToken::parse`]). Native
/// terminals deliver crossterm events (see [`KeyToken::from_crossterm`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum_macros::AsRefStr)]
pub enum KeyToken {
    Escape,
    CtrlA,
    Tab,
    CtrlX,
    CtrlC,
    CtrlShiftV,
    AltEnter,
    Enter,
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    Backspace,
    F5,
    CtrlF5,
    F11,
    Printable(char),
    Unrecognized(String),
}

/// Characters that can be typed into the buffer: `' '..='~'` and everything from
/// `U+00A0` upwards.
#[must_use]
pub fn is_printable(ch: char) -> bool { (' '..='~').contains(&ch) || ch >= '\u{a0}' }

impl KeyToken {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "\x1b" => Self::Escape,
            "\x01" => Self::CtrlA,
            "\t" => Self::Tab,
            "\x18" => Self::CtrlX,
            "\x03" => Self::CtrlC,
            "\x16" => Self::CtrlShiftV,
            "\x1b\r" => Self::AltEnter,
            "\r" => Self::Enter,
            "\x1b[A" => Self::ArrowUp,
            "\x1b[B" => Self::ArrowDown,
            "\x1b[C" => Self::ArrowRight,
            "\x1b[D" => Self::ArrowLeft,
            "\x7f" => Self::Backspace,
            "\x1b[15~" => Self::F5,
            "\x1b[15;5~" => Self::CtrlF5,
            "\x1b[23~" => Self::F11,
            _ => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) if is_printable(ch) => Self::Printable(ch),
                    _ => Self::Unrecognized(raw.to_string()),
                }
            }
        }
    }

    /// Only key presses produce a token, releases and repeats are dropped.
    #[must_use]
    pub fn from_crossterm(key_event: KeyEvent) -> Option<Self> {
        if key_event.kind != KeyEventKind::Press {
            return None;
        }

        let KeyEvent {
            code, modifiers, ..
        } = key_event;
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let alt = modifiers.contains(KeyModifiers::ALT);

        let it = match code {
            KeyCode::Esc => Self::Escape,
            KeyCode::Tab => Self::Tab,
            KeyCode::Enter if alt => Self::AltEnter,
            KeyCode::Enter => Self::Enter,
            KeyCode::Up => Self::ArrowUp,
            KeyCode::Down => Self::ArrowDown,
            KeyCode::Right => Self::ArrowRight,
            KeyCode::Left => Self::ArrowLeft,
            KeyCode::Backspace => Self::Backspace,
            KeyCode::F(5) if ctrl => Self::CtrlF5,
            KeyCode::F(5) => Self::F5,
            KeyCode::F(11) => Self::F11,
            KeyCode::Char(ch) if ctrl => match ch.to_ascii_lowercase() {
                'a' => Self::CtrlA,
                'x' => Self::CtrlX,
                'c' => Self::CtrlC,
                'v' => Self::CtrlShiftV,
                _ => Self::Unrecognized(format!("ctrl+{ch}")),
            },
            KeyCode::Char(ch) if alt => Self::Unrecognized(format!("alt+{ch}")),
            KeyCode::Char(ch) => Self::parse(ch.encode_utf8(&mut [0; 4])),
            other => Self::Unrecognized(format!("{other:?}")),
        };

        Some(it)
    }
}
