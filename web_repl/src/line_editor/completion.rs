// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Separates candidates when they are listed.
pub const CANDIDATE_SEPARATOR: &str = "      ";

/// Counts consecutive TAB presses. Any other key resets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabState {
    pub presses: u8,
}

impl TabState {
    pub fn reset(&mut self) { self.presses = 0; }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Several candidates, waiting for a second TAB.
    Noop,
    /// Append this text to the buffer.
    Append(String),
    /// Nothing matches, insert a literal tab.
    InsertTab,
    /// Several candidates on the second TAB, in registry order.
    ListCandidates(Vec<String>),
}

/// The text after the last whitespace char of the buffer.
#[must_use]
pub fn completion_token(buffer: &str) -> &str {
    buffer.rsplit(char::is_whitespace).next().unwrap_or_default()
}

/// Prefix completion of the last token of `buffer` over `names`, ignoring case.
pub fn complete(
    buffer: &str,
    tab_state: &mut TabState,
    names: &[&str],
) -> CompletionOutcome {
    tab_state.presses = tab_state.presses.saturating_add(1).min(2);

    let token = completion_token(buffer);
    let token_lowercase = token.to_lowercase();
    let candidates: Vec<&str> = names
        .iter()
        .copied()
        .filter(|name| name.to_lowercase().starts_with(&token_lowercase))
        .collect();

    let it = match candidates.as_slice() {
        [] => {
            tab_state.reset();
            CompletionOutcome::InsertTab
        }
        [name] if tab_state.presses == 1 => {
            tab_state.reset();
            if name.to_lowercase() == token_lowercase {
                CompletionOutcome::Append(" ".to_string())
            } else {
                let suffix: String = name.chars().skip(token.chars().count()).collect();
                CompletionOutcome::Append(format!("{suffix} "))
            }
        }
        [_] => {
            tab_state.reset();
            CompletionOutcome::Noop
        }
        _ if tab_state.presses >= 2 => {
            tab_state.reset();
            CompletionOutcome::ListCandidates(
                candidates.iter().map(ToString::to_string).collect(),
            )
        }
        _ => CompletionOutcome::Noop,
    };

    // % is Display, ? is Debug.
    tracing::debug!(
        message = "⇥ complete",
        token = %token,
        outcome = ?it
    );

    it
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NAMES: &[&str] = &["cat", "cd", "clear", "cls", "help", "lang", "lipsum"];

    #[test]
    fn test_token_is_after_last_whitespace() {
        assert_eq!(completion_token(""), "");
        assert_eq!(completion_token("print(1) he"), "he");
        assert_eq!(completion_token("x\the"), "he");
        assert_eq!(completion_token("abc "), "");
    }

    #[test]
    fn test_single_match_completes_preserving_typed_case() {
        let mut tab_state = TabState::default();
        assert_eq!(
            complete("HE", &mut tab_state, NAMES),
            CompletionOutcome::Append("lp ".to_string())
        );
        assert_eq!(tab_state, TabState::default());
    }

    #[test]
    fn test_full_name_appends_space() {
        let mut tab_state = TabState::default();
        assert_eq!(
            complete("Help", &mut tab_state, NAMES),
            CompletionOutcome::Append(" ".to_string())
        );
    }

    #[test]
    fn test_no_match_inserts_tab() {
        let mut tab_state = TabState::default();
        assert_eq!(
            complete("zzz", &mut tab_state, NAMES),
            CompletionOutcome::InsertTab
        );
        assert_eq!(tab_state.presses, 0);
    }

    #[test]
    fn test_several_matches_list_on_second_press() {
        let mut tab_state = TabState::default();
        assert_eq!(complete("c", &mut tab_state, NAMES), CompletionOutcome::Noop);
        assert_eq!(tab_state.presses, 1);
        assert_eq!(
            complete("c", &mut tab_state, NAMES),
            CompletionOutcome::ListCandidates(vec![
                "cat".to_string(),
                "cd".to_string(),
                "clear".to_string(),
                "cls".to_string(),
            ])
        );
        assert_eq!(tab_state.presses, 0);

        // The cycle starts over.
        assert_eq!(complete("c", &mut tab_state, NAMES), CompletionOutcome::Noop);
    }

    #[test]
    fn test_empty_buffer_matches_everything() {
        let mut tab_state = TabState::default();
        assert_eq!(complete("", &mut tab_state, NAMES), CompletionOutcome::Noop);
        let CompletionOutcome::ListCandidates(names) = complete("", &mut tab_state, NAMES)
        else {
            panic!("expected a listing");
        };
        assert_eq!(names.len(), NAMES.len());
    }
}
