//! Parsing of user commands into query options.
//!
//! Only option names are validated here. Values are carried verbatim and
//! checked by [`crate::QueryBuilder::from_options`].

use crate::error::SessionError;

pub const OPTION_SORT_BY: &str = "-sortBy";
pub const OPTION_IS_OPEN: &str = "-isOpen";
pub const OPTION_BATCH_SIZE: &str = "-batchSize";

const RUN_KEYWORD: &str = "run";

/// Recognized options with their raw, unvalidated values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedOptions {
    pub sort_by: Option<String>,
    pub is_open: Option<String>,
    pub batch_size: Option<String>,
}

impl RecognizedOptions {
    /// Returns true when no option was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort_by.is_none() && self.is_open.is_none() && self.batch_size.is_none()
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            OPTION_SORT_BY => Some(&mut self.sort_by),
            OPTION_IS_OPEN => Some(&mut self.is_open),
            OPTION_BATCH_SIZE => Some(&mut self.batch_size),
            _ => None,
        }
    }
}

/// Outcome of parsing a comma-separated option list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCommand {
    pub recognized: RecognizedOptions,
    pub invalid_tokens: Vec<String>,
}

impl ParsedCommand {
    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.invalid_tokens.is_empty()
    }

    /// Converts into the recognized options, or `InvalidCommand` listing every
    /// offending token.
    pub fn into_result(self) -> Result<RecognizedOptions, SessionError> {
        if self.has_error() {
            return Err(SessionError::InvalidCommand {
                tokens: self.invalid_tokens,
            });
        }
        Ok(self.recognized)
    }
}

/// Parses `-opt1=val1,-opt2=val2,...`.
///
/// Tokens are trimmed and blank tokens skipped. A token is split on its first
/// `=`; a recognized option without `=` records an empty value. Repeated
/// options keep the last value. Unrecognized option names are collected in
/// input order.
pub fn parse_options(input: &str) -> ParsedCommand {
    let mut parsed = ParsedCommand::default();

    for token in input.trim().split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let (name, value) = token.split_once('=').unwrap_or((token, ""));
        let name = name.trim();
        match parsed.recognized.slot_mut(name) {
            Some(slot) => *slot = Some(value.trim().to_string()),
            None => parsed.invalid_tokens.push(name.to_string()),
        }
    }

    parsed
}

/// One line entered at the command prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptCommand {
    Run(ParsedCommand),
    Quit,
    Empty,
    Unknown(String),
}

/// Classifies a prompt line: `run [options]`, `q`/`quit`, or anything else.
pub fn parse_prompt_line(line: &str) -> PromptCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return PromptCommand::Empty;
    }
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return PromptCommand::Quit;
    }

    match trimmed.strip_prefix(RUN_KEYWORD) {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => {
            PromptCommand::Run(parse_options(rest))
        }
        _ => PromptCommand::Unknown(
            trimmed
                .split_whitespace()
                .next()
                .unwrap_or(trimmed)
                .to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{parse_options, parse_prompt_line, ParsedCommand, PromptCommand, RecognizedOptions};
    use crate::error::SessionError;

    #[test]
    fn recognized_and_unrecognized_tokens_are_separated() {
        let parsed = parse_options("-sortBy=starttime,-foo=1,-batchSize=25");

        assert_eq!(
            parsed.recognized,
            RecognizedOptions {
                sort_by: Some("starttime".to_string()),
                is_open: None,
                batch_size: Some("25".to_string()),
            }
        );
        assert_eq!(parsed.invalid_tokens, vec!["-foo".to_string()]);
        assert!(parsed.has_error());
    }

    #[test]
    fn blank_input_has_no_options_and_no_error() {
        let parsed = parse_options("   ");
        assert!(parsed.recognized.is_empty());
        assert!(!parsed.has_error());
    }

    #[test]
    fn tokens_are_trimmed_and_empty_tokens_skipped() {
        let parsed = parse_options(" -isOpen=false, ,-sortBy = applicant ,");
        assert_eq!(parsed.recognized.is_open.as_deref(), Some("false"));
        assert_eq!(parsed.recognized.sort_by.as_deref(), Some("applicant"));
        assert!(!parsed.has_error());
    }

    #[test]
    fn value_keeps_everything_after_first_equals() {
        let parsed = parse_options("-sortBy=a=b");
        assert_eq!(parsed.recognized.sort_by.as_deref(), Some("a=b"));
    }

    #[test]
    fn option_without_value_records_empty_string() {
        let parsed = parse_options("-batchSize");
        assert_eq!(parsed.recognized.batch_size.as_deref(), Some(""));
    }

    #[test]
    fn option_names_are_case_sensitive_and_need_dash() {
        let parsed = parse_options("batchSize=25,-SORTBY=x");
        assert_eq!(
            parsed.invalid_tokens,
            vec!["batchSize".to_string(), "-SORTBY".to_string()]
        );
    }

    #[test]
    fn repeated_option_keeps_last_value() {
        let parsed = parse_options("-batchSize=5,-batchSize=7");
        assert_eq!(parsed.recognized.batch_size.as_deref(), Some("7"));
    }

    #[test]
    fn into_result_reports_invalid_tokens() {
        let error = parse_options("-x=1,-y")
            .into_result()
            .expect_err("unknown options must fail");
        match error {
            SessionError::InvalidCommand { tokens } => {
                assert_eq!(tokens, vec!["-x".to_string(), "-y".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn prompt_line_recognizes_run_with_and_without_options() {
        assert_eq!(
            parse_prompt_line("run"),
            PromptCommand::Run(ParsedCommand::default())
        );

        let PromptCommand::Run(parsed) = parse_prompt_line("run -sortBy=starttime,-isOpen=false")
        else {
            panic!("expected run command");
        };
        assert_eq!(parsed.recognized.sort_by.as_deref(), Some("starttime"));
        assert_eq!(parsed.recognized.is_open.as_deref(), Some("false"));
    }

    #[test]
    fn prompt_line_recognizes_quit_and_unknown() {
        assert_eq!(parse_prompt_line("q"), PromptCommand::Quit);
        assert_eq!(parse_prompt_line(" quit "), PromptCommand::Quit);
        assert_eq!(parse_prompt_line(""), PromptCommand::Empty);
        assert_eq!(
            parse_prompt_line("runner -x"),
            PromptCommand::Unknown("runner".to_string())
        );
        assert_eq!(
            parse_prompt_line("help me"),
            PromptCommand::Unknown("help".to_string())
        );
    }
}
