//! Token-to-definition matching and validation.
//!
//! The parser makes a single left-to-right pass over the raw tokens:
//!
//! - `--name` / `-n` matching a declared long / short name selects that
//!   option. Option matching always takes precedence over positional use.
//! - `--name=value` supplies an inline value to a value-bearing long option.
//! - A flag is switched on; a value-bearing option consumes the next token.
//! - `--` ends option processing; every later token is positional.
//! - Anything else, including unknown option markers, is positional and is
//!   assigned to the argument at the current cursor, which then advances.
//!   Options and positionals may be interleaved freely.
//!
//! Positional tokens beyond the last argument are dropped unless that
//! argument is multi-valued. Requirements are checked after the scan.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Missing, ParseError};
use crate::{Argument, CliOption, Command, CommandLine, DefinitionError, validate_command};

const END_OF_OPTIONS: &str = "--";

/// Classification of one raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'t> {
    EndOfOptions,
    Option {
        position: usize,
        inline: Option<&'t str>,
    },
    Positional(&'t str),
}

/// Parser bound to one [`Command`] definition.
///
/// Creating a parser checks the definition and builds a two-key index
/// (short name → option, long name → option) so each token is resolved with
/// a single lookup. A parser only reads the definition and can be reused for
/// any number of parses.
///
/// # Examples
///
/// ```
/// use cmdline_core::{CliOption, Command, Parser};
///
/// let cmd = Command::new("test")
///     .with_option(CliOption::flag(Some("f"), None))
///     .with_option(CliOption::with_value(Some("x"), None));
///
/// let parser = Parser::new(&cmd).unwrap();
/// let line = parser.parse(&["-f", "-x", "foo"]).unwrap();
/// assert!(line.is_flag_enabled("f"));
/// assert_eq!(line.option_value("x"), Some("foo"));
/// ```
#[derive(Debug, Clone)]
pub struct Parser<'c> {
    command: &'c Command,
    short_index: HashMap<&'c str, usize>,
    long_index: HashMap<&'c str, usize>,
    slots: Vec<Argument>,
}

impl<'c> Parser<'c> {
    /// Creates a parser for `command`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] reported by
    /// [`validate_command`].
    pub fn new(command: &'c Command) -> Result<Self, DefinitionError> {
        if let Some(err) = validate_command(command).into_iter().next() {
            return Err(err);
        }

        let mut short_index = HashMap::new();
        let mut long_index = HashMap::new();
        for (position, option) in command.options.iter().enumerate() {
            if let Some(short) = option.short_name.as_deref() {
                short_index.insert(short, position);
            }
            if let Some(long) = option.long_name.as_deref() {
                long_index.insert(long, position);
            }
        }

        Ok(Self {
            command,
            short_index,
            long_index,
            slots: command.ordered_arguments(),
        })
    }

    /// Parses `tokens` and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MissingValue`] when a required option or
    /// argument has no value, or [`ParseError::InvalidValue`] when a value is
    /// outside an option's choices.
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<CommandLine<'c>, ParseError> {
        self.parse_with(tokens, true)
    }

    /// Parses `tokens`, validating only when `validate` is true.
    ///
    /// With validation disabled no requirement failure is raised; the
    /// outcome is reported by [`CommandLine::is_valid`] instead.
    pub fn parse_with<S: AsRef<str>>(
        &self,
        tokens: &[S],
        validate: bool,
    ) -> Result<CommandLine<'c>, ParseError> {
        let mut line = CommandLine::new(self.command, self.slots.clone());
        let mut cursor = 0usize;
        let mut options_ended = false;

        let mut i = 0usize;
        while i < tokens.len() {
            let raw: &str = tokens[i].as_ref();
            let token = if options_ended {
                Token::Positional(raw)
            } else {
                self.classify(raw)
            };

            match token {
                Token::EndOfOptions => {
                    options_ended = true;
                }
                Token::Option { position, inline } => {
                    let option = &self.command.options[position];
                    line.mark_seen(position);
                    if option.flag {
                        debug!(option = %option.display_name(), "flag enabled");
                        line.enable_flag(position);
                    } else if let Some(value) = inline {
                        line.push_option_value(position, value);
                    } else if let Some(value) = tokens.get(i + 1) {
                        line.push_option_value(position, value.as_ref());
                        i += 1;
                    } else {
                        debug!(option = %option.display_name(), "no token left for option value");
                    }
                }
                Token::Positional(value) => {
                    cursor = self.assign_positional(&mut line, cursor, value);
                }
            }
            i += 1;
        }

        if line.is_asking_for_help() {
            debug!(command = %self.command.name, "help requested, skipping validation");
            line.set_valid(true);
            return Ok(line);
        }

        match check_requirements(&line) {
            Ok(()) => line.set_valid(true),
            Err(err) if validate => return Err(err),
            Err(err) => {
                debug!(command = %self.command.name, error = %err, "validation disabled, marking invalid");
                line.set_valid(false);
            }
        }

        Ok(line)
    }

    fn classify<'t>(&self, token: &'t str) -> Token<'t> {
        if token == END_OF_OPTIONS {
            return Token::EndOfOptions;
        }

        if let Some(name) = token.strip_prefix("--") {
            if let Some(&position) = self.long_index.get(name) {
                return Token::Option {
                    position,
                    inline: None,
                };
            }
            if let Some((name, value)) = name.split_once('=') {
                if let Some(&position) = self.long_index.get(name) {
                    if self.command.options[position].accepts_value() {
                        return Token::Option {
                            position,
                            inline: Some(value),
                        };
                    }
                }
            }
            return Token::Positional(token);
        }

        if let Some(name) = token.strip_prefix('-') {
            if let Some(&position) = self.short_index.get(name) {
                return Token::Option {
                    position,
                    inline: None,
                };
            }
        }

        Token::Positional(token)
    }

    /// Stores `value` at the cursor and returns the next cursor.
    fn assign_positional(&self, line: &mut CommandLine<'c>, cursor: usize, value: &str) -> usize {
        match self.slots.get(cursor) {
            Some(slot) if slot.multi_valued => {
                line.push_argument_value(cursor, value);
                cursor
            }
            Some(_) => {
                debug!(index = cursor, value, "positional assigned");
                line.push_argument_value(cursor, value);
                cursor + 1
            }
            None => {
                debug!(value, "dropping positional token beyond the last argument");
                cursor
            }
        }
    }
}

/// Checks required options and arguments, missing option values and choices.
fn check_requirements(line: &CommandLine<'_>) -> Result<(), ParseError> {
    for (position, option) in line.command().options.iter().enumerate() {
        check_option(line, position, option)?;
    }

    for (index, slot) in line.slots().iter().enumerate() {
        if slot.required && !line.is_argument_assigned(index) && slot.default_value.is_none() {
            return Err(ParseError::MissingValue(Missing::Argument(
                slot.label().to_string(),
            )));
        }
    }

    Ok(())
}

fn check_option(line: &CommandLine<'_>, position: usize, option: &CliOption) -> Result<(), ParseError> {
    let missing = || ParseError::MissingValue(Missing::Option(option.display_name()));

    if option.flag {
        if option.required && !line.flag_set(position) {
            return Err(missing());
        }
        return Ok(());
    }

    let values = line.captured_option_values(position);
    if values.is_empty() {
        if line.option_seen(position) {
            return Err(missing());
        }
        if option.required && option.default_value.is_none() {
            return Err(missing());
        }
    }

    if !option.choices.is_empty() {
        if let Some(value) = values.iter().find(|v| !option.choices.contains(*v)) {
            return Err(ParseError::InvalidValue {
                option: option.display_name(),
                value: value.clone(),
            });
        }
    }

    Ok(())
}

impl Command {
    /// Parses `tokens` against this definition with validation enabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::{Argument, Command, Missing, ParseError};
    ///
    /// let cmd = Command::new("test").with_argument(Argument::named("foo"));
    ///
    /// let err = cmd.parse::<&str>(&[]).unwrap_err();
    /// assert_eq!(err, ParseError::MissingValue(Missing::Argument("foo".into())));
    ///
    /// let line = cmd.parse_with::<&str>(&[], false).unwrap();
    /// assert!(!line.is_valid());
    /// ```
    pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<CommandLine<'_>, ParseError> {
        self.parse_with(tokens, true)
    }

    /// Parses `tokens`, validating only when `validate` is true.
    pub fn parse_with<S: AsRef<str>>(
        &self,
        tokens: &[S],
        validate: bool,
    ) -> Result<CommandLine<'_>, ParseError> {
        Parser::new(self)?.parse_with(tokens, validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn flag_and_value() -> Command {
        Command::new("test")
            .with_option(CliOption::flag(Some("f"), None))
            .with_option(CliOption::with_value(Some("x"), None))
    }

    #[test]
    fn test_flag_and_value_option() {
        let cmd = flag_and_value();
        let line = cmd.parse(&tokens(&["-f", "-x", "foo"])).unwrap();

        assert!(line.is_flag_enabled("f"));
        assert_eq!(line.option_value("x"), Some("foo"));
        assert!(line.is_valid());
    }

    #[test]
    fn test_missing_flag_defaults_to_false() {
        let cmd = flag_and_value();
        let line = cmd.parse(&tokens(&["-x", "foo"])).unwrap();

        assert!(!line.is_flag_enabled("f"));
        assert_eq!(line.option_value("x"), Some("foo"));
    }

    #[test]
    fn test_value_is_case_preserving() {
        let cmd = flag_and_value();
        let line = cmd.parse(&["-x", "FoO"]).unwrap();
        assert_eq!(line.option_value("x"), Some("FoO"));
    }

    #[test]
    fn test_long_and_short_resolve_to_same_value() {
        let cmd = Command::new("test").with_option(CliOption::with_value(Some("f"), Some("file")));

        let line = cmd.parse(&["--file", "a.txt"]).unwrap();
        assert_eq!(line.option_value("f"), Some("a.txt"));
        assert_eq!(line.option_value("file"), Some("a.txt"));

        let line = cmd.parse(&["-f", "b.txt"]).unwrap();
        assert_eq!(line.option_value("file"), Some("b.txt"));
    }

    #[test]
    fn test_inline_long_value() {
        let cmd = Command::new("test").with_option(CliOption::with_value(None, Some("level")));
        let line = cmd.parse(&["--level=debug"]).unwrap();
        assert_eq!(line.option_value("level"), Some("debug"));
    }

    #[test]
    fn test_inline_value_on_flag_is_positional() {
        let cmd = Command::new("test")
            .with_option(CliOption::flag(None, Some("quiet")))
            .with_argument(Argument::named("rest").required(false));
        let line = cmd.parse(&["--quiet=yes"]).unwrap();

        assert!(!line.is_flag_enabled("quiet"));
        assert_eq!(line.argument_value(0), Some("--quiet=yes"));
    }

    #[test]
    fn test_value_token_is_consumed_verbatim() {
        let cmd = flag_and_value();
        let line = cmd.parse(&["-x", "-f"]).unwrap();

        assert_eq!(line.option_value("x"), Some("-f"));
        assert!(!line.is_flag_enabled("f"));
    }

    #[test]
    fn test_interleaved_positionals_keep_relative_order() {
        let cmd = Command::new("test")
            .with_option(CliOption::flag(Some("v"), None))
            .with_option(CliOption::with_value(Some("o"), None))
            .with_argument(Argument::named("src"))
            .with_argument(Argument::named("dst"));

        let line = cmd.parse(&["a", "-o", "out", "-v", "b"]).unwrap();
        assert_eq!(line.argument_value(0), Some("a"));
        assert_eq!(line.argument_value(1), Some("b"));
        assert_eq!(line.option_value("o"), Some("out"));
        assert!(line.is_flag_enabled("v"));
    }

    #[test]
    fn test_unknown_option_marker_is_positional() {
        let cmd = Command::new("test").with_argument(Argument::named("foo"));
        let line = cmd.parse(&["--unknown"]).unwrap();
        assert_eq!(line.argument_value_by_name("foo"), Some("--unknown"));
    }

    #[test]
    fn test_end_of_options_marker() {
        let cmd = Command::new("test")
            .with_option(CliOption::flag(Some("f"), None))
            .with_argument(Argument::named("a"))
            .with_argument(Argument::named("b"));

        let line = cmd.parse(&["--", "-f", "x"]).unwrap();
        assert!(!line.is_flag_enabled("f"));
        assert_eq!(line.argument_value(0), Some("-f"));
        assert_eq!(line.argument_value(1), Some("x"));
    }

    #[test]
    fn test_extra_positionals_are_dropped() {
        let cmd = Command::new("test").with_argument(Argument::named("only"));
        let line = cmd.parse(&["a", "b", "c"]).unwrap();

        assert!(line.is_valid());
        assert_eq!(line.argument_values(0), vec!["a"]);
        assert!(!line.is_argument_assigned(1));
    }

    #[test]
    fn test_multi_valued_trailing_argument_absorbs_rest() {
        let cmd = Command::new("test")
            .with_argument(Argument::named("first"))
            .with_argument(Argument::named("rest").multi_valued(true));

        let line = cmd.parse(&["a", "b", "c", "d"]).unwrap();
        assert_eq!(line.argument_value(0), Some("a"));
        assert_eq!(line.argument_values(1), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_gap_index_consumes_a_token() {
        let cmd = Command::new("test")
            .with_argument(Argument::at(0).with_name("foo"))
            .with_argument(Argument::at(2).with_name("bar"));

        let line = cmd.parse(&["a", "b", "c"]).unwrap();
        assert_eq!(line.argument_value(1), Some("b"));
        assert_eq!(line.argument_value_by_name("bar"), Some("c"));
    }

    #[test]
    fn test_arguments_match_in_index_order() {
        let cmd = Command::new("test")
            .with_argument(Argument::at(1).with_name("second"))
            .with_argument(Argument::at(0).with_name("first"));

        let line = cmd.parse(&["a", "b"]).unwrap();
        assert_eq!(line.argument_value_by_name("first"), Some("a"));
        assert_eq!(line.argument_value_by_name("second"), Some("b"));
    }

    #[test]
    fn test_single_valued_option_keeps_last_value() {
        let cmd = flag_and_value();
        let line = cmd.parse(&["-x", "one", "-x", "two"]).unwrap();
        assert_eq!(line.option_value("x"), Some("two"));
    }

    #[test]
    fn test_multi_valued_option_accumulates() {
        let cmd = Command::new("test")
            .with_option(CliOption::with_value(Some("D"), None).multi_valued(true));
        let line = cmd.parse(&["-D", "a=1", "-D", "b=2"]).unwrap();
        assert_eq!(line.option_values("D"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_required_option_missing() {
        let cmd = Command::new("test")
            .with_option(CliOption::with_value(Some("f"), Some("file")).required(true));

        let err = cmd.parse::<&str>(&[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingValue(Missing::Option("--file".to_string()))
        );

        let line = cmd.parse_with::<&str>(&[], false).unwrap();
        assert!(!line.is_valid());
    }

    #[test]
    fn test_required_option_satisfied_by_default() {
        let cmd = Command::new("test").with_option(
            CliOption::with_value(Some("l"), None)
                .required(true)
                .with_default("info"),
        );
        let line = cmd.parse::<&str>(&[]).unwrap();
        assert!(line.is_valid());
        assert_eq!(line.option_value("l"), Some("info"));
    }

    #[test]
    fn test_option_value_missing_at_end() {
        let cmd = flag_and_value();

        let err = cmd.parse(&["-x"]).unwrap_err();
        assert_eq!(err, ParseError::MissingValue(Missing::Option("-x".to_string())));

        let line = cmd.parse_with(&["-x"], false).unwrap();
        assert!(!line.is_valid());
        assert!(line.is_seen_in_command_line("x"));
        assert!(!line.is_option_assigned("x"));
    }

    #[test]
    fn test_required_argument_missing() {
        let cmd = Command::new("test").with_argument(Argument::named("foo"));

        assert!(matches!(
            cmd.parse::<&str>(&[]),
            Err(ParseError::MissingValue(Missing::Argument(ref label))) if label == "foo"
        ));
        assert!(cmd.parse(&["bar"]).unwrap().is_valid());
    }

    #[test]
    fn test_optional_argument_may_be_absent() {
        let cmd = Command::new("test").with_argument(Argument::named("foo").required(false));
        let line = cmd.parse::<&str>(&[]).unwrap();
        assert!(line.is_valid());
        assert_eq!(line.argument_value(0), None);
    }

    #[test]
    fn test_hidden_argument_still_validated() {
        let cmd = Command::new("test").with_argument(Argument::named("secret").hidden(true));
        assert!(cmd.parse::<&str>(&[]).is_err());
    }

    #[test]
    fn test_choices_are_enforced() {
        let cmd = Command::new("test").with_option(
            CliOption::with_value(None, Some("format")).with_choices(["json", "yaml"]),
        );

        assert!(cmd.parse(&["--format", "json"]).is_ok());
        let err = cmd.parse(&["--format", "xml"]).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidValue {
                option: "--format".to_string(),
                value: "xml".to_string(),
            }
        );
        assert!(!cmd.parse_with(&["--format", "xml"], false).unwrap().is_valid());
    }

    #[test]
    fn test_help_option_skips_validation() {
        let cmd = Command::new("test")
            .with_option(CliOption::new().with_short_name("h").with_long_name("help").as_help())
            .with_argument(Argument::named("foo"));

        let line = cmd.parse(&["--help"]).unwrap();
        assert!(line.is_asking_for_help());
        assert!(line.is_valid());
    }

    #[test]
    fn test_inconsistent_definition_is_rejected() {
        let cmd = Command::new("test")
            .with_option(CliOption::flag(Some("f"), None))
            .with_option(CliOption::with_value(Some("f"), None));

        let err = cmd.parse::<&str>(&[]).unwrap_err();
        assert_eq!(
            err,
            ParseError::Definition(DefinitionError::DuplicateOptionName("f".to_string()))
        );
    }

    #[test]
    fn test_parser_is_reusable() {
        let cmd = flag_and_value();
        let parser = Parser::new(&cmd).unwrap();

        let first = parser.parse(&["-f"]).unwrap();
        let second = parser.parse(&["-x", "y"]).unwrap();
        assert!(first.is_flag_enabled("f"));
        assert!(!second.is_flag_enabled("f"));
        assert_eq!(second.option_value("x"), Some("y"));
    }
}
