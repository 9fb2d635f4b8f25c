//! Definition consistency checks.
//!
//! Building a [`Command`] never fails, so inconsistencies such as two options
//! sharing a name are caught here instead. The parser runs these checks
//! before it builds its name index and refuses to parse an inconsistent
//! definition.
//!
//! # Examples
//!
//! ```
//! use cmdline_core::*;
//!
//! let cmd = Command::new("test").with_option(CliOption::flag(Some("v"), Some("verbose")));
//! assert!(validate_command(&cmd).is_empty());
//!
//! // Invalid: both options claim `-v`
//! let bad = cmd.with_option(CliOption::with_value(Some("v"), None));
//! assert_eq!(
//!     validate_command(&bad),
//!     vec![DefinitionError::DuplicateOptionName("v".to_string())]
//! );
//! ```

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{CliOption, Command, MAX_ARGUMENT_INDEX};

/// Option names are stored without dashes and must not contain `=` or
/// whitespace, otherwise tokens could never match them.
static OPTION_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9?@][A-Za-z0-9_.?@:-]*$").expect("static regex must compile")
});

/// Structural problems in a command definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty")]
    EmptyCommandName,
    /// An option has neither a short nor a long name.
    #[error("option must define a short or long name")]
    MissingOptionName,
    /// An option name starts with a dash or contains characters a token can't carry.
    #[error("invalid option name: {0}")]
    InvalidOptionName(String),
    /// Two options share the same name.
    #[error("duplicate option name: {0}")]
    DuplicateOptionName(String),
    /// An argument index is past [`MAX_ARGUMENT_INDEX`].
    #[error("argument index {0} is out of range (maximum {max})", max = MAX_ARGUMENT_INDEX)]
    ArgumentIndexOutOfRange(usize),
    /// Two arguments share the same index.
    #[error("duplicate argument index: {0}")]
    DuplicateArgumentIndex(usize),
    /// A multi-valued argument is followed by other arguments.
    #[error("multi-valued argument at index {0} must be the last argument")]
    MultiValuedArgumentNotLast(usize),
    /// A flag cannot collect values.
    #[error("flag cannot be multi-valued: {0}")]
    MultiValuedFlag(String),
}

/// Validates a command definition.
///
/// Checks for an empty command name, nameless or malformed options,
/// duplicate option names, duplicate argument indices and misplaced
/// multi-valued arguments. Short and long names share one namespace so that
/// a bare name given to [`CommandLine`](crate::CommandLine) lookups is never
/// ambiguous.
pub fn validate_command(command: &Command) -> Vec<DefinitionError> {
    let mut errors = Vec::new();

    if command.name.trim().is_empty() {
        errors.push(DefinitionError::EmptyCommandName);
        return errors;
    }

    errors.extend(validate_options(&command.options));
    if !errors.is_empty() {
        return errors;
    }

    errors.extend(validate_arguments(command));

    errors
}

fn validate_options(options: &[CliOption]) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for option in options {
        if option.short_name.is_none() && option.long_name.is_none() {
            errors.push(DefinitionError::MissingOptionName);
            return errors;
        }

        for name in [&option.short_name, &option.long_name].into_iter().flatten() {
            if !OPTION_NAME.is_match(name) {
                errors.push(DefinitionError::InvalidOptionName(name.clone()));
                return errors;
            }
            if !seen.insert(name.as_str()) {
                errors.push(DefinitionError::DuplicateOptionName(name.clone()));
                return errors;
            }
        }

        if option.flag && option.multi_valued {
            errors.push(DefinitionError::MultiValuedFlag(option.display_name()));
            return errors;
        }
    }

    errors
}

fn validate_arguments(command: &Command) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (index, _) in command.argument_indices() {
        if index > MAX_ARGUMENT_INDEX {
            errors.push(DefinitionError::ArgumentIndexOutOfRange(index));
            return errors;
        }
        if !seen.insert(index) {
            errors.push(DefinitionError::DuplicateArgumentIndex(index));
            return errors;
        }
    }

    let highest = seen.iter().copied().max();
    for (index, argument) in command.argument_indices() {
        if argument.multi_valued && Some(index) != highest {
            errors.push(DefinitionError::MultiValuedArgumentNotLast(index));
            return errors;
        }
    }

    errors
}
