//! Usage rendering.
//!
//! Produces a synopsis line and an aligned two-column help table from a
//! [`Command`] definition:
//!
//! ```text
//! Usage: test -f <value> [-v] foo [bar]
//!
//! Copies things.
//!
//! Options and Arguments:
//!  -f,--file <value>   a file
//!  -v                  verbose
//!  <foo>               foo
//!  <bar>               bar
//! ```
//!
//! Hidden options and arguments are left out of both parts and out of the
//! column width computation.

use tracing::debug;

use crate::{Argument, CliOption, Command};

const USAGE_PREFIX: &str = "Usage: ";
const OPTIONS_AND_ARGUMENTS: &str = "Options and Arguments:";
/// Spaces before the left column.
const LEFT_PAD: usize = 1;
/// Spaces between the padded left column and the description.
const DESCRIPTION_PAD: usize = 3;

/// Appends the full usage text for `command` to `out`.
///
/// # Examples
///
/// ```
/// use cmdline_core::{CliOption, Command};
///
/// let cmd = Command::new("test").with_option(
///     CliOption::flag(Some("f"), Some("flag")).with_description("turn on/off"),
/// );
///
/// let mut out = String::new();
/// cmdline_core::usage(&cmd, &mut out);
/// assert!(out.contains("Usage: test [-f]"));
/// assert!(out.contains("Options and Arguments:"));
/// assert!(out.contains(" -f,--flag   turn on/off"));
/// ```
pub fn usage(command: &Command, out: &mut String) {
    out.push_str(USAGE_PREFIX);
    out.push_str(&synopsis(command));
    out.push('\n');

    if let Some(description) = command.description.as_deref() {
        if !description.trim().is_empty() {
            out.push('\n');
            out.push_str(description.trim_end());
            out.push('\n');
        }
    }

    let rows = help_rows(command);
    if rows.is_empty() {
        return;
    }

    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    debug!(command = %command.name, rows = rows.len(), width, "rendering help table");

    out.push('\n');
    out.push_str(OPTIONS_AND_ARGUMENTS);
    out.push('\n');
    for (left, description) in rows {
        let row = format!(
            "{:lpad$}{:width$}{:dpad$}{}",
            "",
            left,
            "",
            description,
            lpad = LEFT_PAD,
            width = width,
            dpad = DESCRIPTION_PAD,
        );
        out.push_str(row.trim_end());
        out.push('\n');
    }
}

/// Builds the synopsis line: the command name followed by every visible
/// option (declaration order) and argument (index order).
///
/// Optional elements are bracketed, required ones are not.
///
/// # Examples
///
/// ```
/// use cmdline_core::{Argument, CliOption, Command};
///
/// let cmd = Command::new("test")
///     .with_option(CliOption::with_value(Some("f"), Some("file")).required(true))
///     .with_argument(Argument::at(0).with_name("foo"))
///     .with_argument(Argument::at(1))
///     .with_argument(Argument::at(2).with_name("bar").hidden(true));
///
/// assert_eq!(cmdline_core::synopsis(&cmd), "test -f <value> foo value");
/// ```
pub fn synopsis(command: &Command) -> String {
    let mut line = command.name.clone();

    for option in command.options.iter().filter(|o| !o.hidden) {
        line.push(' ');
        line.push_str(&synopsis_option(option));
    }

    for argument in command.ordered_arguments().iter().filter(|a| !a.hidden) {
        line.push(' ');
        line.push_str(&synopsis_argument(argument));
    }

    line
}

fn synopsis_option(option: &CliOption) -> String {
    let mut out = String::new();
    if !option.required {
        out.push('[');
    }

    match (&option.short_name, &option.long_name) {
        (Some(short), _) => out.push_str(&format!("-{short}")),
        (None, Some(long)) => out.push_str(&format!("--{long}")),
        (None, None) => {}
    }

    if option.accepts_value() {
        if option.choices.is_empty() {
            out.push_str(&format!(" <{}>", option.arg_label()));
        } else {
            out.push_str(&format!(" {{{}}}", option.choices.join(", ")));
        }
    }

    if !option.required {
        out.push(']');
    }
    out
}

fn synopsis_argument(argument: &Argument) -> String {
    let mut out = argument.label().to_string();
    if argument.multi_valued {
        out.push_str("...");
    }
    if argument.required {
        out
    } else {
        format!("[{out}]")
    }
}

/// Left column and description of every visible option, then every visible
/// argument.
fn help_rows(command: &Command) -> Vec<(String, String)> {
    let options = command
        .options
        .iter()
        .filter(|o| !o.hidden)
        .map(|o| (option_left(o), o.description.clone().unwrap_or_default()));

    let arguments = command
        .ordered_arguments()
        .into_iter()
        .filter(|a| !a.hidden)
        .map(|a| (format!("<{}>", a.label()), a.description.unwrap_or_default()));

    options.chain(arguments).collect()
}

fn option_left(option: &CliOption) -> String {
    let mut out = match (&option.short_name, &option.long_name) {
        (Some(short), Some(long)) => format!("-{short},--{long}"),
        (Some(short), None) => format!("-{short}"),
        (None, Some(long)) => format!("--{long}"),
        (None, None) => String::new(),
    };
    if option.accepts_value() {
        out.push_str(&format!(" <{}>", option.arg_label()));
    }
    out
}

impl Command {
    /// Appends the usage text to `out`. See [`usage`].
    pub fn usage(&self, out: &mut String) {
        usage(self, out);
    }

    /// Returns the usage text as a new string.
    pub fn usage_string(&self) -> String {
        let mut out = String::new();
        usage(self, &mut out);
        out
    }
}
