//! Definition types for declarative command-line interfaces.
//!
//! A [`Command`] aggregates the [`CliOption`]s and [`Argument`]s a command
//! accepts. Building a definition is pure data accumulation: no name checks
//! and no matching happen here. Consistency is checked by
//! [`validate_command`](crate::validate_command) and enforced when a
//! [`Parser`](crate::Parser) is created. All types serialize with [`serde`]
//! so definitions can live in YAML or JSON files.

use serde::{Deserialize, Serialize};

/// Placeholder used for option values and arguments without an explicit name.
pub const DEFAULT_ARG_NAME: &str = "value";

/// Highest index an argument may declare. Every index below the highest
/// declared one becomes a slot, so the cap bounds the slot list.
pub const MAX_ARGUMENT_INDEX: usize = 1024;

/// A named command-line option: either a boolean flag or a value-bearing
/// switch.
///
/// Names are stored without their leading dashes: a short name `"f"` matches
/// the token `-f`, a long name `"file"` matches `--file`.
///
/// # Examples
///
/// ```
/// use cmdline_core::CliOption;
///
/// let verbose = CliOption::flag(Some("v"), Some("verbose"))
///     .with_description("Enable verbose output");
/// assert!(verbose.flag);
/// assert!(verbose.matches("v"));
/// assert!(verbose.matches("--verbose"));
///
/// let output = CliOption::with_value(Some("o"), None).with_arg_name("file");
/// assert!(output.accepts_value());
/// assert_eq!(output.arg_label(), "file");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliOption {
    /// Short name without the dash (e.g. "f").
    pub short_name: Option<String>,
    /// Long name without the dashes (e.g. "file").
    pub long_name: Option<String>,
    /// Help table description.
    pub description: Option<String>,
    /// Placeholder shown for the value in usage output.
    pub arg_name: Option<String>,
    /// Whether the option must be present.
    pub required: bool,
    /// Boolean switch taking no value.
    pub flag: bool,
    /// Value reported when the option is not given.
    pub default_value: Option<String>,
    /// Excluded from usage output, still parsed.
    pub hidden: bool,
    /// Repeated occurrences accumulate instead of replacing each other.
    pub multi_valued: bool,
    /// Marks the option that requests help; its presence skips validation.
    pub help: bool,
    /// Allowed values. Empty means any value is accepted.
    pub choices: Vec<String>,
}

impl CliOption {
    /// Creates an empty value-bearing option with no names.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a boolean flag.
    pub fn flag(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short_name: short.map(String::from),
            long_name: long.map(String::from),
            flag: true,
            ..Self::default()
        }
    }

    /// Creates an option that consumes a value.
    pub fn with_value(short: Option<&str>, long: Option<&str>) -> Self {
        Self {
            short_name: short.map(String::from),
            long_name: long.map(String::from),
            ..Self::default()
        }
    }

    /// Sets the short name.
    pub fn with_short_name(mut self, name: &str) -> Self {
        self.short_name = Some(name.to_string());
        self
    }

    /// Sets the long name.
    pub fn with_long_name(mut self, name: &str) -> Self {
        self.long_name = Some(name.to_string());
        self
    }

    /// Adds a description.
    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// Sets the value placeholder used in usage output.
    pub fn with_arg_name(mut self, name: &str) -> Self {
        self.arg_name = Some(name.to_string());
        self
    }

    /// Sets the value used when the option is absent.
    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    /// Restricts accepted values.
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    /// Turns the option into a flag (`true`) or a value-bearing option.
    pub fn as_flag(mut self, flag: bool) -> Self {
        self.flag = flag;
        self
    }

    /// Marks this option as the help switch. Help options are flags.
    pub fn as_help(mut self) -> Self {
        self.help = true;
        self.flag = true;
        self
    }

    /// Whether the option consumes a value.
    pub fn accepts_value(&self) -> bool {
        !self.flag
    }

    /// Value placeholder, falling back to [`DEFAULT_ARG_NAME`].
    pub fn arg_label(&self) -> &str {
        self.arg_name.as_deref().unwrap_or(DEFAULT_ARG_NAME)
    }

    /// Returns the canonical name with dashes (long form preferred).
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::CliOption;
    ///
    /// assert_eq!(CliOption::flag(Some("f"), Some("force")).display_name(), "--force");
    /// assert_eq!(CliOption::flag(Some("f"), None).display_name(), "-f");
    /// ```
    pub fn display_name(&self) -> String {
        match (&self.short_name, &self.long_name) {
            (_, Some(long)) => format!("--{long}"),
            (Some(short), None) => format!("-{short}"),
            (None, None) => "<unnamed>".to_string(),
        }
    }

    /// Checks if `name` refers to this option.
    ///
    /// A bare name matches either the short or the long form, `-x` only the
    /// short form and `--xxx` only the long form.
    pub fn matches(&self, name: &str) -> bool {
        if let Some(long) = name.strip_prefix("--") {
            return self.long_name.as_deref() == Some(long);
        }
        if let Some(short) = name.strip_prefix('-') {
            return self.short_name.as_deref() == Some(short);
        }
        self.short_name.as_deref() == Some(name) || self.long_name.as_deref() == Some(name)
    }
}

/// A positional argument.
///
/// Arguments are matched by index in ascending order. An argument attached
/// through [`Command::with_argument`] without an index gets the next
/// declaration position.
///
/// # Examples
///
/// ```
/// use cmdline_core::Argument;
///
/// let src = Argument::named("source");
/// assert!(src.required);
/// assert_eq!(src.label(), "source");
///
/// let rest = Argument::new().required(false).multi_valued(true);
/// assert_eq!(rest.label(), "value");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Argument {
    /// Zero-based position among positional tokens.
    pub index: Option<usize>,
    /// Display label.
    pub arg_name: Option<String>,
    pub description: Option<String>,
    /// Defaults to `true`.
    pub required: bool,
    pub hidden: bool,
    /// Absorbs every remaining positional token. Only valid on the last index.
    pub multi_valued: bool,
    /// Value reported when no token was assigned.
    pub default_value: Option<String>,
}

impl Default for Argument {
    fn default() -> Self {
        Self {
            index: None,
            arg_name: None,
            description: None,
            required: true,
            hidden: false,
            multi_valued: false,
            default_value: None,
        }
    }
}

impl Argument {
    /// Creates a required, unnamed argument without an explicit index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a required argument with a display name.
    pub fn named(name: &str) -> Self {
        Self::new().with_name(name)
    }

    /// Creates a required argument at an explicit index.
    pub fn at(index: usize) -> Self {
        Self::new().with_index(index)
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.arg_name = Some(name.to_string());
        self
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn multi_valued(mut self, multi_valued: bool) -> Self {
        self.multi_valued = multi_valued;
        self
    }

    /// Display label, falling back to [`DEFAULT_ARG_NAME`].
    pub fn label(&self) -> &str {
        self.arg_name.as_deref().unwrap_or(DEFAULT_ARG_NAME)
    }
}

/// Complete definition of a command.
///
/// # Examples
///
/// ```
/// use cmdline_core::{Argument, CliOption, Command};
///
/// let cmd = Command::new("copy")
///     .with_description("Copy a file")
///     .with_option(CliOption::flag(Some("f"), Some("force")))
///     .with_argument(Argument::named("source"))
///     .with_argument(Argument::named("dest"));
///
/// assert_eq!(cmd.arguments[1].index, Some(1));
/// assert!(cmd.find_option("force").is_some());
/// assert!(cmd.find_option("-x").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    /// Name shown in the synopsis.
    pub name: String,
    /// Longer description rendered below the synopsis.
    pub description: Option<String>,
    /// One-line summary for command listings.
    pub summary: Option<String>,
    /// Options in declaration order.
    pub options: Vec<CliOption>,
    /// Arguments in declaration order (matched in index order).
    pub arguments: Vec<Argument>,
}

impl Command {
    /// Creates an empty command definition.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    /// Appends an option.
    pub fn with_option(mut self, option: CliOption) -> Self {
        self.options.push(option);
        self
    }

    /// Appends an argument, assigning the declaration position as its index
    /// when none is set.
    pub fn with_argument(mut self, mut argument: Argument) -> Self {
        if argument.index.is_none() {
            argument.index = Some(self.arguments.len());
        }
        self.arguments.push(argument);
        self
    }

    /// Finds an option by short or long name (see [`CliOption::matches`]).
    pub fn find_option(&self, name: &str) -> Option<&CliOption> {
        self.options.iter().find(|o| o.matches(name))
    }

    /// Effective index of each declared argument, in declaration order.
    ///
    /// Arguments without an explicit index (e.g. loaded from a definition
    /// file) take their declaration position.
    pub fn argument_indices(&self) -> impl Iterator<Item = (usize, &Argument)> {
        self.arguments
            .iter()
            .enumerate()
            .map(|(pos, arg)| (arg.index.unwrap_or(pos), arg))
    }

    /// Returns one argument per slot from index 0 up to the highest declared
    /// index, in ascending order.
    ///
    /// Undeclared indices are filled with a default (required, unnamed)
    /// argument so that they still consume a positional token and render a
    /// placeholder. Every returned argument has its `index` set. When two
    /// arguments share an index the first declared one wins. Arguments past
    /// [`MAX_ARGUMENT_INDEX`] are left out.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::{Argument, Command};
    ///
    /// let cmd = Command::new("test")
    ///     .with_argument(Argument::at(2).with_name("bar"))
    ///     .with_argument(Argument::at(0).with_name("foo"));
    ///
    /// let labels: Vec<String> = cmd
    ///     .ordered_arguments()
    ///     .iter()
    ///     .map(|a| a.label().to_string())
    ///     .collect();
    /// assert_eq!(labels, ["foo", "value", "bar"]);
    /// ```
    pub fn ordered_arguments(&self) -> Vec<Argument> {
        let mut declared: Vec<(usize, &Argument)> = self
            .argument_indices()
            .filter(|(index, _)| *index <= MAX_ARGUMENT_INDEX)
            .collect();
        // Stable sort keeps declaration order among equal indices.
        declared.sort_by_key(|(index, _)| *index);

        let mut slots: Vec<Argument> = Vec::with_capacity(declared.len());
        for (index, argument) in declared {
            if index < slots.len() {
                continue;
            }
            while slots.len() < index {
                slots.push(Argument::at(slots.len()));
            }
            slots.push(argument.clone().with_index(index));
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_flag_creation() {
        let option = CliOption::flag(Some("f"), Some("flag")).with_description("turn on/off");

        assert_eq!(option.short_name, Some("f".to_string()));
        assert_eq!(option.long_name, Some("flag".to_string()));
        assert!(option.flag);
        assert!(!option.accepts_value());
        assert_eq!(option.display_name(), "--flag");
    }

    #[test]
    fn test_option_matches_by_form() {
        let option = CliOption::with_value(Some("f"), Some("file"));

        assert!(option.matches("f"));
        assert!(option.matches("file"));
        assert!(option.matches("-f"));
        assert!(option.matches("--file"));
        assert!(!option.matches("--f"));
        assert!(!option.matches("-file"));
        assert!(!option.matches("x"));
    }

    #[test]
    fn test_help_option_is_flag() {
        let option = CliOption::new().with_long_name("help").as_help();
        assert!(option.help);
        assert!(option.flag);
    }

    #[test]
    fn test_argument_defaults_to_required() {
        let arg = Argument::new();
        assert!(arg.required);
        assert_eq!(arg.label(), DEFAULT_ARG_NAME);
        assert_eq!(arg.index, None);
    }

    #[test]
    fn test_with_argument_assigns_declaration_index() {
        let cmd = Command::new("test")
            .with_argument(Argument::named("a"))
            .with_argument(Argument::at(5).with_name("b"))
            .with_argument(Argument::named("c"));

        let indices: Vec<Option<usize>> = cmd.arguments.iter().map(|a| a.index).collect();
        assert_eq!(indices, vec![Some(0), Some(5), Some(2)]);
    }

    #[test]
    fn test_ordered_arguments_fills_gaps() {
        let cmd = Command::new("test")
            .with_argument(Argument::at(0).with_name("foo"))
            .with_argument(Argument::at(2).with_name("bar").hidden(true));

        let slots = cmd.ordered_arguments();
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[1].index, Some(1));
        assert_eq!(slots[1].arg_name, None);
        assert!(slots[1].required);
        assert!(slots[2].hidden);
    }

    #[test]
    fn test_ordered_arguments_uses_position_for_missing_index() {
        let cmd = Command {
            name: "test".to_string(),
            arguments: vec![Argument::named("first"), Argument::named("second")],
            ..Default::default()
        };

        let slots = cmd.ordered_arguments();
        assert_eq!(slots[0].label(), "first");
        assert_eq!(slots[1].index, Some(1));
    }

    #[test]
    fn test_ordered_arguments_first_declared_wins() {
        let cmd = Command::new("test")
            .with_argument(Argument::at(1).with_name("a"))
            .with_argument(Argument::at(1).with_name("b"));

        let slots = cmd.ordered_arguments();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].label(), "a");
    }

    #[test]
    fn test_ordered_arguments_large_gap() {
        let cmd = Command::new("test")
            .with_argument(Argument::at(0).with_name("first"))
            .with_argument(Argument::at(MAX_ARGUMENT_INDEX).with_name("last"));

        let slots = cmd.ordered_arguments();
        assert_eq!(slots.len(), MAX_ARGUMENT_INDEX + 1);
        assert_eq!(slots[MAX_ARGUMENT_INDEX].label(), "last");
        assert_eq!(slots[MAX_ARGUMENT_INDEX - 1].index, Some(MAX_ARGUMENT_INDEX - 1));
    }

    #[test]
    fn test_ordered_arguments_skips_index_past_cap() {
        let cmd = Command::new("test")
            .with_argument(Argument::at(0).with_name("first"))
            .with_argument(Argument::at(usize::MAX).with_name("huge"));

        let slots = cmd.ordered_arguments();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].label(), "first");
    }

    #[test]
    fn test_command_find_option() {
        let cmd = Command::new("test")
            .with_option(CliOption::flag(Some("f"), None))
            .with_option(CliOption::with_value(None, Some("output")));

        assert!(cmd.find_option("f").is_some());
        assert!(cmd.find_option("--output").is_some());
        assert!(cmd.find_option("o").is_none());
    }

    #[test]
    fn test_argument_deserializes_required_by_default() {
        let arg: Argument = serde_json::from_str(r#"{"arg_name": "foo"}"#).unwrap();
        assert!(arg.required);
        assert_eq!(arg.label(), "foo");
    }
}
