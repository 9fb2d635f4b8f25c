//! Parse results.
//!
//! A [`CommandLine`] is produced by [`Parser`](crate::Parser) and borrows the
//! [`Command`] it was parsed against. Option lookups accept either the short
//! or the long name of an option; both resolve to the same captured values.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::{Argument, Command};

/// Structured result of a single parse.
#[derive(Debug, Clone)]
pub struct CommandLine<'c> {
    command: &'c Command,
    slots: Vec<Argument>,
    option_values: HashMap<usize, Vec<String>>,
    flags: HashSet<usize>,
    seen: HashSet<usize>,
    argument_values: BTreeMap<usize, Vec<String>>,
    valid: bool,
}

impl<'c> CommandLine<'c> {
    pub(crate) fn new(command: &'c Command, slots: Vec<Argument>) -> Self {
        Self {
            command,
            slots,
            option_values: HashMap::new(),
            flags: HashSet::new(),
            seen: HashSet::new(),
            argument_values: BTreeMap::new(),
            valid: false,
        }
    }

    pub(crate) fn mark_seen(&mut self, option: usize) {
        self.seen.insert(option);
    }

    pub(crate) fn enable_flag(&mut self, option: usize) {
        self.flags.insert(option);
    }

    pub(crate) fn push_option_value(&mut self, option: usize, value: &str) {
        self.option_values
            .entry(option)
            .or_default()
            .push(value.to_string());
    }

    pub(crate) fn push_argument_value(&mut self, index: usize, value: &str) {
        self.argument_values
            .entry(index)
            .or_default()
            .push(value.to_string());
    }

    pub(crate) fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }

    pub(crate) fn captured_option_values(&self, option: usize) -> &[String] {
        self.option_values
            .get(&option)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn option_seen(&self, option: usize) -> bool {
        self.seen.contains(&option)
    }

    pub(crate) fn flag_set(&self, option: usize) -> bool {
        self.flags.contains(&option)
    }

    pub(crate) fn slots(&self) -> &[Argument] {
        &self.slots
    }

    fn option_position(&self, name: &str) -> Option<usize> {
        self.command.options.iter().position(|o| o.matches(name))
    }

    fn argument_position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|a| a.label() == name)
    }
}

impl<'c> CommandLine<'c> {
    /// The definition this result was parsed against.
    pub fn command(&self) -> &'c Command {
        self.command
    }

    /// Whether the result passed validation.
    ///
    /// When validation was disabled this still reports whether every
    /// required option and argument received a value.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Whether the flag `name` appeared in the tokens.
    pub fn is_flag_enabled(&self, name: &str) -> bool {
        self.option_position(name)
            .is_some_and(|pos| self.flags.contains(&pos))
    }

    /// Value of the option `name`, falling back to its default value.
    ///
    /// For an option given several times this is the last value.
    pub fn option_value(&self, name: &str) -> Option<&str> {
        let pos = self.option_position(name)?;
        self.captured_option_values(pos)
            .last()
            .map(String::as_str)
            .or(self.command.options[pos].default_value.as_deref())
    }

    /// All values of the option `name` in token order, or its default.
    pub fn option_values(&self, name: &str) -> Vec<&str> {
        let Some(pos) = self.option_position(name) else {
            return Vec::new();
        };
        let captured = self.captured_option_values(pos);
        if captured.is_empty() {
            return self.command.options[pos]
                .default_value
                .as_deref()
                .into_iter()
                .collect();
        }
        captured.iter().map(String::as_str).collect()
    }

    /// Whether the option received a value or, for a flag, was enabled.
    ///
    /// Default values do not count as assigned.
    pub fn is_option_assigned(&self, name: &str) -> bool {
        self.option_position(name).is_some_and(|pos| {
            self.flags.contains(&pos) || !self.captured_option_values(pos).is_empty()
        })
    }

    /// Whether an option marker for `name` appeared in the tokens, even
    /// without a value.
    pub fn is_seen_in_command_line(&self, name: &str) -> bool {
        self.option_position(name)
            .is_some_and(|pos| self.seen.contains(&pos))
    }

    /// Whether a help option was given.
    pub fn is_asking_for_help(&self) -> bool {
        self.command
            .options
            .iter()
            .enumerate()
            .any(|(pos, option)| option.help && self.flags.contains(&pos))
    }

    /// Value assigned to the argument at `index`, falling back to its
    /// default value.
    ///
    /// For a multi-valued argument this is the first value.
    pub fn argument_value(&self, index: usize) -> Option<&str> {
        self.argument_values
            .get(&index)
            .and_then(|values| values.first())
            .map(String::as_str)
            .or_else(|| self.slots.get(index)?.default_value.as_deref())
    }

    /// Value of the first argument labelled `name`.
    pub fn argument_value_by_name(&self, name: &str) -> Option<&str> {
        self.argument_value(self.argument_position(name)?)
    }

    /// All values assigned to the argument at `index`, or its default.
    pub fn argument_values(&self, index: usize) -> Vec<&str> {
        match self.argument_values.get(&index) {
            Some(values) => values.iter().map(String::as_str).collect(),
            None => self
                .slots
                .get(index)
                .and_then(|slot| slot.default_value.as_deref())
                .into_iter()
                .collect(),
        }
    }

    /// Whether a positional token was assigned to the argument at `index`.
    pub fn is_argument_assigned(&self, index: usize) -> bool {
        self.argument_values.contains_key(&index)
    }

    /// Builds a serializable snapshot of the result.
    pub fn to_summary(&self) -> ParseSummary {
        let mut flags = BTreeMap::new();
        let mut options = BTreeMap::new();
        for option in &self.command.options {
            let key = option.display_name();
            if option.flag {
                let enabled = self.is_flag_enabled(&key);
                flags.insert(key, enabled);
            } else {
                let values = self.option_values(&key);
                if !values.is_empty() {
                    options.insert(key, values.into_iter().map(String::from).collect());
                }
            }
        }

        let arguments = self
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| ArgumentSummary {
                index,
                name: slot.label().to_string(),
                values: self
                    .argument_values(index)
                    .into_iter()
                    .map(String::from)
                    .collect(),
            })
            .collect();

        ParseSummary {
            command: self.command.name.clone(),
            valid: self.valid,
            help: self.is_asking_for_help(),
            flags,
            options,
            arguments,
        }
    }
}

/// Serializable view of a [`CommandLine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseSummary {
    pub command: String,
    pub valid: bool,
    pub help: bool,
    /// Flag state keyed by display name (`--long` or `-s`).
    pub flags: BTreeMap<String, bool>,
    /// Values of value-bearing options that have a value or a default.
    pub options: BTreeMap<String, Vec<String>>,
    pub arguments: Vec<ArgumentSummary>,
}

/// Values assigned to one argument slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentSummary {
    pub index: usize,
    pub name: String,
    pub values: Vec<String>,
}
