//! Definition files.
//!
//! A [`Command`] can be declared in YAML or JSON. Every field is optional,
//! arguments default to required, and argument indices default to their
//! declaration position.
//!
//! # Example YAML
//!
//! ```yaml
//! name: copy
//! description: Copy a file.
//! options:
//!   - short_name: f
//!     long_name: force
//!     flag: true
//!     description: overwrite existing files
//!   - long_name: mode
//!     arg_name: octal
//!     default_value: "644"
//! arguments:
//!   - arg_name: source
//!   - arg_name: dest
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::{Command, validate_command};

impl Command {
    /// Loads a definition from a file and checks it.
    ///
    /// Files ending in `.yml` or `.yaml` are read as YAML, anything else as
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::LoadError::Io) if the file cannot be read,
    /// [`Yaml`](crate::LoadError::Yaml) / [`Json`](crate::LoadError::Json)
    /// if parsing fails, or [`Invalid`](crate::LoadError::Invalid) if the
    /// definition is inconsistent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        ensure_consistent(Self::read(path)?)
    }

    /// Reads a definition from a file without checking it.
    ///
    /// Use [`validate_command`] on the result to list its problems.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = BufReader::new(std::fs::File::open(path)?);
        let command: Command = if is_yaml(path) {
            serde_yaml::from_reader(reader)?
        } else {
            serde_json::from_reader(reader)?
        };
        debug!(path = %path.display(), command = %command.name, "read command definition");
        Ok(command)
    }

    /// Parses a YAML definition.
    ///
    /// # Examples
    ///
    /// ```
    /// use cmdline_core::Command;
    ///
    /// let cmd = Command::from_yaml_str("name: test\narguments:\n  - arg_name: foo\n").unwrap();
    /// assert_eq!(cmd.name, "test");
    /// assert!(cmd.arguments[0].required);
    /// ```
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        ensure_consistent(serde_yaml::from_str(raw)?)
    }

    /// Parses a JSON definition.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        ensure_consistent(serde_json::from_str(raw)?)
    }

    /// Saves the definition, as YAML or JSON depending on the extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(std::fs::File::create(path)?);
        if is_yaml(path) {
            serde_yaml::to_writer(writer, self)?;
        } else {
            serde_json::to_writer_pretty(writer, self)?;
        }
        Ok(())
    }
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
}

fn ensure_consistent(command: Command) -> Result<Command> {
    match validate_command(&command).into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(command),
    }
}
