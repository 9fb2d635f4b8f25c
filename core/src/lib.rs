//! Declarative command-line definitions, token parsing and usage rendering.
//!
//! This crate models a command's accepted interface and turns raw tokens
//! into structured results:
//!
//! - [`Command`]: a command definition with name, description, options and
//!   positional arguments.
//! - [`CliOption`]: a flag or value-bearing option with short and/or long
//!   names.
//! - [`Argument`]: a positional argument matched by index.
//! - [`Parser`]: matches tokens against a definition and produces a
//!   [`CommandLine`], enforcing required elements unless validation is
//!   disabled.
//! - [`usage`] / [`synopsis`]: render the synopsis line and the aligned
//!   "Options and Arguments" table.
//!
//! Definition consistency ([`validate_command`]) catches duplicate names,
//! duplicate indices and misplaced multi-valued arguments before parsing.
//! Definitions can also be loaded from YAML or JSON with [`Command::load`].
//!
//! # Example
//!
//! ```
//! use cmdline_core::*;
//!
//! let cmd = Command::new("test")
//!     .with_option(CliOption::flag(Some("f"), Some("flag")).with_description("turn on/off"))
//!     .with_option(CliOption::with_value(Some("x"), None))
//!     .with_argument(Argument::named("foo"));
//!
//! let line = cmd.parse(&["-f", "-x", "bar", "baz"]).unwrap();
//! assert!(line.is_flag_enabled("flag"));
//! assert_eq!(line.option_value("x"), Some("bar"));
//! assert_eq!(line.argument_value_by_name("foo"), Some("baz"));
//!
//! let err = cmd.parse(&["-f"]).unwrap_err();
//! assert!(matches!(err, ParseError::MissingValue(Missing::Argument(_))));
//!
//! assert!(cmd.usage_string().contains("Usage: test [-f] [-x <value>] foo"));
//! ```

mod command_line;
mod error;
mod loader;
mod parser;
mod types;
mod usage;
mod validate;

pub use command_line::{ArgumentSummary, CommandLine, ParseSummary};
pub use error::{LoadError, Missing, ParseError, Result};
pub use parser::Parser;
pub use types::*;
pub use usage::{synopsis, usage};
pub use validate::{DefinitionError, validate_command};
