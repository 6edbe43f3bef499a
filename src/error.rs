//! Error types for the tabwise command toolkit and completion engine.

use thiserror::Error;

/// Wiring errors surfaced when the embedding application registers
/// completion functions. Resolution never produces these.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Flag '{flag}' is not declared on command '{command}'")]
    FlagNotFound { command: String, flag: String },

    #[error("Flag '{flag}' on command '{command}' already has a completion function")]
    DuplicateFlagCompletion { command: String, flag: String },

    #[error("Unknown command id: {0}")]
    UnknownCommand(usize),
}

/// Positional-argument validation failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("unknown command \"{arg}\" for \"{command}\"")]
    UnknownCommand { command: String, arg: String },

    #[error("\"{command}\" accepts no arguments, received {received}")]
    NoArgs { command: String, received: usize },

    #[error("requires at least {min} arg(s), only received {received}")]
    TooFew { min: usize, received: usize },

    #[error("accepts at most {max} arg(s), received {received}")]
    TooMany { max: usize, received: usize },

    #[error("accepts {expected} arg(s), received {received}")]
    WrongCount { expected: usize, received: usize },

    #[error("accepts between {min} and {max} arg(s), received {received}")]
    OutOfRange {
        min: usize,
        max: usize,
        received: usize,
    },

    #[error("invalid argument \"{arg}\" for \"{command}\"")]
    InvalidArg { command: String, arg: String },

    #[error("{0}")]
    Custom(String),
}

/// Flag parsing failures (strict mode only; completion parsing is lenient)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("unknown shorthand flag: '{0}'")]
    UnknownShorthand(char),

    #[error("flag needs an argument: {0}")]
    MissingValue(String),

    #[error("flag {flag} does not take a value (got \"{value}\")")]
    UnexpectedValue { flag: String, value: String },

    #[error("invalid value \"{value}\" for flag {flag}: expected one of {choices}")]
    InvalidChoice {
        flag: String,
        value: String,
        choices: String,
    },
}

/// Top-level error for command execution
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Flag error: {0}")]
    Flag(#[from] FlagError),

    #[error("Argument error: {0}")]
    Args(#[from] ArgsError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Command \"{0}\" is not runnable; a subcommand is required")]
    NotRunnable(String),

    #[error("Command \"{command}\" failed: {source}")]
    Handler {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
