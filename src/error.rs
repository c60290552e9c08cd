use colored::Colorize;
use std::fmt;

/// Errors that can occur while overlaying the environment or parsing flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// An environment variable was found but the flag rejected its value
    InvalidEnv {
        flag: String,
        key: String,
        value: String,
        reason: String,
    },
    /// A command-line argument carried a value the flag rejected
    InvalidArg {
        flag: String,
        value: String,
        reason: String,
    },
    /// A command-line argument named a flag that was never defined
    UnknownFlag { name: String },
    /// A non-boolean flag appeared last on the command line without a value
    MissingValue { flag: String },
    /// A command-line argument looked like a flag but was malformed (`---x`, `-=x`)
    BadSyntax { arg: String },
    /// `-h`, `-help` or `--help` was given and no such flag is defined
    HelpRequested,
}

impl FlagError {
    /// Name of the flag involved, if any
    pub fn flag(&self) -> Option<&str> {
        match self {
            FlagError::InvalidEnv { flag, .. }
            | FlagError::InvalidArg { flag, .. }
            | FlagError::MissingValue { flag } => Some(flag),
            FlagError::UnknownFlag { name } => Some(name),
            FlagError::BadSyntax { .. } | FlagError::HelpRequested => None,
        }
    }

    /// The setter's own explanation for an invalid value
    pub fn reason(&self) -> Option<&str> {
        match self {
            FlagError::InvalidEnv { reason, .. } | FlagError::InvalidArg { reason, .. } => {
                Some(reason)
            }
            _ => None,
        }
    }
}

impl fmt::Display for FlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagError::InvalidEnv {
                flag,
                key,
                value,
                reason,
            } => write!(
                f,
                "{}: Invalid value {} for flag -{}: {}",
                key.magenta().bold(),
                format!("'{}'", value).red(),
                flag,
                reason
            ),
            FlagError::InvalidArg {
                flag,
                value,
                reason,
            } => write!(
                f,
                "Invalid value {} for flag {}: {}",
                format!("'{}'", value).red(),
                format!("-{}", flag).magenta().bold(),
                reason
            ),
            FlagError::UnknownFlag { name } => write!(
                f,
                "Flag provided but not defined: {}",
                format!("-{}", name).magenta().bold()
            ),
            FlagError::MissingValue { flag } => write!(
                f,
                "Flag needs an argument: {}",
                format!("-{}", flag).magenta().bold()
            ),
            FlagError::BadSyntax { arg } => {
                write!(f, "Bad flag syntax: {}", arg.red())
            }
            FlagError::HelpRequested => write!(f, "help requested"),
        }
    }
}

impl std::error::Error for FlagError {}
