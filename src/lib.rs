pub mod env;
pub mod error;
pub mod flagset;
pub mod macros;
pub mod overlay;
pub mod value;

use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard, PoisonError};

// Re-export main types
pub use env::{DotenvEnv, EnvSource, MapEnv, ProcessEnv};
pub use error::FlagError;
pub use flagset::{ErrorHandling, FlagEntry, FlagInfo, FlagSet};
pub use overlay::{apply, env_key, load, load_from, prefix_from_program};
pub use value::{Flag, FlagType, Value};

// Re-export macro
pub use envflag_macros::define_flags;

static COMMAND_LINE: Lazy<Mutex<FlagSet>> = Lazy::new(|| {
    let program = std::env::args_os()
        .next()
        .map(|argv0| prefix_from_program(&argv0.to_string_lossy()))
        .unwrap_or_default();
    Mutex::new(FlagSet::new(program, ErrorHandling::ExitOnError))
});

/// The process-wide default flag set
///
/// It is named after the program and exits with status 2 on errors.
/// Hold the guard only as long as needed: [`parse`] locks it too.
pub fn command_line() -> MutexGuard<'static, FlagSet> {
    COMMAND_LINE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Overlay the environment onto [`command_line`], then parse the process arguments
///
/// Variables are prefixed with the base name of the program, so a flag `foo`
/// of `/usr/local/bin/myprog` is read from `MYPROG_FOO`. Command-line flags
/// are parsed afterwards and win over the environment.
pub fn parse() {
    let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
    parse_from(args, &ProcessEnv);
}

/// Same as [`parse`] with explicit arguments (including the program name) and variables
pub fn parse_from<I, S>(args: I, env: &impl EnvSource)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::<String>::into);
    let prefix = args
        .next()
        .map(|argv0| prefix_from_program(&argv0))
        .unwrap_or_default();

    let mut flags = command_line();
    // The default set exits on any failure, so neither call returns an error.
    if load_from(&prefix, &flags, env).is_ok() {
        let _ = flags.parse(args);
    }
}
