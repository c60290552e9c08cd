use crate::env::{EnvSource, ProcessEnv};
use crate::error::FlagError;
use crate::flagset::FlagSet;
use std::path::Path;

/// Environment variable name for a flag
///
/// The name is `prefix-name` (or just `name` when `prefix` is empty), with
/// every `-` replaced by `_`, upper-cased.
///
/// ```rust
/// assert_eq!(envflag::env_key("my-app", "user-id"), "MY_APP_USER_ID");
/// assert_eq!(envflag::env_key("", "user-id"), "USER_ID");
/// ```
pub fn env_key(prefix: &str, name: &str) -> String {
    let base = if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}-{}", prefix, name)
    };

    base.replace('-', "_").to_uppercase()
}

/// Prefix derived from a program path: its base file name
pub fn prefix_from_program(argv0: &str) -> String {
    Path::new(argv0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Set every flag in `flags` that has a matching variable in `env`
///
/// Flags without a variable keep their current value. A variable holding an
/// empty string is set and is handed to the flag as-is. Stops at the first
/// value a flag rejects and returns it, regardless of the set's
/// [`ErrorHandling`](crate::ErrorHandling).
pub fn apply(prefix: &str, flags: &FlagSet, env: &impl EnvSource) -> Result<(), FlagError> {
    for entry in flags.iter() {
        let key = env_key(prefix, entry.name());

        let Some(raw) = env.get(&key) else {
            tracing::trace!(flag = entry.name(), key = %key, "no environment override");
            continue;
        };

        entry
            .value()
            .set(&raw)
            .map_err(|reason| FlagError::InvalidEnv {
                flag: entry.name().to_string(),
                key: key.clone(),
                value: raw.clone(),
                reason,
            })?;

        tracing::debug!(flag = entry.name(), key = %key, "flag set from environment");
    }

    Ok(())
}

/// Overlay `env` onto `flags`, handling failure per the set's policy
pub fn load_from(prefix: &str, flags: &FlagSet, env: &impl EnvSource) -> Result<(), FlagError> {
    match apply(prefix, flags, env) {
        Ok(()) => Ok(()),
        Err(err) => flags.handle_error(err, false),
    }
}

/// Overlay the process environment onto `flags`, handling failure per the set's policy
///
/// For a flag named `user-id` and prefix `count-users`, this reads
/// `COUNT_USERS_USER_ID`.
pub fn load(prefix: &str, flags: &FlagSet) -> Result<(), FlagError> {
    load_from(prefix, flags, &ProcessEnv)
}
