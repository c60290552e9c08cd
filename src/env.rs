//! Sources of environment variables for the overlay.
//!
//! The overlay only ever reads through [`EnvSource`], so tests and embedders
//! can supply their own variables without touching the process environment.

use std::{collections::HashMap, path::Path};

/// Read-only lookup of environment variables by name
pub trait EnvSource {
    /// `None` means the variable is unset. An empty string is a set variable.
    fn get(&self, key: &str) -> Option<String>;
}

impl<E: EnvSource + ?Sized> EnvSource for &E {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// The real process environment
///
/// Values that are not valid UTF-8 are decoded lossily.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
    }
}

/// An in-memory set of variables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapEnv {
    vars: HashMap<String, String>,
}

impl MapEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a variable, builder style
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnv {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl EnvSource for MapEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Variables from a dotenv file, underneath the process environment
///
/// The file is read once and never exported into the process. Lookups check
/// the process environment first, so a variable that is already set always
/// wins over the file.
#[derive(Debug, Clone, Default)]
pub struct DotenvEnv {
    file: MapEnv,
}

impl DotenvEnv {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, dotenvy::Error> {
        let path = path.as_ref();
        let file = dotenvy::from_path_iter(path)?.collect::<Result<MapEnv, _>>()?;
        tracing::debug!(path = %path.display(), vars = file.len(), "read dotenv file");
        Ok(Self { file })
    }

    /// Read `.env` from the current directory or its nearest ancestor
    pub fn discover() -> Result<Self, dotenvy::Error> {
        let file = dotenvy::dotenv_iter()?.collect::<Result<MapEnv, _>>()?;
        tracing::debug!(vars = file.len(), "read discovered dotenv file");
        Ok(Self { file })
    }

    /// Variables read from the file, ignoring the process environment
    pub fn file_vars(&self) -> &MapEnv {
        &self.file
    }
}

impl EnvSource for DotenvEnv {
    fn get(&self, key: &str) -> Option<String> {
        ProcessEnv.get(key).or_else(|| self.file.get(key))
    }
}
