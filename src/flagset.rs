use crate::error::FlagError;
use crate::value::{Flag, FlagType, TypedValue, Value};
use colored::Colorize;
use std::{collections::BTreeMap, fmt};

/// What a [`FlagSet`] does when setting a flag fails, from argv or from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorHandling {
    /// Return the error to the caller
    #[default]
    ContinueOnError,
    /// Print the error to stderr and exit with status 2
    ExitOnError,
    /// Panic with the error
    PanicOnError,
}

/// A single registered flag
pub struct FlagEntry {
    name: String,
    usage: String,
    default: String,
    value: Box<dyn Value>,
}

impl FlagEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value as it was rendered at registration time
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn value(&self) -> &dyn Value {
        self.value.as_ref()
    }

    pub fn info(&self) -> FlagInfo {
        FlagInfo {
            name: self.name.clone(),
            usage: self.usage.clone(),
            type_name: self.value.type_name().to_string(),
            default: self.default.clone(),
            current: self.value.current(),
        }
    }
}

impl fmt::Debug for FlagEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagEntry")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("current", &self.value.current())
            .finish()
    }
}

/// Snapshot of a flag, for listings and documentation
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlagInfo {
    pub name: String,
    pub usage: String,
    pub type_name: String,
    pub default: String,
    pub current: String,
}

/// A named collection of flags with a declared error handling policy
///
/// # Example
/// ```rust
/// use envflag::{ErrorHandling, FlagSet};
///
/// let mut fs = FlagSet::new("server", ErrorHandling::ContinueOnError);
/// let port = fs.define::<u16>("port", 8080, "Port to listen on");
///
/// fs.parse(["--port=9090"]).unwrap();
/// assert_eq!(port.get(), 9090);
/// ```
pub struct FlagSet {
    name: String,
    error_handling: ErrorHandling,
    flags: BTreeMap<String, FlagEntry>,
    args: Vec<String>,
    parsed: bool,
}

impl FlagSet {
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
        Self {
            name: name.into(),
            error_handling,
            flags: BTreeMap::new(),
            args: Vec::new(),
            parsed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Register a typed flag and return a handle to its value
    ///
    /// # Panics
    /// Panics if a flag with the same name is already registered.
    pub fn define<T: FlagType>(&mut self, name: &str, default: T, usage: &str) -> Flag<T> {
        let handle = Flag::new(default);
        self.var(name, usage, Box::new(TypedValue::new(handle.clone())));
        handle
    }

    /// Register a flag backed by a caller-supplied [`Value`]
    ///
    /// The value's current rendering becomes the flag's default.
    ///
    /// # Panics
    /// Panics if a flag with the same name is already registered.
    pub fn var(&mut self, name: &str, usage: &str, value: Box<dyn Value>) {
        if self.flags.contains_key(name) {
            if self.name.is_empty() {
                panic!("flag redefined: {}", name);
            }
            panic!("{} flag redefined: {}", self.name, name);
        }

        let entry = FlagEntry {
            name: name.to_string(),
            usage: usage.to_string(),
            default: value.current(),
            value,
        };
        self.flags.insert(name.to_string(), entry);
    }

    /// Iterate all flags in lexicographic name order
    pub fn iter(&self) -> impl Iterator<Item = &FlagEntry> {
        self.flags.values()
    }

    pub fn visit_all(&self, f: impl FnMut(&FlagEntry)) {
        self.iter().for_each(f);
    }

    pub fn lookup(&self, name: &str) -> Option<&FlagEntry> {
        self.flags.get(name)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Set a flag by name from its string form
    pub fn set(&self, name: &str, raw: &str) -> Result<(), FlagError> {
        let entry = self.lookup(name).ok_or_else(|| FlagError::UnknownFlag {
            name: name.to_string(),
        })?;

        entry
            .value
            .set(raw)
            .map_err(|reason| FlagError::InvalidArg {
                flag: name.to_string(),
                value: raw.to_string(),
                reason,
            })
    }

    pub fn info(&self) -> Vec<FlagInfo> {
        self.iter().map(FlagEntry::info).collect()
    }

    /// Whether [`parse`](Self::parse) has been called
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    /// Arguments left over after the last flag
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Parse flags from `args`, which must not include the program name
    ///
    /// Failures are handled according to the set's [`ErrorHandling`].
    pub fn parse<I, S>(&mut self, args: I) -> Result<(), FlagError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        let args: Vec<String> = args.into_iter().map(Into::into).collect();

        match self.parse_args(args) {
            Ok(rest) => {
                self.args = rest;
                Ok(())
            }
            Err(err) => self.handle_error(err, true),
        }
    }

    fn parse_args(&self, args: Vec<String>) -> Result<Vec<String>, FlagError> {
        let mut iter = args.into_iter();

        while let Some(arg) = iter.next() {
            if arg.len() < 2 || !arg.starts_with('-') {
                return Ok(std::iter::once(arg).chain(iter).collect());
            }

            let body = match arg.strip_prefix("--") {
                Some("") => return Ok(iter.collect()),
                Some(rest) => rest,
                None => &arg[1..],
            };
            if body.starts_with('-') || body.starts_with('=') {
                return Err(FlagError::BadSyntax { arg: arg.clone() });
            }

            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value.to_string())),
                None => (body, None),
            };

            let entry = match self.lookup(name) {
                Some(entry) => entry,
                None if name == "help" || name == "h" => return Err(FlagError::HelpRequested),
                None => {
                    return Err(FlagError::UnknownFlag {
                        name: name.to_string(),
                    })
                }
            };

            let value = match inline {
                Some(value) => value,
                None if entry.value.is_bool_flag() => "true".to_string(),
                None => iter.next().ok_or_else(|| FlagError::MissingValue {
                    flag: name.to_string(),
                })?,
            };

            self.set(name, &value)?;
        }

        Ok(Vec::new())
    }

    /// Act on `err` according to the set's policy
    ///
    /// Only returns under [`ErrorHandling::ContinueOnError`].
    pub(crate) fn handle_error(&self, err: FlagError, show_usage: bool) -> Result<(), FlagError> {
        match self.error_handling {
            ErrorHandling::ContinueOnError => Err(err),
            ErrorHandling::ExitOnError => {
                if err == FlagError::HelpRequested {
                    eprint!("{}", self.usage());
                    std::process::exit(0);
                }
                tracing::warn!(set = %self.name, error = %err, "exiting after flag error");
                eprintln!("{}", err);
                if show_usage {
                    eprint!("{}", self.usage());
                }
                std::process::exit(2);
            }
            ErrorHandling::PanicOnError => {
                tracing::warn!(set = %self.name, error = %err, "panicking after flag error");
                panic!("{}", err);
            }
        }
    }

    /// Render the flag listing shown on `-help` and after argv errors
    pub fn usage(&self) -> String {
        let mut out = if self.name.is_empty() {
            "Usage:\n".to_string()
        } else {
            format!("Usage of {}:\n", self.name.bold())
        };

        for entry in self.iter() {
            let value = entry.value();
            out.push_str(&format!("  {}", format!("-{}", entry.name).cyan()));
            if !value.is_bool_flag() {
                out.push_str(&format!(" {}", value.type_name()));
            }
            out.push_str(&format!("\n    \t{}", entry.usage));
            if !is_zero_default(value, &entry.default) {
                if value.type_name() == "string" {
                    out.push_str(&format!(" (default {:?})", entry.default));
                } else {
                    out.push_str(&format!(" (default {})", entry.default));
                }
            }
            out.push('\n');
        }

        out
    }
}

fn is_zero_default(value: &dyn Value, default: &str) -> bool {
    match value.type_name() {
        "bool" => default == "false",
        "int" | "uint" | "float" => default == "0",
        _ => default.is_empty(),
    }
}

impl fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name)
            .field("error_handling", &self.error_handling)
            .field("flags", &self.flags.keys().collect::<Vec<_>>())
            .field("parsed", &self.parsed)
            .finish()
    }
}
