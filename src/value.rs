use std::{
    fmt,
    net::{IpAddr, SocketAddr},
    path::PathBuf,
    sync::{Arc, PoisonError, RwLock},
};

/// A mutable flag value that can be set from its string form
///
/// `set` takes `&self`: values live behind shared handles so the owning
/// [`FlagSet`](crate::FlagSet) and the program that registered the flag see
/// the same state.
pub trait Value: Send + Sync {
    /// Replace the current value by parsing `raw`. On failure the value is left untouched.
    fn set(&self, raw: &str) -> Result<(), String>;

    /// Render the current value
    fn current(&self) -> String;

    /// Short type name shown in usage output
    fn type_name(&self) -> &'static str {
        "value"
    }

    /// Boolean flags may appear on the command line without an explicit value
    fn is_bool_flag(&self) -> bool {
        false
    }
}

/// Scalar types that can back a flag
pub trait FlagType: Clone + Send + Sync + 'static {
    fn parse_flag(raw: &str) -> Result<Self, String>;

    fn format_flag(&self) -> String;

    fn type_name() -> &'static str;

    fn is_bool() -> bool {
        false
    }
}

macro_rules! from_str_flag_type {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl FlagType for $ty {
                fn parse_flag(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }

                fn format_flag(&self) -> String {
                    self.to_string()
                }

                fn type_name() -> &'static str {
                    $name
                }
            }
        )*
    };
}

from_str_flag_type! {
    String => "string",
    char => "char",
    i8 => "int", i16 => "int", i32 => "int", i64 => "int", i128 => "int", isize => "int",
    u8 => "uint", u16 => "uint", u32 => "uint", u64 => "uint", u128 => "uint", usize => "uint",
    f32 => "float", f64 => "float",
    IpAddr => "ip",
    SocketAddr => "addr",
}

impl FlagType for bool {
    fn parse_flag(raw: &str) -> Result<Self, String> {
        parse_bool(raw)
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }

    fn type_name() -> &'static str {
        "bool"
    }

    fn is_bool() -> bool {
        true
    }
}

impl FlagType for PathBuf {
    fn parse_flag(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn format_flag(&self) -> String {
        self.display().to_string()
    }

    fn type_name() -> &'static str {
        "path"
    }
}

/// Parse the boolean spellings accepted on the command line and in the environment
pub fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("'{}' is not a valid boolean", raw)),
    }
}

/// Shared handle to a registered flag's value
///
/// Cloning the handle is cheap and every clone observes later updates.
pub struct Flag<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Flag<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(value)),
        }
    }

    /// Borrow the current value for the duration of `f`
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub(crate) fn replace(&self, value: T) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

impl<T: Clone> Flag<T> {
    /// Clone of the current value
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T> Clone for Flag<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Flag<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with(|v| f.debug_tuple("Flag").field(v).finish())
    }
}

/// [`Value`] implementation backing every [`FlagType`]
pub(crate) struct TypedValue<T> {
    handle: Flag<T>,
}

impl<T: FlagType> TypedValue<T> {
    pub(crate) fn new(handle: Flag<T>) -> Self {
        Self { handle }
    }
}

impl<T: FlagType> Value for TypedValue<T> {
    fn set(&self, raw: &str) -> Result<(), String> {
        let parsed = T::parse_flag(raw)?;
        self.handle.replace(parsed);
        Ok(())
    }

    fn current(&self) -> String {
        self.handle.with(T::format_flag)
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn is_bool_flag(&self) -> bool {
        T::is_bool()
    }
}
