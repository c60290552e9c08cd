// Runtime helpers called from code generated by `define_flags!`.
// The macro itself lives in the envflag-macros crate.

use crate::flagset::FlagSet;

/// Register flags on the default set, releasing the lock before returning
#[doc(hidden)]
pub fn register_on_command_line<T>(register: impl FnOnce(&mut FlagSet) -> T) -> T {
    let mut flags = crate::command_line();
    register(&mut flags)
}
