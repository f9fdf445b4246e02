//! Command: print version information.

/// Version string, preferring the build-time `git describe` value.
#[must_use]
pub fn version() -> &'static str {
    option_env!("STORAGE_LINKER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the storage-linker version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("storage-linker {}", version());
}
