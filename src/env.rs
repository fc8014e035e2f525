use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, per-session view of the process state the interpreter threads
/// through every command.
///
/// Today that is just the working directory: `cd` is the only command that
/// changes it, and every launched child inherits it at spawn time.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The working directory commands run in. Mirrors the process-wide
    /// working directory; the `cd` built-in keeps the two in sync.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    pub fn new() -> Self {
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { current_dir }
    }
}
