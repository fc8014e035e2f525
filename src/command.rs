use crate::env::Environment;
use anyhow::Result;
use std::io::Write;

/// Signal every executed command hands back to the interpreter loop.
///
/// This is the shell's only piece of cross-call control state: `exit` is the
/// sole producer of [`Flow::Exit`], everything else keeps the session going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading and executing commands.
    Continue,
    /// Stop the interactive loop; the shell process then ends normally.
    Exit,
}

/// Object-safe trait for anything the shell can run.
///
/// Implemented by built-ins via a blanket impl and by external commands.
pub trait ExecutableCommand {
    /// Executes the command.
    ///
    /// `stdout` receives regular output and `stderr` receives diagnostics.
    /// A returned error means the command could not run at all; the
    /// interpreter reports it and keeps the session alive.
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Flow>;
}

/// Factory that tries to create a command from a name and its arguments.
///
/// Returns `None` when the factory doesn't recognize the `name`. The
/// interpreter queries its factories in a fixed order, so the first factory
/// claiming a name wins.
pub trait CommandFactory {
    /// Attempt to create a command instance for the provided name and arguments.
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>>;
}
