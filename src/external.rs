use crate::command::{CommandFactory, ExecutableCommand, Flow};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::{Context, Result};
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Command that is not a builtin: a program on disk run as a child process.
pub struct ExternalCommand {
    program: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(program: OsString, args: Vec<OsString>) -> Self {
        Self { program, args }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(&self, name: &str, args: &[&str]) -> Option<Box<dyn ExecutableCommand>> {
        let search_paths = env::var_os("PATH")?;
        let executable = resolve_program(&search_paths, Path::new(name))?;
        Some(Box::new(ExternalCommand::new(
            executable.into_os_string(),
            args.iter().map(|x| x.into()).collect(),
        )))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Spawns the program and blocks until it has terminated.
    ///
    /// The child inherits the shell's standard streams and environment and
    /// receives its argument data by value, so the caller may drop its own
    /// buffers as soon as this returns. The child's exit status does not
    /// influence the shell: the session continues whether the program
    /// succeeded, failed or died to a signal.
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        _stderr: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<Flow> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .current_dir(&env.current_dir)
            .spawn()
            .with_context(|| format!("failed to launch {}", self.program.to_string_lossy()))?;

        // wait() returns only once the child exited or was killed by a
        // signal; a merely stopped child keeps it blocking.
        let _ = child
            .wait()
            .with_context(|| format!("failed waiting for {}", self.program.to_string_lossy()))?;

        Ok(Flow::Continue)
    }
}

/// Resolve a program name the way an exec-style PATH lookup would.
///
/// Behavior:
/// - Absolute path: returned if it exists.
/// - `./`-prefixed or multi-component relative path (e.g. `bin/sh`):
///   returned if it exists relative to the current directory.
/// - Bare name (no separators): each directory in `search_paths` is tried in
///   order and the first executable regular file wins.
/// - Empty name: `None`.
pub fn resolve_program(search_paths: &OsStr, program: &Path) -> Option<PathBuf> {
    if program.is_absolute() {
        return program.exists().then(|| program.to_path_buf());
    }

    if program.starts_with("./") && program.exists() {
        return Some(program.to_path_buf());
    }

    let mut components = program.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(name), None) => find_in_path(search_paths, name.as_os_str()),
        _ => program.exists().then(|| program.to_path_buf()),
    }
}

fn find_in_path(search_paths: &OsStr, program: &OsStr) -> Option<PathBuf> {
    for dir in env::split_paths(search_paths) {
        let candidate = dir.join(program);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
