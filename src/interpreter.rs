use crate::builtin::{Cd, Exit, Help};
use crate::command::{CommandFactory, Flow};
use crate::env::Environment;
use crate::external::ExternalCommand;
use crate::lexer;
use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, Write};
use std::marker::PhantomData;

/// Prompt printed before every command line.
const PROMPT: &str = "> ";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — BuiltinCommand and
/// ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

/// A minimal interactive shell: it reads a line, splits it into
/// whitespace-separated arguments and either runs a built-in in-process or
/// launches an external program and waits for it to terminate.
///
/// The interpreter holds an [`Environment`] and an ordered list of
/// [`CommandFactory`] objects that are queried to create commands by name;
/// the first factory claiming a name wins. See [`Default`] for the set
/// installed out of the box.
///
/// Example
/// ```
/// use minish::{Flow, Interpreter};
///
/// let mut sh = Interpreter::default();
/// assert_eq!(sh.execute(&[]), Flow::Continue);
/// assert_eq!(sh.execute(&["exit"]), Flow::Exit);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// Execute a single, already-tokenized command line.
    ///
    /// An empty `argv` is a no-op. Every failure below this point is
    /// reported on the shell's standard error and the session continues;
    /// only the `exit` built-in produces [`Flow::Exit`].
    pub fn execute(&mut self, argv: &[&str]) -> Flow {
        self.execute_with_io(argv, &mut io::stdout(), &mut io::stderr())
    }

    fn execute_with_io(
        &mut self,
        argv: &[&str],
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Flow {
        let Some((name, args)) = argv.split_first() else {
            return Flow::Continue;
        };
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(name, args) {
                return match cmd.execute(stdout, stderr, &mut self.env) {
                    Ok(flow) => flow,
                    Err(e) => {
                        let _ = writeln!(stderr, "minish: {e:#}");
                        Flow::Continue
                    }
                };
            }
        }
        let _ = writeln!(stderr, "minish: command not found: {name}");
        Flow::Continue
    }

    /// The interactive read-tokenize-dispatch loop.
    ///
    /// Returns `Ok(())` when the user ends the session, either with the
    /// `exit` built-in or by closing standard input. A genuine read error is
    /// the only error this returns; the caller is expected to let it end the
    /// process with a failure status.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new().context("failed to initialize line editor")?;
        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let _ = rl.add_history_entry(line.as_str());
                    let args = lexer::split_into_args(&line);
                    if self.execute(&args) == Flow::Exit {
                        return Ok(());
                    }
                }
                // ^C drops the pending line; the session goes on.
                Err(ReadlineError::Interrupted) => continue,
                // ^D: end of input is the normal way to quit.
                Err(ReadlineError::Eof) => return Ok(()),
                Err(err) => return Err(err).context("failed to read command line"),
            }
        }
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the standard command set: the `cd`,
    /// `help` and `exit` built-ins, then the external-program launcher as
    /// the fallback for every other name.
    fn default() -> Self {
        Self::new(vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BUILTINS;
    use crate::env::test_support::lock_current_dir;

    #[test]
    fn test_empty_command_line_is_a_no_op() {
        let mut sh = Interpreter::default();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        let flow = sh.execute_with_io(&[], &mut out, &mut err);

        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[test]
    fn test_exit_stops_the_loop() {
        let mut sh = Interpreter::default();
        assert_eq!(sh.execute(&["exit"]), Flow::Exit);
    }

    #[test]
    fn test_unknown_command_is_reported_and_the_loop_continues() {
        let mut sh = Interpreter::default();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        let flow = sh.execute_with_io(&["minish-no-such-program", "-x"], &mut out, &mut err);

        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        let diagnostic = String::from_utf8_lossy(&err);
        assert!(diagnostic.contains("command not found"));
        assert!(diagnostic.contains("minish-no-such-program"));
    }

    #[test]
    fn test_session_survives_a_failed_command() {
        let mut sh = Interpreter::default();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        assert_eq!(
            sh.execute_with_io(&["minish-no-such-program"], &mut out, &mut err),
            Flow::Continue
        );
        err.clear();
        assert_eq!(sh.execute_with_io(&["exit"], &mut out, &mut err), Flow::Exit);
        assert!(err.is_empty());
    }

    #[test]
    fn test_builtins_shadow_external_programs() {
        let mut sh = Interpreter::default();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        // `cd` must be claimed by the builtin (whose usage error lands on
        // stderr), never resolved on PATH.
        let flow = sh.execute_with_io(&["cd"], &mut out, &mut err);

        assert_eq!(flow, Flow::Continue);
        assert!(out.is_empty());
        assert!(!err.is_empty());
    }

    #[test]
    fn test_help_is_dispatched_as_a_builtin() {
        let mut sh = Interpreter::default();
        let mut out: Vec<u8> = Vec::new();
        let mut err: Vec<u8> = Vec::new();

        let flow = sh.execute_with_io(&["help"], &mut out, &mut err);

        assert_eq!(flow, Flow::Continue);
        assert!(err.is_empty());
        let text = String::from_utf8_lossy(&out);
        for name in BUILTINS {
            assert!(text.contains(name));
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_external_command_runs_and_the_loop_continues() {
        let _lock = lock_current_dir();
        let mut sh = Interpreter::default();

        // A nonzero child exit status never stops the shell.
        assert_eq!(sh.execute(&["sh", "-c", "exit 1"]), Flow::Continue);
    }

    #[test]
    fn test_builtin_name_table_aligns_with_registry_order() {
        let factories: Vec<Box<dyn CommandFactory>> = vec![
            Box::new(Factory::<Cd>::default()),
            Box::new(Factory::<Help>::default()),
            Box::new(Factory::<Exit>::default()),
        ];

        assert_eq!(factories.len(), BUILTINS.len());
        for (i, name) in BUILTINS.iter().enumerate() {
            for (j, factory) in factories.iter().enumerate() {
                assert_eq!(
                    factory.try_create(name, &["arg"]).is_some(),
                    i == j,
                    "{name} must be claimed exactly by the factory at its own index"
                );
            }
        }
    }
}
