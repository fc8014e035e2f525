//! A tiny interactive shell.
//!
//! The crate reads one line at a time, splits it into whitespace-separated
//! arguments and either runs a built-in command (`cd`, `help`, `exit`)
//! in-process or launches an external program and waits for it to
//! terminate. There is no quoting, no pipelines and no redirection; just
//! one command per line.
//!
//! The main entry point is [`Interpreter`]: [`Interpreter::repl`] runs the
//! interactive loop the bundled binary exposes, and [`Interpreter::execute`]
//! dispatches a single tokenized command for embedding or testing. The
//! public modules [`command`] and [`env`] expose the traits and types needed
//! to assemble an interpreter with a custom command set.

mod builtin;
pub mod command;
pub mod env;
mod external;
mod interpreter;
mod lexer;

pub use command::Flow;
pub use interpreter::Interpreter;
