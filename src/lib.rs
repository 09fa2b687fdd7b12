//! Run python source against a persistent namespace and get back whatever it
//! printed, or the text of the error it raised, as one string.
//!
//! ```no_run
//! use pyrepl::{markdown, PythonRepl};
//!
//! # fn main() -> pyrepl::Result<()> {
//! let mut repl = PythonRepl::new()?;
//! repl.run("foo = 1");
//! assert_eq!(repl.run(markdown::unwrap("```python\nprint(foo + 1)\n```")), "2\n");
//! assert_eq!(repl.run("print(bar)"), "name 'bar' is not defined");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod logging;
pub mod markdown;
pub mod process;

pub use config::Config;
pub use error::{ReplError, Result};
pub use execution::{Binding, PythonRepl, ReplOptions};
