extern crate lexers;

mod builtins;
mod env;
mod error;
mod eval;
mod expand;
mod form;
mod interpreter;
mod numeric;
mod procedure;
mod reader;
mod repl;
mod symbol;

pub use env::Environment;
pub use error::{EvalErr, EvalResult};
pub use eval::{eval, with_max_depth, DEFAULT_MAX_DEPTH};
pub use expand::Expander;
pub use form::{Form, Pair};
pub use interpreter::{Config, Interpreter};
pub use procedure::{Closure, Native, Params, Procedure};
pub use reader::{is_incomplete, parse, read, tokenize, Reader};
pub use symbol::{Keyword, Symbol};

#[cfg(test)]
mod reader_test;
#[cfg(test)]
mod expand_test;
