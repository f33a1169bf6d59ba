use crate::builtins::builtins;
use crate::env::Environment;
use crate::error::{EvalErr, EvalResult};
use crate::eval::{eval, with_max_depth, DEFAULT_MAX_DEPTH};
use crate::expand::Expander;
use crate::form::Form;
use crate::procedure::Procedure;
use crate::reader::{self, Reader};
use crate::symbol::Symbol;
use log::{debug, trace, warn};
use std::path::Path;
use std::rc::{Rc, Weak};

static PRELUDE: &str = include_str!("../lib/prelude.scm");

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Nested (non-tail) evaluations allowed before `EvalErr::Exhausted`.
    pub max_depth: usize,
    /// Load the derived forms and list helpers written in Scheme.
    pub prelude: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config{max_depth: DEFAULT_MAX_DEPTH, prelude: true}
    }
}

/// A running program: the global environment plus its macro table.
pub struct Interpreter {
    global: Rc<Environment>,
    expander: Expander,
    config: Config,
}

fn top_level(expander: &Expander, global: &Rc<Environment>, max_depth: usize, form: &Form)
        -> EvalResult {
    let result = with_max_depth(max_depth, || -> EvalResult {
        let expanded = expander.expand(form, true)?;
        trace!("eval {}", expanded.written());
        eval(&expanded, global)
    });
    match result {
        Err(EvalErr::Escape(_)) => Err(EvalErr::Continuation),
        other => other,
    }
}

fn load_file(expander: &Expander, global: &Rc<Environment>, max_depth: usize, path: &Path)
        -> Result<(), EvalErr> {
    debug!("loading {}", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|err| EvalErr::Io(format!("{}: {}", path.display(), err)))?;
    for (count, form) in Reader::new(&text).enumerate() {
        if let Err(err) = form.and_then(|form| top_level(expander, global, max_depth, &form)) {
            warn!("aborted loading {} at form {}: {}", path.display(), count + 1, err);
            return Err(err);
        }
    }
    debug!("loaded {}", path.display());
    Ok(())
}

fn upgrade(global: &Weak<Environment>) -> Result<Rc<Environment>, EvalErr> {
    global.upgrade().ok_or_else(|| EvalErr::LookUp(format!("global environment")))
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Interpreter {
        let global = Environment::global(builtins());
        let expander = Expander::new(&global);
        let interp = Interpreter{global, expander, config};
        interp.install_host_procedures();
        if interp.config.prelude {
            if let Err(err) = interp.run_script(PRELUDE) {
                warn!("prelude failed to load: {}", err);
            }
        }
        interp
    }

    // `eval` and `load` need the expander, so they live here, not in builtins
    fn install_host_procedures(&self) {
        let max_depth = self.config.max_depth;
        let (expander, global) = (self.expander.clone(), Rc::downgrade(&self.global));
        self.global.define(Symbol::intern("eval"), Form::Proc(Procedure::native("eval",
            move |args| match args {
                [form] => {
                    let global = upgrade(&global)?;
                    with_max_depth(max_depth, || -> EvalResult {
                        eval(&expander.expand(form, true)?, &global)
                    })
                },
                _ => Err(EvalErr::ArgumentsCount(format!("1, given {}", args.len()))),
            })));

        let (expander, global) = (self.expander.clone(), Rc::downgrade(&self.global));
        self.global.define(Symbol::intern("load"), Form::Proc(Procedure::native("load",
            move |args| match args {
                [Form::String(path)] => {
                    load_file(&expander, &upgrade(&global)?, max_depth, Path::new(path))?;
                    Ok(Form::Void)
                },
                [other] => Err(EvalErr::Type(format!("not a path: {}", other.written()))),
                _ => Err(EvalErr::ArgumentsCount(format!("1, given {}", args.len()))),
            })));
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn global(&self) -> &Rc<Environment> {
        &self.global
    }

    pub fn expander(&self) -> &Expander {
        &self.expander
    }

    /// Read the first form of `text` and expand it.
    pub fn parse(&self, text: &str) -> EvalResult {
        self.expander.expand(&reader::parse(text)?, true)
    }

    pub fn eval_top_level(&self, form: &Form) -> EvalResult {
        top_level(&self.expander, &self.global, self.config.max_depth, form)
    }

    /// Evaluates every form in order and returns the value of the last one.
    pub fn run_script(&self, text: &str) -> EvalResult {
        let mut last = Form::Void;
        for form in Reader::new(text) {
            last = self.eval_top_level(&form?)?;
        }
        Ok(last)
    }

    /// Fail-fast: the first error stops the load, earlier definitions stay.
    pub fn load_library_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvalErr> {
        load_file(&self.expander, &self.global, self.config.max_depth, path.as_ref())
    }

    pub fn repl(&self, prompt: &str) -> rustyline::Result<()> {
        crate::repl::run(self, prompt)
    }
}

// global closures point back at the global frame
impl Drop for Interpreter {
    fn drop(&mut self) {
        self.expander.clear();
        self.global.clear();
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
