use crate::env::Environment;
use crate::error::{syntax_err, EvalErr, EvalResult};
use crate::form::Form;
use crate::procedure::{Params, Procedure};
use crate::symbol::{Keyword, Symbol};
use std::cell::Cell;
use std::rc::Rc;

/// Fits an 8 MiB stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 1_000;

thread_local! {
    static DEPTH: Cell<usize> = Cell::new(0);
    static MAX_DEPTH: Cell<usize> = Cell::new(DEFAULT_MAX_DEPTH);
}

struct RestoreLimit(usize);

impl Drop for RestoreLimit {
    fn drop(&mut self) {
        MAX_DEPTH.with(|max| max.set(self.0));
    }
}

/// Run `f` with `limit` bounding nested (non-tail) `eval` activations. The
/// previous bound comes back when `f` returns.
pub fn with_max_depth<T, F>(limit: usize, f: F) -> T
        where F: FnOnce() -> T {
    let _restore = RestoreLimit(MAX_DEPTH.with(|max| max.replace(limit)));
    f()
}

struct DepthGuard;

impl DepthGuard {
    fn enter() -> Result<DepthGuard, EvalErr> {
        let limit = MAX_DEPTH.with(Cell::get);
        DEPTH.with(|depth| {
            if depth.get() >= limit {
                return Err(EvalErr::Exhausted(limit));
            }
            depth.set(depth.get() + 1);
            Ok(DepthGuard)
        })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get() - 1));
    }
}

macro_rules! check {
    ($argcheck:expr, $err:expr) => {
        if ! $argcheck { return Err($err); }
    }
}

fn operands<const N: usize>(form: &Form) -> Result<[Form; N], EvalErr> {
    <[Form; N]>::try_from(form.to_vec()?).map_err(|_| syntax_err(form, "wrong length"))
}

fn target<'a>(form: &Form, var: &'a Form, msg: &str) -> Result<&'a Symbol, EvalErr> {
    var.as_symbol().ok_or_else(|| syntax_err(form, msg))
}

/// Evaluate an expanded form. Tail positions (`if` branches, the last form
/// of `begin`, closure bodies) loop here instead of recursing, so only
/// operands and tests consume host stack.
pub fn eval(form: &Form, env: &Rc<Environment>) -> EvalResult {
    let _guard = DepthGuard::enter()?;
    let mut form = form.clone();
    let mut env = env.clone();
    loop {
        let pair = match form {
            Form::Symbol(ref sym) => return env.lookup(sym),
            Form::Pair(ref pair) => pair.clone(),
            ref atom => return Ok(atom.clone()),
        };
        match form.head_keyword() {
            Some(Keyword::Quote) => {
                let [_, datum] = operands::<2>(&form)?;
                return Ok(datum);
            },
            Some(Keyword::If) => {
                let [_, test, conseq, alt] = operands::<4>(&form)?;
                form = if eval(&test, &env)?.is_true() { conseq } else { alt };
            },
            Some(Keyword::Set) => {
                let [_, var, value] = operands::<3>(&form)?;
                let sym = target(&form, &var, "can set! only a symbol")?;
                env.set(sym, eval(&value, &env)?)?;
                return Ok(Form::Void);
            },
            Some(Keyword::Define) => {
                let [_, var, value] = operands::<3>(&form)?;
                let sym = target(&form, &var, "can define only a symbol")?;
                let value = eval(&value, &env)?;
                env.define(sym.clone(), value);
                return Ok(Form::Void);
            },
            Some(Keyword::Lambda) => {
                let [_, spec, body] = operands::<3>(&form)?;
                let params = Params::from_form(&spec)?;
                return Ok(Form::Proc(Procedure::closure(params, body, env.clone())));
            },
            Some(Keyword::Begin) => {
                let body = pair.cdr.to_vec()?;
                let (last, init) = match body.split_last() {
                    Some(split) => split,
                    None => return Ok(Form::Void),
                };
                for expr in init {
                    eval(expr, &env)?;
                }
                form = last.clone();
            },
            Some(kw) => return Err(syntax_err(
                &form, &format!("{} must be expanded before evaluation", kw.name()))),
            None => {
                let proc = match eval(&pair.car, &env)? {
                    Form::Proc(proc) => proc,
                    other => return Err(EvalErr::Type(
                        format!("not a procedure: {}", other.written()))),
                };
                let mut args = Vec::new();
                let mut it = pair.cdr.iter();
                for arg in it.by_ref() {
                    args.push(eval(arg, &env)?);
                }
                check!(it.tail().is_nil(), syntax_err(&form, "not a proper list"));
                match proc {
                    Procedure::Native(native) => return native.call(&args),
                    Procedure::Closure(closure) => {
                        env = Environment::nested(&closure.params, args, closure.env.clone())?;
                        form = closure.body.clone();
                    },
                }
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn depth() -> usize {
    DEPTH.with(Cell::get)
}
