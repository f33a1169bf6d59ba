use crate::env::Environment;
use crate::error::{syntax_err, EvalErr, EvalResult};
use crate::eval::eval;
use crate::form::Form;
use crate::symbol::Symbol;
use std::fmt;
use std::rc::Rc;

pub type Fp = Rc<dyn Fn(&[Form]) -> EvalResult>;

pub struct Native {
    name: String,
    func: Fp,
}

impl Native {
    pub fn call(&self, args: &[Form]) -> EvalResult {
        (self.func)(args)
    }
}

/// Positional parameters plus an optional rest parameter. A bare symbol spec
/// is a rest parameter with no positional ones.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub required: Vec<Symbol>,
    pub rest: Option<Symbol>,
}

impl Params {
    pub fn from_form(spec: &Form) -> Result<Params, EvalErr> {
        let mut it = spec.iter();
        let mut required = Vec::new();
        for param in it.by_ref() {
            match param {
                Form::Symbol(sym) => required.push(sym.clone()),
                _ => return Err(syntax_err(spec, "illegal lambda argument list")),
            }
        }
        let rest = match it.tail() {
            Form::Nil => None,
            Form::Symbol(sym) => Some(sym.clone()),
            _ => return Err(syntax_err(spec, "illegal lambda argument list")),
        };
        Ok(Params{required, rest})
    }

    pub fn to_form(&self) -> Form {
        let tail = match self.rest {
            Some(ref rest) => Form::Symbol(rest.clone()),
            None => Form::Nil,
        };
        Form::list_with_tail(
            self.required.iter().cloned().map(Form::Symbol).collect::<Vec<_>>(), tail)
    }

    pub fn accepts(&self, nargs: usize) -> bool {
        match self.rest {
            Some(_) => nargs >= self.required.len(),
            None => nargs == self.required.len(),
        }
    }
}

pub struct Closure {
    pub params: Params,
    pub body: Form,
    pub env: Rc<Environment>,
}

#[derive(Clone)]
pub enum Procedure {
    Native(Rc<Native>),
    Closure(Rc<Closure>),
}

impl Procedure {
    pub fn native<F>(name: &str, func: F) -> Procedure
            where F: Fn(&[Form]) -> EvalResult + 'static {
        Procedure::Native(Rc::new(Native{name: name.to_string(), func: Rc::new(func)}))
    }

    pub fn closure(params: Params, body: Form, env: Rc<Environment>) -> Procedure {
        Procedure::Closure(Rc::new(Closure{params, body, env}))
    }

    /// Call from native code. Unlike a call the evaluator sees, this one
    /// nests a fresh `eval` for closure bodies.
    pub fn apply(&self, args: Vec<Form>) -> EvalResult {
        match self {
            Procedure::Native(native) => native.call(&args),
            Procedure::Closure(closure) => {
                let env = Environment::nested(&closure.params, args, closure.env.clone())?;
                eval(&closure.body, &env)
            }
        }
    }
}

impl PartialEq for Procedure {
    fn eq(&self, other: &Procedure) -> bool {
        match (self, other) {
            (Procedure::Native(a), Procedure::Native(b)) => Rc::ptr_eq(a, b),
            (Procedure::Closure(a), Procedure::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Procedure::Native(native) => write!(f, "#<procedure {}>", native.name),
            Procedure::Closure(closure) =>
                write!(f, "#<lambda {}>", closure.params.to_form().written()),
        }
    }
}

impl fmt::Debug for Procedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}
