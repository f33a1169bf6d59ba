use crate::error::{EvalErr, EvalResult};
use crate::form::Form;
use crate::procedure::Params;
use crate::symbol::Symbol;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One frame of the lexical scope chain. Outer links only ever point
/// towards the global frame.
pub struct Environment {
    syms: RefCell<HashMap<Symbol, Form>>,
    outer: Option<Rc<Environment>>,
}

impl Environment {
    pub fn global<I>(bindings: I) -> Rc<Environment>
            where I: IntoIterator<Item=(Symbol, Form)> {
        Rc::new(Environment{
            syms: RefCell::new(bindings.into_iter().collect()), outer: None})
    }

    /// Frame for a procedure call: binds params positionally, the rest
    /// parameter (if any) gets the leftover arguments as a list.
    pub fn nested(params: &Params, args: Vec<Form>,
                  outer: Rc<Environment>) -> Result<Rc<Environment>, EvalErr> {
        if !params.accepts(args.len()) {
            return Err(EvalErr::Type(format!("expected {}, given {}",
                params.to_form().written(), Form::list(args).written())));
        }
        let mut syms = HashMap::with_capacity(params.required.len() + 1);
        let mut args = args.into_iter();
        for (param, arg) in params.required.iter().zip(args.by_ref()) {
            syms.insert(param.clone(), arg);
        }
        if let Some(ref rest) = params.rest {
            syms.insert(rest.clone(), Form::list(args));
        }
        Ok(Rc::new(Environment{syms: RefCell::new(syms), outer: Some(outer)}))
    }

    /// The innermost frame binding `sym`.
    pub fn find(&self, sym: &Symbol) -> Result<&Environment, EvalErr> {
        let mut env = self;
        loop {
            if env.syms.borrow().contains_key(sym) {
                return Ok(env);
            }
            match env.outer {
                Some(ref outer) => env = outer.as_ref(),
                None => return Err(EvalErr::LookUp(sym.name().to_string())),
            }
        }
    }

    pub fn lookup(&self, sym: &Symbol) -> EvalResult {
        self.find(sym)?.syms.borrow().get(sym).cloned()
            .ok_or_else(|| EvalErr::LookUp(sym.name().to_string()))
    }

    /// Rebind in the frame that already holds `sym`.
    pub fn set(&self, sym: &Symbol, value: Form) -> Result<(), EvalErr> {
        self.find(sym)?.syms.borrow_mut().insert(sym.clone(), value);
        Ok(())
    }

    /// Bind in this frame, shadowing any outer binding.
    pub fn define(&self, sym: Symbol, value: Form) {
        self.syms.borrow_mut().insert(sym, value);
    }

    /// Drop every binding of this frame.
    pub fn clear(&self) {
        drop(self.syms.take());
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Symbol { Symbol::intern(s) }

    fn params(spec: &[&str], rest: Option<&str>) -> Params {
        Params{required: spec.iter().map(|s| sym(s)).collect(), rest: rest.map(sym)}
    }

    #[test]
    fn find_walks_outwards() {
        let global = Environment::global(vec![(sym("x"), Form::Integer(1))]);
        let inner = Environment::nested(
            &params(&["y"], None), vec![Form::Integer(2)], global.clone()).unwrap();
        assert!(std::ptr::eq(inner.find(&sym("x")).unwrap(), &*global));
        assert!(std::ptr::eq(inner.find(&sym("y")).unwrap(), &*inner));
        assert_eq!(inner.find(&sym("zz")).err(), Some(EvalErr::LookUp(format!("zz"))));
    }

    #[test]
    fn define_shadows_and_set_mutates_owner() {
        let global = Environment::global(vec![(sym("x"), Form::Integer(1))]);
        let inner = Environment::nested(&params(&[], None), vec![], global.clone()).unwrap();
        inner.set(&sym("x"), Form::Integer(5)).unwrap();
        assert_eq!(global.lookup(&sym("x")), Ok(Form::Integer(5)));
        inner.define(sym("x"), Form::Integer(7));
        assert_eq!(inner.lookup(&sym("x")), Ok(Form::Integer(7)));
        assert_eq!(global.lookup(&sym("x")), Ok(Form::Integer(5)));
        assert_eq!(inner.set(&sym("nope"), Form::Nil), Err(EvalErr::LookUp(format!("nope"))));
    }

    #[test]
    fn variadic_and_rest_binding() {
        let global = Environment::global(vec![]);
        let args = vec![Form::Integer(1), Form::Integer(2), Form::Integer(3)];
        let env = Environment::nested(&params(&[], Some("all")), args.clone(), global.clone()).unwrap();
        assert_eq!(env.lookup(&sym("all")), Ok(Form::list(args.clone())));
        let env = Environment::nested(&params(&["a"], Some("more")), args, global).unwrap();
        assert_eq!(env.lookup(&sym("a")), Ok(Form::Integer(1)));
        assert_eq!(env.lookup(&sym("more")),
                   Ok(Form::list(vec![Form::Integer(2), Form::Integer(3)])));
    }

    #[test]
    fn arity_mismatch_is_a_type_error() {
        let global = Environment::global(vec![]);
        let err = Environment::nested(
            &params(&["x"], None), vec![Form::Integer(2), Form::Integer(2)], global);
        assert_eq!(err.err(), Some(EvalErr::Type(format!("expected (x), given (2 2)"))));
    }
}
