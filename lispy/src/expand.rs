use crate::env::Environment;
use crate::error::{syntax_err, EvalErr, EvalResult};
use crate::eval::eval;
use crate::form::Form;
use crate::procedure::{Params, Procedure};
use crate::symbol::{Keyword, Symbol};
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

macro_rules! require {
    ($cond:expr, $form:expr, $msg:expr) => {
        if ! $cond { return Err(syntax_err($form, $msg)); }
    }
}

/// Rewrites surface syntax into the forms `eval` understands: `let`,
/// quasiquote, definition shorthand and user macros. Clones share the
/// macro table.
#[derive(Clone)]
pub struct Expander {
    macros: Rc<RefCell<HashMap<Symbol, Procedure>>>,
    global: Weak<Environment>,
}

impl Expander {
    pub fn new(global: &Rc<Environment>) -> Expander {
        Expander{macros: Rc::new(RefCell::new(HashMap::new())), global: Rc::downgrade(global)}
    }

    pub fn is_macro(&self, name: &Symbol) -> bool {
        self.macros.borrow().contains_key(name)
    }

    /// Forget every macro.
    pub fn clear(&self) {
        drop(self.macros.take());
    }

    fn macro_for(&self, head: &Form) -> Option<Procedure> {
        head.as_symbol().and_then(|name| self.macros.borrow().get(name).cloned())
    }

    fn expand_all(&self, items: &[Form]) -> EvalResult {
        let expanded = items.iter()
            .map(|item| self.expand(item, false))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Form::list(expanded))
    }

    pub fn expand(&self, form: &Form, top_level: bool) -> EvalResult {
        let items = match form {
            Form::Nil => return Err(syntax_err(form, "wrong length")),
            Form::Pair(_) => form.to_vec()?,
            _ => return Ok(form.clone()),
        };
        match form.head_keyword() {
            Some(Keyword::Quote) => {
                require!(items.len() == 2, form, "wrong length");
                Ok(form.clone())
            },
            Some(Keyword::If) => {
                let mut items = items;
                if items.len() == 3 {
                    items.push(Form::Void);
                }
                require!(items.len() == 4, form, "wrong length");
                self.expand_all(&items)
            },
            Some(Keyword::Set) => {
                require!(items.len() == 3, form, "wrong length");
                require!(items[1].as_symbol().is_some(), form, "can set! only a symbol");
                Ok(Form::list(vec![
                    items[0].clone(), items[1].clone(), self.expand(&items[2], false)?]))
            },
            Some(kw @ Keyword::Define) | Some(kw @ Keyword::DefineMacro) => {
                require!(items.len() >= 3, form, "wrong length");
                if let Form::Pair(ref signature) = items[1] {
                    // (define (f . params) body...) => (define f (lambda params body...))
                    let lambda = Form::list_with_tail(
                        vec![Form::keyword(Keyword::Lambda), signature.cdr.clone()],
                        Form::list(items[2..].to_vec()));
                    let define = Form::list(vec![items[0].clone(), signature.car.clone(), lambda]);
                    return self.expand(&define, top_level);
                }
                require!(items.len() == 3, form, "wrong length");
                let name = match items[1].as_symbol() {
                    Some(name) => name.clone(),
                    None => return Err(syntax_err(form, "can define only a symbol")),
                };
                let value = self.expand(&items[2], false)?;
                if kw == Keyword::Define {
                    return Ok(Form::list(vec![items[0].clone(), items[1].clone(), value]));
                }
                require!(top_level, form, "define-macro only allowed at top level");
                let global = self.global.upgrade()
                    .ok_or_else(|| EvalErr::LookUp(format!("global environment")))?;
                match eval(&value, &global)? {
                    Form::Proc(transformer) => {
                        debug!("registered macro {}", name);
                        self.macros.borrow_mut().insert(name, transformer);
                        Ok(Form::Void)
                    },
                    _ => Err(syntax_err(form, "macro must be a procedure")),
                }
            },
            Some(Keyword::Begin) => {
                if items.len() == 1 {
                    return Ok(Form::Void);
                }
                let expanded = items.iter()
                    .map(|item| self.expand(item, top_level))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Form::list(expanded))
            },
            Some(Keyword::Lambda) => {
                require!(items.len() >= 3, form, "wrong length");
                Params::from_form(&items[1])?;
                let body = match items.len() {
                    3 => items[2].clone(),
                    _ => Form::list_with_tail(
                        vec![Form::keyword(Keyword::Begin)], Form::list(items[2..].to_vec())),
                };
                Ok(Form::list(vec![items[0].clone(), items[1].clone(), self.expand(&body, false)?]))
            },
            Some(Keyword::QuasiQuote) => {
                require!(items.len() == 2, form, "wrong length");
                self.expand(&quasiquote(&items[1])?, false)
            },
            Some(Keyword::Let) => {
                require!(items.len() >= 3, form, "wrong length");
                let (vars, vals) = let_bindings(form, &items[1])?;
                let lambda = Form::list_with_tail(
                    vec![Form::keyword(Keyword::Lambda), Form::list(vars)],
                    Form::list(items[2..].to_vec()));
                self.expand(&Form::cons(lambda, Form::list(vals)), top_level)
            },
            Some(kw @ Keyword::UnQuote) | Some(kw @ Keyword::UnQSplice) =>
                Err(syntax_err(form, &format!("{} outside quasiquote", kw.name()))),
            None => match self.macro_for(&items[0]) {
                Some(transformer) => {
                    let expansion = transformer.apply(items[1..].to_vec())?;
                    self.expand(&expansion, top_level)
                },
                None => self.expand_all(&items),
            },
        }
    }
}

fn let_bindings(form: &Form, bindings: &Form) -> Result<(Vec<Form>, Vec<Form>), EvalErr> {
    let bindings = bindings.to_vec().map_err(|_| syntax_err(form, "illegal binding list"))?;
    let mut vars = Vec::with_capacity(bindings.len());
    let mut vals = Vec::with_capacity(bindings.len());
    for binding in bindings {
        match binding.to_vec().as_deref() {
            Ok([var @ Form::Symbol(_), val]) => {
                vars.push(var.clone());
                vals.push(val.clone());
            },
            _ => return Err(syntax_err(form, "illegal binding list")),
        }
    }
    Ok((vars, vals))
}

/// `(quasiquote x)` as plain `cons`/`append`/`quote` calls.
fn quasiquote(x: &Form) -> EvalResult {
    let pair = match x {
        Form::Pair(pair) => pair,
        _ => return Ok(Form::list(vec![Form::keyword(Keyword::Quote), x.clone()])),
    };
    match pair.car.as_symbol().and_then(Symbol::as_keyword) {
        Some(Keyword::UnQSplice) => return Err(syntax_err(x, "can't splice here")),
        Some(Keyword::UnQuote) => {
            let items = x.to_vec()?;
            require!(items.len() == 2, x, "wrong length");
            return Ok(items[1].clone());
        },
        _ => (),
    }
    if pair.car.head_keyword() == Some(Keyword::UnQSplice) {
        let splice = pair.car.to_vec()?;
        require!(splice.len() == 2, &pair.car, "wrong length");
        return Ok(Form::list(vec![Form::sym("append"), splice[1].clone(), quasiquote(&pair.cdr)?]));
    }
    Ok(Form::list(vec![Form::sym("cons"), quasiquote(&pair.car)?, quasiquote(&pair.cdr)?]))
}
