use crate::error::{Escape, EvalErr, EvalResult, Tag};
use crate::form::Form;
use crate::numeric::{self, Op};
use crate::procedure::Procedure;
use crate::symbol::Symbol;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

macro_rules! nargs {
    ($args:ident == $n:expr) => {
        if $args.len() != $n {
            return Err(EvalErr::ArgumentsCount(format!("{}, given {}", $n, $args.len())));
        }
    };
    ($args:ident >= $n:expr) => {
        if $args.len() < $n {
            return Err(EvalErr::ArgumentsCount(format!(">= {}, given {}", $n, $args.len())));
        }
    };
}

fn foldop(op: Op, unit: Form, args: &[Form]) -> EvalResult {
    match args {
        [] => Ok(unit),
        [only] if op == Op::Sub => numeric::negate(only),
        [only] if op == Op::Div => numeric::arith(op, &unit, only),
        [first, rest @ ..] => rest.iter()
            .try_fold(first.clone(), |acc, item| numeric::arith(op, &acc, item)),
    }
}

fn foldcmp<T>(op: T, args: &[Form]) -> EvalResult
        where T: Fn(&Form, &Form) -> Result<bool, EvalErr> {
    nargs!(args >= 2);
    for win in args.windows(2) {
        if !op(&win[0], &win[1])? {
            return Ok(Form::Boolean(false));
        }
    }
    Ok(Form::Boolean(true))
}

fn ordering<T>(accept: T) -> impl Fn(&Form, &Form) -> Result<bool, EvalErr>
        where T: Fn(Ordering) -> bool {
    move |a, b| Ok(numeric::compare(a, b)?.map_or(false, &accept))
}

fn extreme(keep: Ordering, args: &[Form]) -> EvalResult {
    nargs!(args >= 1);
    let mut best = &args[0];
    for item in &args[1..] {
        if numeric::compare(item, best)? == Some(keep) {
            best = item;
        }
    }
    numeric::arith(Op::Add, best, &Form::Integer(0))
}

fn procedure(form: &Form) -> Result<&Procedure, EvalErr> {
    match form {
        Form::Proc(proc) => Ok(proc),
        other => Err(EvalErr::Type(format!("not a procedure: {}", other.written()))),
    }
}

fn car(args: &[Form]) -> EvalResult {
    nargs!(args == 1);
    match args[0] {
        Form::Pair(ref pair) => Ok(pair.car.clone()),
        ref other => Err(EvalErr::Syntax(format!("car: not a pair: {}", other.written()))),
    }
}

fn cdr(args: &[Form]) -> EvalResult {
    nargs!(args == 1);
    match args[0] {
        Form::Pair(ref pair) => Ok(pair.cdr.clone()),
        ref other => Err(EvalErr::Syntax(format!("cdr: not a pair: {}", other.written()))),
    }
}

/// Copies every list but the last, which becomes the shared tail.
fn append(args: &[Form]) -> EvalResult {
    let (last, init) = match args.split_last() {
        Some(split) => split,
        None => return Ok(Form::Nil),
    };
    let mut items = Vec::new();
    for list in init {
        items.extend(list.to_vec()?);
    }
    Ok(Form::list_with_tail(items, last.clone()))
}

fn apply(args: &[Form]) -> EvalResult {
    nargs!(args >= 2);
    let proc = procedure(&args[0])?;
    let (spread, init) = match args[1..].split_last() {
        Some(split) => split,
        None => return proc.apply(Vec::new()),
    };
    let mut call = init.to_vec();
    call.extend(spread.to_vec()?);
    proc.apply(call)
}

/// Stops at the shortest list.
fn map(args: &[Form]) -> EvalResult {
    nargs!(args >= 2);
    let proc = procedure(&args[0])?;
    let lists = args[1..].iter().map(Form::to_vec).collect::<Result<Vec<_>, _>>()?;
    let len = lists.iter().map(Vec::len).min().unwrap_or(0);
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        out.push(proc.apply(lists.iter().map(|list| list[i].clone()).collect())?);
    }
    Ok(Form::list(out))
}

fn is_eq(a: &Form, b: &Form) -> bool {
    match (a, b) {
        (Form::Pair(x), Form::Pair(y)) => Rc::ptr_eq(x, y),
        _ => a == b,
    }
}

/// One-shot escape. `k` unwinds back here as an `Escape` error; once the
/// call returns the tag is retired and `k` reports misuse instead.
pub fn call_cc(args: &[Form]) -> EvalResult {
    nargs!(args == 1);
    let proc = procedure(&args[0])?;
    let tag = Tag::new();
    let escape_tag = tag.clone();
    let k = Procedure::native("continuation", move |args| {
        if !escape_tag.is_active() {
            return Err(EvalErr::Continuation);
        }
        let value = match args {
            [value] => value.clone(),
            [] => Form::Void,
            values => Form::list(values.to_vec()),
        };
        Err(EvalErr::Escape(Escape{tag: escape_tag.clone(), value}))
    });
    let result = proc.apply(vec![Form::Proc(k)]);
    tag.retire();
    match result {
        Err(EvalErr::Escape(ref escape)) if escape.caught_by(&tag) => Ok(escape.value.clone()),
        other => other,
    }
}

fn predicate<T>(test: T) -> impl Fn(&[Form]) -> EvalResult
        where T: Fn(&Form) -> bool {
    move |args| {
        nargs!(args == 1);
        Ok(Form::Boolean(test(&args[0])))
    }
}

fn unary<T>(op: T) -> impl Fn(&[Form]) -> EvalResult
        where T: Fn(&Form) -> EvalResult {
    move |args| {
        nargs!(args == 1);
        op(&args[0])
    }
}

fn output(text: String) -> EvalResult {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .map_err(|err| EvalErr::Io(err.to_string()))?;
    Ok(Form::Void)
}

/// Native procedures and constants of a fresh global environment.
pub fn builtins() -> HashMap<Symbol, Form> {
    let mut procs = HashMap::new();
    let mut add = |name: &str, proc: Procedure| {
        procs.insert(Symbol::intern(name), Form::Proc(proc));
    };

    add("+", Procedure::native("+", |args| foldop(Op::Add, Form::Integer(0), args)));
    add("-", Procedure::native("-", |args| {
        nargs!(args >= 1);
        foldop(Op::Sub, Form::Integer(0), args)
    }));
    add("*", Procedure::native("*", |args| foldop(Op::Mul, Form::Integer(1), args)));
    add("/", Procedure::native("/", |args| {
        nargs!(args >= 1);
        foldop(Op::Div, Form::Integer(1), args)
    }));
    add("<", Procedure::native("<", |args| foldcmp(ordering(Ordering::is_lt), args)));
    add("<=", Procedure::native("<=", |args| foldcmp(ordering(Ordering::is_le), args)));
    add(">", Procedure::native(">", |args| foldcmp(ordering(Ordering::is_gt), args)));
    add(">=", Procedure::native(">=", |args| foldcmp(ordering(Ordering::is_ge), args)));
    add("=", Procedure::native("=", |args| foldcmp(numeric::equal, args)));
    add("max", Procedure::native("max", |args| extreme(Ordering::Greater, args)));
    add("min", Procedure::native("min", |args| extreme(Ordering::Less, args)));
    add("abs", Procedure::native("abs", unary(numeric::abs)));
    add("sqrt", Procedure::native("sqrt", unary(numeric::sqrt)));
    add("exp", Procedure::native("exp", unary(numeric::exp)));
    add("round", Procedure::native("round", unary(numeric::round)));
    add("expt", Procedure::native("expt", |args| {
        nargs!(args == 2);
        numeric::expt(&args[0], &args[1])
    }));

    add("car", Procedure::native("car", car));
    add("cdr", Procedure::native("cdr", cdr));
    add("cons", Procedure::native("cons", |args| {
        nargs!(args == 2);
        Ok(Form::cons(args[0].clone(), args[1].clone()))
    }));
    add("list", Procedure::native("list", |args| Ok(Form::list(args.to_vec()))));
    add("append", Procedure::native("append", append));
    add("length", Procedure::native("length", |args| {
        nargs!(args == 1);
        Ok(Form::Integer(args[0].to_vec()?.len() as i64))
    }));
    add("apply", Procedure::native("apply", apply));
    add("map", Procedure::native("map", map));
    add("begin", Procedure::native("begin", |args| {
        Ok(args.last().cloned().unwrap_or(Form::Void))
    }));

    add("eq?", Procedure::native("eq?", |args| {
        nargs!(args == 2);
        Ok(Form::Boolean(is_eq(&args[0], &args[1])))
    }));
    add("equal?", Procedure::native("equal?", |args| {
        nargs!(args == 2);
        Ok(Form::Boolean(args[0] == args[1]))
    }));
    add("not", Procedure::native("not", predicate(|form| !form.is_true())));
    add("null?", Procedure::native("null?", predicate(Form::is_nil)));
    add("pair?", Procedure::native("pair?", predicate(Form::is_pair)));
    add("list?", Procedure::native("list?", predicate(Form::is_list)));
    add("number?", Procedure::native("number?", predicate(Form::is_number)));
    add("symbol?", Procedure::native("symbol?",
        predicate(|form| matches!(form, Form::Symbol(_)))));
    add("string?", Procedure::native("string?",
        predicate(|form| matches!(form, Form::String(_)))));
    add("boolean?", Procedure::native("boolean?",
        predicate(|form| matches!(form, Form::Boolean(_)))));
    add("procedure?", Procedure::native("procedure?",
        predicate(|form| matches!(form, Form::Proc(_)))));

    add("display", Procedure::native("display", |args| {
        nargs!(args == 1);
        output(format!("{}", args[0]))
    }));
    add("newline", Procedure::native("newline", |args| {
        nargs!(args == 0);
        output(format!("\n"))
    }));
    add("print", Procedure::native("print", |args| {
        nargs!(args == 1);
        output(format!("{}\n", args[0]))
    }));

    add("call/cc", Procedure::native("call/cc", call_cc));
    add("call-with-current-continuation",
        Procedure::native("call-with-current-continuation", call_cc));

    procs.insert(Symbol::intern("pi"), Form::Float(std::f64::consts::PI));
    procs.insert(Symbol::intern("nil"), Form::Nil);
    procs
}

///////////////////////////////////////////////////////////////////////////////
