use crate::error::{syntax_err, EvalErr};
use crate::procedure::Procedure;
use crate::symbol::{Keyword, Symbol};
use num::complex::Complex64;
use std::fmt;
use std::rc::Rc;

/// Code and data share this representation.
#[derive(Clone, Debug)]
pub enum Form {
    Nil,
    Symbol(Symbol),
    Integer(i64),
    Float(f64),
    Complex(Complex64),
    Boolean(bool),
    String(String), // escapes kept as read, resolved on display
    Pair(Rc<Pair>),
    Proc(Procedure),
    Void,
}

#[derive(Debug)]
pub struct Pair {
    pub car: Form,
    pub cdr: Form,
}

// unlink long cdr chains one cell at a time instead of recursively
impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = std::mem::replace(&mut self.cdr, Form::Nil);
        while let Form::Pair(rc) = next {
            match Rc::try_unwrap(rc) {
                Ok(mut pair) => next = std::mem::replace(&mut pair.cdr, Form::Nil),
                Err(_) => break,
            }
        }
    }
}

impl Form {
    pub fn cons(car: Form, cdr: Form) -> Form {
        Form::Pair(Rc::new(Pair{car, cdr}))
    }

    pub fn list<I>(items: I) -> Form
            where I: IntoIterator<Item=Form>, I::IntoIter: DoubleEndedIterator {
        Form::list_with_tail(items, Form::Nil)
    }

    pub fn list_with_tail<I>(items: I, tail: Form) -> Form
            where I: IntoIterator<Item=Form>, I::IntoIter: DoubleEndedIterator {
        items.into_iter().rev().fold(tail, |acc, item| Form::cons(item, acc))
    }

    pub fn sym(name: &str) -> Form {
        Form::Symbol(Symbol::intern(name))
    }

    pub fn keyword(kw: Keyword) -> Form {
        Form::Symbol(Symbol::keyword(kw))
    }

    pub fn string(s: &str) -> Form {
        Form::String(s.to_string())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Form::Nil)
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Form::Pair(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Form::Integer(_) | Form::Float(_) | Form::Complex(_))
    }

    /// Only `#f`, `()` and void are false.
    pub fn is_true(&self) -> bool {
        !matches!(self, Form::Boolean(false) | Form::Nil | Form::Void)
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Form::Symbol(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn head_keyword(&self) -> Option<Keyword> {
        match self {
            Form::Pair(pair) => pair.car.as_symbol().and_then(Symbol::as_keyword),
            _ => None,
        }
    }

    pub fn car(&self) -> Option<&Form> {
        match self {
            Form::Pair(pair) => Some(&pair.car),
            _ => None,
        }
    }

    pub fn cdr(&self) -> Option<&Form> {
        match self {
            Form::Pair(pair) => Some(&pair.cdr),
            _ => None,
        }
    }

    pub fn iter(&self) -> ListIter<'_> {
        ListIter{cur: self}
    }

    pub fn is_list(&self) -> bool {
        let mut it = self.iter();
        while it.next().is_some() {}
        it.tail().is_nil()
    }

    pub fn to_vec(&self) -> Result<Vec<Form>, EvalErr> {
        let mut it = self.iter();
        let items: Vec<Form> = it.by_ref().cloned().collect();
        match it.tail() {
            Form::Nil => Ok(items),
            _ => Err(syntax_err(self, "not a proper list")),
        }
    }

    /// Reader-compatible rendering: `read(written(x)) == x`.
    pub fn written(&self) -> Written<'_> {
        Written(self)
    }

    fn render(&self, f: &mut fmt::Formatter, write: bool) -> fmt::Result {
        match self {
            Form::Nil => write!(f, "()"),
            Form::Symbol(sym) => write!(f, "{}", sym),
            Form::Integer(n) => write!(f, "{}", n),
            Form::Float(x) => write!(f, "{}", real(*x)),
            Form::Complex(c) => {
                let im = real(c.im);
                let sign = if im.starts_with(|c: char| c == '+' || c == '-') { "" } else { "+" };
                write!(f, "{}{}{}i", real(c.re), sign, im)
            },
            Form::Boolean(true) => write!(f, "#t"),
            Form::Boolean(false) => write!(f, "#f"),
            Form::String(s) if write => write!(f, "\"{}\"", s),
            Form::String(s) => write!(f, "{}", unescape(s)),
            Form::Pair(_) => {
                write!(f, "(")?;
                let mut it = self.iter();
                if let Some(first) = it.next() {
                    first.render(f, write)?;
                }
                for item in it.by_ref() {
                    write!(f, " ")?;
                    item.render(f, write)?;
                }
                if !it.tail().is_nil() {
                    write!(f, " . ")?;
                    it.tail().render(f, write)?;
                }
                write!(f, ")")
            },
            Form::Proc(p) => write!(f, "{}", p),
            Form::Void => write!(f, "#<void>"),
        }
    }
}

// non-finite values get spellings the reader knows
fn real(x: f64) -> String {
    if x.is_nan() {
        format!("+nan.0")
    } else if x.is_infinite() {
        format!("{}inf.0", if x < 0.0 { "-" } else { "+" })
    } else {
        format!("{:?}", x)
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => { out.push('\\'); out.push(other); },
            None => out.push('\\'),
        }
    }
    out
}

/// External representation, as the REPL shows results.
impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, false)
    }
}

pub struct Written<'a>(&'a Form);

impl<'a> fmt::Display for Written<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.render(f, true)
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Form) -> bool {
        let (mut a, mut b) = (self, other);
        loop {
            match (a, b) {
                (Form::Pair(x), Form::Pair(y)) => {
                    if Rc::ptr_eq(x, y) { return true; }
                    if x.car != y.car { return false; }
                    a = &x.cdr;
                    b = &y.cdr;
                },
                (Form::Nil, Form::Nil) => return true,
                (Form::Void, Form::Void) => return true,
                (Form::Symbol(x), Form::Symbol(y)) => return x == y,
                (Form::Integer(x), Form::Integer(y)) => return x == y,
                (Form::Float(x), Form::Float(y)) => return x == y,
                (Form::Complex(x), Form::Complex(y)) => return x == y,
                (Form::Boolean(x), Form::Boolean(y)) => return x == y,
                (Form::String(x), Form::String(y)) => return x == y,
                (Form::Proc(x), Form::Proc(y)) => return x == y,
                _ => return false,
            }
        }
    }
}

/// Walks the cars of a list. Stops at the first non-pair, available as `tail`.
pub struct ListIter<'a> {
    cur: &'a Form,
}

impl<'a> ListIter<'a> {
    pub fn tail(&self) -> &'a Form {
        self.cur
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Form;
    fn next(&mut self) -> Option<Self::Item> {
        match self.cur {
            Form::Pair(pair) => {
                self.cur = &pair.cdr;
                Some(&pair.car)
            },
            _ => None,
        }
    }
}
