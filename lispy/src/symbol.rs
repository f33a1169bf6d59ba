use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Special-form and reader keywords. Interning tags their symbols once so the
/// expander and evaluator dispatch on this enum instead of comparing names.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Keyword {
    Quote, If, Set, Define, DefineMacro, Lambda, Begin,
    QuasiQuote, UnQuote, UnQSplice, Let,
}

impl Keyword {
    pub const ALL: [Keyword; 11] = [
        Keyword::Quote, Keyword::If, Keyword::Set, Keyword::Define,
        Keyword::DefineMacro, Keyword::Lambda, Keyword::Begin,
        Keyword::QuasiQuote, Keyword::UnQuote, Keyword::UnQSplice, Keyword::Let,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Quote => "quote",
            Keyword::If => "if",
            Keyword::Set => "set!",
            Keyword::Define => "define",
            Keyword::DefineMacro => "define-macro",
            Keyword::Lambda => "lambda",
            Keyword::Begin => "begin",
            Keyword::QuasiQuote => "quasiquote",
            Keyword::UnQuote => "unquote",
            Keyword::UnQSplice => "unquote-splicing",
            Keyword::Let => "let",
        }
    }
}

struct Interned {
    name: Box<str>,
    keyword: Option<Keyword>,
}

/// An interned identifier. Two symbols with the same name share one
/// allocation, so equality is a pointer check in practice.
#[derive(Clone)]
pub struct Symbol(Rc<Interned>);

impl Symbol {
    pub fn intern(name: &str) -> Symbol {
        SYMBOLS.with(|table| table.borrow_mut().intern(name))
    }

    pub fn keyword(kw: Keyword) -> Symbol {
        Symbol::intern(kw.name())
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn as_keyword(&self) -> Option<Keyword> {
        self.0.keyword
    }

    pub fn is(&self, kw: Keyword) -> bool {
        self.0.keyword == Some(kw)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Symbol) -> bool {
        Rc::ptr_eq(&self.0, &other.0) || self.0.name == other.0.name
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Symbol({})", self.name())
    }
}

/// Name to symbol map, one per thread, living as long as the thread.
pub struct SymbolTable {
    names: HashMap<String, Symbol>,
}

impl SymbolTable {
    fn new() -> SymbolTable {
        let mut table = SymbolTable{names: HashMap::new()};
        for kw in Keyword::ALL.iter() {
            let sym = Symbol(Rc::new(Interned{
                name: kw.name().into(), keyword: Some(*kw)}));
            table.names.insert(kw.name().to_string(), sym);
        }
        table
    }

    fn intern(&mut self, name: &str) -> Symbol {
        if let Some(sym) = self.names.get(name) {
            return sym.clone();
        }
        let sym = Symbol(Rc::new(Interned{name: name.into(), keyword: None}));
        self.names.insert(name.to_string(), sym.clone());
        sym
    }

    #[cfg(test)]
    fn len() -> usize {
        SYMBOLS.with(|table| table.borrow().names.len())
    }
}

thread_local! {
    static SYMBOLS: RefCell<SymbolTable> = RefCell::new(SymbolTable::new());
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_reuses_symbols() {
        let a = Symbol::intern("some-name");
        let count = SymbolTable::len();
        let b = Symbol::intern("some-name");
        assert_eq!(count, SymbolTable::len());
        assert!(Rc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
        assert_ne!(a, Symbol::intern("other-name"));
    }

    #[test]
    fn keywords_are_tagged() {
        assert_eq!(Symbol::intern("lambda").as_keyword(), Some(Keyword::Lambda));
        assert!(Symbol::intern("set!").is(Keyword::Set));
        assert!(Symbol::keyword(Keyword::UnQSplice).is(Keyword::UnQSplice));
        assert_eq!(Symbol::intern("lambda2").as_keyword(), None);
    }
}
