use crate::form::Form;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalErr {
    #[error("SyntaxError: {0}")]
    Syntax(String),
    #[error("LookUpError: {0}")]
    LookUp(String),
    #[error("TypeError: {0}")]
    Type(String),
    #[error("ArgumentsCountError: expected {0}")]
    ArgumentsCount(String),
    #[error("ContinuationError: can't continue this continuation any longer")]
    Continuation,
    #[error("RecursionError: maximum evaluation depth {0} exceeded")]
    Exhausted(usize),
    #[error("IoError: {0}")]
    Io(String),
    #[error("escape to a continuation outside of its extent")]
    Escape(Escape),
}

pub type EvalResult = Result<Form, EvalErr>;

/// Identity of one `call/cc` activation. Escapes are matched against it by
/// pointer, and it goes stale once the activation returns.
pub(crate) struct Tag {
    active: Cell<bool>,
}

impl Tag {
    pub(crate) fn new() -> Rc<Tag> {
        Rc::new(Tag{active: Cell::new(true)})
    }

    pub(crate) fn is_active(&self) -> bool { self.active.get() }

    pub(crate) fn retire(&self) { self.active.set(false) }
}

/// Non-local exit in flight: unwinds through `eval` as an error until the
/// `call/cc` frame owning `tag` catches it.
#[derive(Clone)]
pub struct Escape {
    pub(crate) tag: Rc<Tag>,
    pub(crate) value: Form,
}

impl Escape {
    pub(crate) fn caught_by(&self, tag: &Rc<Tag>) -> bool {
        Rc::ptr_eq(&self.tag, tag)
    }
}

impl PartialEq for Escape {
    fn eq(&self, other: &Escape) -> bool {
        Rc::ptr_eq(&self.tag, &other.tag) && self.value == other.value
    }
}

impl fmt::Debug for Escape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Escape({})", self.value.written())
    }
}

pub(crate) fn syntax_err(form: &Form, msg: &str) -> EvalErr {
    EvalErr::Syntax(format!("{}: {}", form.written(), msg))
}
