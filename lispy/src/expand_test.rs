use crate::error::EvalErr;
use crate::form::Form;
use crate::interpreter::{Config, Interpreter};
use crate::reader::parse;
use crate::symbol::Symbol;

fn bare() -> Interpreter {
    Interpreter::with_config(Config{prelude: false, ..Config::default()})
}

fn expand(interp: &Interpreter, text: &str) -> Result<Form, EvalErr> {
    interp.expander().expand(&parse(text)?, true)
}

fn expands_to(text: &str, expected: &str) {
    let interp = bare();
    assert_eq!(expand(&interp, text).unwrap(), parse(expected).unwrap(), "{}", text);
}

fn is_syntax_err(interp: &Interpreter, text: &str) -> bool {
    matches!(expand(interp, text), Err(EvalErr::Syntax(_)))
}

#[test]
fn test_plain_forms_are_fixed_points() {
    for text in vec!["(f (g x) 1 \"s\")", "(quote (let x))", "(if a b c)",
                     "(lambda (x . y) (begin x y))", "(set! x (+ x 1))", "42"] {
        expands_to(text, text);
    }
}

#[test]
fn test_if_gets_an_alternate() {
    let interp = bare();
    let expanded = expand(&interp, "(if a b)").unwrap();
    assert_eq!(expanded, Form::list(vec![Form::sym("if"), Form::sym("a"), Form::sym("b"), Form::Void]));
}

#[test]
fn test_define_shorthand() {
    expands_to("(define (f x) (g x) x)", "(define f (lambda (x) (begin (g x) x)))");
    expands_to("(define (f . args) args)", "(define f (lambda args args))");
    expands_to("(define ((account bal) amt) bal)",
               "(define account (lambda (bal) (lambda (amt) bal)))");
}

#[test]
fn test_lambda_body_is_wrapped() {
    expands_to("(lambda (x) (display x) x)", "(lambda (x) (begin (display x) x))");
    expands_to("(lambda (x) (let ((y x)) y))", "(lambda (x) ((lambda (y) y) x))");
}

#[test]
fn test_let_becomes_application() {
    expands_to("(let ((a 1) (b 2)) (+ a b))", "((lambda (a b) (+ a b)) 1 2)");
    expands_to("(let () 1 2)", "((lambda () (begin 1 2)))");
}

#[test]
fn test_quasiquote() {
    expands_to("`x", "(quote x)");
    expands_to("`,x", "x");
    expands_to("`(testing ,@L ,x)",
               "(cons (quote testing) (append L (cons x (quote ()))))");
}

#[test]
fn test_empty_begin() {
    let interp = bare();
    assert_eq!(expand(&interp, "(begin)").unwrap(), Form::Void);
}

#[test]
fn test_syntax_errors() {
    let interp = bare();
    for text in vec!["()", "(set! x)", "(set! 1 2)", "(define 3 4)", "(quote 1 2)",
                     "(if 1 2 3 4)", "(if 1 2 3 4 5)", "(lambda 3 3)", "(lambda (x))",
                     "(lambda (x 1) x)", "`,@x", "(unquote x)", "(define x 1 2)",
                     "(let ((a 1) (b 2 3)) (+ a b))", "(let (a) a)", "(let x x)",
                     "(if (= 1 2) (define-macro a 'a) (define-macro a 'b))",
                     "(define-macro m 42)"] {
        assert!(is_syntax_err(&interp, text), "{}", text);
    }
}

#[test]
fn test_error_names_the_form() {
    let interp = bare();
    assert_eq!(expand(&interp, "(set! 1 2)"),
               Err(EvalErr::Syntax(format!("(set! 1 2): can set! only a symbol"))));
    assert_eq!(expand(&interp, "(define 3 4)"),
               Err(EvalErr::Syntax(format!("(define 3 4): can define only a symbol"))));
}

#[test]
fn test_user_macros() {
    let interp = bare();
    let registered = expand(&interp, "(define-macro swap (lambda (a b) (list b a)))").unwrap();
    assert_eq!(registered, Form::Void);
    assert!(interp.expander().is_macro(&Symbol::intern("swap")));
    assert_eq!(expand(&interp, "(swap 1 -)").unwrap(), parse("(- 1)").unwrap());
    // expansions are expanded again
    expand(&interp, "(define-macro indirect-swap (lambda (a b) (list 'swap a b)))").unwrap();
    assert_eq!(expand(&interp, "(indirect-swap 1 -)").unwrap(), parse("(- 1)").unwrap());
    // macros nested anywhere below the top
    assert_eq!(expand(&interp, "(lambda () (swap x f))").unwrap(), parse("(lambda () (f x))").unwrap());
}
