use crate::error::EvalErr;
use crate::form::Form;
use crate::reader::{is_incomplete, parse, Reader};
use crate::symbol::Keyword;
use num::complex::Complex64;

fn sym(s: &str) -> Form { Form::sym(s) }

#[test]
fn test_lisp1() {
    let p = parse("(begin (define r 10) (* pi (* r r)))");
    let r = Form::list(vec![
        sym("begin"),
        Form::list(vec![sym("define"), sym("r"), Form::Integer(10)]),
        Form::list(vec![
            sym("*"), sym("pi"),
            Form::list(vec![sym("*"), sym("r"), sym("r")]),
        ]),
    ]);
    assert_eq!(p.unwrap(), r);
}

#[test]
fn test_atoms() {
    let inputs = vec!["#t", "#f", "42", "-7", "2.5", "-3.14e159", "\"hi\\n\"", "abc", "1+", "x1"];
    let expect = vec![
        Form::Boolean(true), Form::Boolean(false), Form::Integer(42), Form::Integer(-7),
        Form::Float(2.5), Form::Float(-3.14e159), Form::string("hi\\n"), sym("abc"),
        sym("1+"), sym("x1"),
    ];
    for (input, expected) in inputs.iter().zip(expect.iter()) {
        assert_eq!(parse(input).unwrap(), *expected);
    }
}

#[test]
fn test_complex_literals() {
    let inputs = vec!["1i", "-2.5i", "3+4i", "1.5-2i", "-1e-3+4e2i", "2-i"];
    let expect = vec![
        Complex64::new(0.0, 1.0), Complex64::new(0.0, -2.5), Complex64::new(3.0, 4.0),
        Complex64::new(1.5, -2.0), Complex64::new(-1e-3, 4e2), Complex64::new(2.0, -1.0),
    ];
    for (input, expected) in inputs.iter().zip(expect.iter()) {
        assert_eq!(parse(input).unwrap(), Form::Complex(*expected));
    }
}

#[test]
fn test_quote_prefixes() {
    let p = parse("`(a ,b ,@c 'd)").unwrap();
    let kw = Form::keyword;
    let r = Form::list(vec![kw(Keyword::QuasiQuote), Form::list(vec![
        sym("a"),
        Form::list(vec![kw(Keyword::UnQuote), sym("b")]),
        Form::list(vec![kw(Keyword::UnQSplice), sym("c")]),
        Form::list(vec![kw(Keyword::Quote), sym("d")]),
    ])]);
    assert_eq!(p, r);
}

#[test]
fn test_dotted_pairs() {
    assert_eq!(parse("(1 . 2)").unwrap(), Form::cons(Form::Integer(1), Form::Integer(2)));
    assert_eq!(parse("(a b . rest)").unwrap(),
               Form::list_with_tail(vec![sym("a"), sym("b")], sym("rest")));
    assert_eq!(parse("(1 . (2 3))").unwrap(),
               Form::list(vec![Form::Integer(1), Form::Integer(2), Form::Integer(3)]));
    assert!(matches!(parse("(1 . 2 3)"), Err(EvalErr::Syntax(_))));
}

#[test]
fn test_comments() {
    let text = "'(1 ; test comments '\n ;\n skip this line\n 2;\n more;\n comments; ) )\n 3) ;\n final comment";
    let r = Form::list(vec![
        Form::keyword(Keyword::Quote),
        Form::list(vec![Form::Integer(1), sym("skip"), sym("this"), sym("line"),
                        Form::Integer(2), sym("more"), sym("comments"), Form::Integer(3)]),
    ]);
    assert_eq!(parse(text).unwrap(), r);
}

#[test]
fn test_read_errors() {
    assert_eq!(parse(")"), Err(EvalErr::Syntax(format!("unexpected )"))));
    assert_eq!(parse("(+ 1 2"), Err(EvalErr::Syntax(format!("unexpected EOF"))));
    assert_eq!(parse(""), Err(EvalErr::Syntax(format!("unexpected EOF"))));
    assert_eq!(parse("'"), Err(EvalErr::Syntax(format!("unexpected EOF"))));
    assert!(matches!(parse("(print \"oops"), Err(EvalErr::Syntax(_))));
}

#[test]
fn test_reader_iterates_forms() {
    let forms: Vec<_> = Reader::new("1 (a b)\n; nothing\n\"s\"").collect();
    assert_eq!(forms, vec![
        Ok(Form::Integer(1)),
        Ok(Form::list(vec![sym("a"), sym("b")])),
        Ok(Form::string("s")),
    ]);
    assert_eq!(Reader::new("  ; only a comment").count(), 0);
}

#[test]
fn test_written_round_trip() {
    let inputs = vec![
        "(testing 1 (2.0) -3.14e159)",
        "(a \"str \\\"q\\\" x\" #t #f)",
        "(1 (2 (3 . 4)) . 5)",
        "(0.0+1.0i -1.5-2.0i 1e300)",
        "(quote (nested () ()))",
        "(+inf.0 -inf.0 1.0-inf.0i +inf.0+2.0i)",
    ];
    for input in inputs.iter() {
        let form = parse(input).unwrap();
        let printed = format!("{}", form.written());
        assert_eq!(parse(&printed).unwrap(), form, "{}", printed);
    }
}

#[test]
fn test_non_finite_floats() {
    assert_eq!(format!("{}", Form::Float(f64::INFINITY).written()), "+inf.0");
    assert_eq!(format!("{}", Form::Float(f64::NEG_INFINITY).written()), "-inf.0");
    assert_eq!(format!("{}", Form::Float(f64::NAN).written()), "+nan.0");
    assert_eq!(format!("{}", Form::Complex(Complex64::new(f64::NAN, f64::INFINITY)).written()),
               "+nan.0+inf.0i");
    assert_eq!(parse("-inf.0").unwrap(), Form::Float(f64::NEG_INFINITY));
    for text in vec!["+nan.0", "-nan.0"] {
        assert!(matches!(parse(text).unwrap(), Form::Float(x) if x.is_nan()), "{}", text);
    }
    assert_eq!(parse("inf").unwrap(), sym("inf"));
}

#[test]
fn test_is_incomplete() {
    assert!(is_incomplete("(define (f x)"));
    assert!(is_incomplete("(display \"abc"));
    assert!(is_incomplete("'"));
    assert!(!is_incomplete("(f x)"));
    assert!(!is_incomplete("x ; (comment"));
    assert!(!is_incomplete(")"));
}
