use crate::error::{EvalErr, EvalResult};
use crate::form::Form;
use crate::symbol::Keyword;
use lexers::{LispToken, LispTokenizer, Scanner};
use num::complex::Complex64;
use std::str::Chars;

pub fn tokenize(text: &str) -> Vec<LispToken> {
    LispTokenizer::new(text.chars()).collect()
}

fn next_token<I>(tokens: &mut Scanner<I>) -> Result<LispToken, EvalErr>
        where I: Iterator<Item=LispToken> {
    let token = tokens.next().ok_or_else(|| EvalErr::Syntax(format!("unexpected EOF")))?;
    tokens.ignore();
    Ok(token)
}

/// Read one form off the token stream.
pub fn read<I>(tokens: &mut Scanner<I>) -> EvalResult
        where I: Iterator<Item=LispToken> {
    let token = next_token(tokens)?;
    read_from(token, tokens)
}

fn read_from<I>(token: LispToken, tokens: &mut Scanner<I>) -> EvalResult
        where I: Iterator<Item=LispToken> {
    let prefixed = |kw, tokens: &mut Scanner<I>| -> EvalResult {
        Ok(Form::list(vec![Form::keyword(kw), read(tokens)?]))
    };
    match token {
        LispToken::OParen => read_list(tokens),
        LispToken::CParen => Err(EvalErr::Syntax(format!("unexpected )"))),
        LispToken::Quote => prefixed(Keyword::Quote, tokens),
        LispToken::QuasiQuote => prefixed(Keyword::QuasiQuote, tokens),
        LispToken::UnQuote => prefixed(Keyword::UnQuote, tokens),
        LispToken::UnQSplice => prefixed(Keyword::UnQSplice, tokens),
        LispToken::String(s) => {
            let inner = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')).unwrap_or(s.as_str());
            Ok(Form::string(inner))
        },
        LispToken::Unterminated(s) =>
            Err(EvalErr::Syntax(format!("{}: unterminated string", s))),
        LispToken::Atom(a) => Ok(atom(&a)),
    }
}

fn read_list<I>(tokens: &mut Scanner<I>) -> EvalResult
        where I: Iterator<Item=LispToken> {
    let mut items = Vec::new();
    loop {
        match next_token(tokens)? {
            LispToken::CParen => return Ok(Form::list(items)),
            LispToken::Atom(ref dot) if dot == "." && !items.is_empty() => {
                let tail = read(tokens)?;
                return match next_token(tokens)? {
                    LispToken::CParen => Ok(Form::list_with_tail(items, tail)),
                    _ => Err(EvalErr::Syntax(
                        format!("{}: expected ) after dotted tail", tail.written()))),
                };
            },
            token => items.push(read_from(token, tokens)?),
        }
    }
}

/// Booleans, numbers, else symbols. Only text with a digit is tried as a number.
fn atom(text: &str) -> Form {
    match text {
        "#t" => Form::Boolean(true),
        "#f" => Form::Boolean(false),
        _ if text.chars().any(|c| c.is_ascii_digit()) =>
            number(text).unwrap_or_else(|| Form::sym(text)),
        _ => Form::sym(text),
    }
}

fn number(text: &str) -> Option<Form> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Form::Integer(n));
    }
    if let Some(x) = real(text) {
        return Some(Form::Float(x));
    }
    complex(text).map(Form::Complex)
}

fn real(text: &str) -> Option<f64> {
    match text {
        "+inf.0" => Some(f64::INFINITY),
        "-inf.0" => Some(f64::NEG_INFINITY),
        "+nan.0" | "-nan.0" => Some(f64::NAN),
        _ => text.parse().ok(),
    }
}

fn imaginary(text: &str) -> Option<f64> {
    match text {
        "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => real(text),
    }
}

// "2i", "1.5-2i", "-1e-3+4e2i"
fn complex(text: &str) -> Option<Complex64> {
    let body = text.strip_suffix('i')?;
    let bytes = body.as_bytes();
    let split = (1..bytes.len()).rev().find(|&i|
        matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'));
    match split {
        Some(at) => {
            let re = real(&body[..at])?;
            Some(Complex64::new(re, imaginary(&body[at..])?))
        },
        None => Some(Complex64::new(0.0, imaginary(body)?)),
    }
}

/// Read the first form of `text`.
pub fn parse(text: &str) -> EvalResult {
    read(&mut LispTokenizer::scanner(text))
}

/// Every top-level form of a source text, in order.
pub struct Reader<'a> {
    tokens: Scanner<LispTokenizer<Chars<'a>>>,
}

impl<'a> Reader<'a> {
    pub fn new(text: &'a str) -> Reader<'a> {
        Reader{tokens: LispTokenizer::scanner(text)}
    }
}

impl<'a> Iterator for Reader<'a> {
    type Item = EvalResult;
    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.peek()?;
        Some(read(&mut self.tokens))
    }
}

/// Whether more input could still complete `text`: an open list, an open
/// string or a dangling quote prefix.
pub fn is_incomplete(text: &str) -> bool {
    let mut depth = 0i64;
    let mut dangling = false;
    for token in LispTokenizer::new(text.chars()) {
        dangling = false;
        match token {
            LispToken::OParen => depth += 1,
            LispToken::CParen => depth -= 1,
            LispToken::Unterminated(_) => return true,
            LispToken::Quote | LispToken::QuasiQuote |
            LispToken::UnQuote | LispToken::UnQSplice => dangling = true,
            _ => (),
        }
    }
    depth > 0 || dangling
}
