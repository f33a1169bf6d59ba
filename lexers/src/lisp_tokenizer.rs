use crate::scanner::Scanner;
use std::str::Chars;

#[derive(Clone, PartialEq, Debug)]
pub enum LispToken {
    OParen, CParen,
    Quote, QuasiQuote, UnQuote, UnQSplice,
    String(String), // includes the surrounding quotes
    Atom(String),
    Unterminated(String), // a string literal cut short by EOF
}

// anything that ends an atom
static DELIMS: &[char] = &[
    '(', ')', '\'', '`', ',', ';', '"', ' ', '\n', '\r', '\t'];

pub struct LispTokenizer<I: Iterator<Item=char>>(Scanner<I>);

impl<'a> LispTokenizer<Chars<'a>> {
    pub fn scanner(source: &'a str) -> Scanner<LispTokenizer<Chars<'a>>> {
        Scanner::new(LispTokenizer::new(source.chars()))
    }
}

impl<I: Iterator<Item=char>> LispTokenizer<I> {
    pub fn new(source: I) -> Self {
        LispTokenizer(Scanner::new(source))
    }
}

impl<I: Iterator<Item=char>> Iterator for LispTokenizer<I> {
    type Item = LispToken;
    fn next(&mut self) -> Option<Self::Item> {
        while self.0.skip_whitespace() || self.0.skip_comment(';') {}
        if let Some(s) = self.0.scan_quoted_string('"') {
            return Some(match s {
                Ok(s) => LispToken::String(s),
                Err(fragment) => LispToken::Unterminated(fragment),
            });
        }
        if let Some(t) = self.0.accept_any(&['(', ')', '\'', '`', ',']) {
            let token = match t {
                '(' => LispToken::OParen,
                ')' => LispToken::CParen,
                '\'' => LispToken::Quote,
                '`' => LispToken::QuasiQuote,
                ',' => match self.0.accept_char('@') {
                    true => LispToken::UnQSplice,
                    false => LispToken::UnQuote,
                },
                _ => unreachable!()
            };
            self.0.ignore();
            return Some(token);
        }
        if self.0.until_any(DELIMS) { // or til EOF
            Some(LispToken::Atom(self.0.extract_string()))
        } else {
            None
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
