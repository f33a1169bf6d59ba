use crate::scanner::Scanner;

static WHITE: &[char] = &[' ', '\n', '\r', '\t'];

impl<I: Iterator<Item=char>> Scanner<I> {
    pub fn extract_string(&mut self) -> String {
        self.extract().into_iter().collect()
    }

    pub fn accept_char(&mut self, c: char) -> bool {
        self.accept(&c).is_some()
    }

    // whitespace is never part of a lexeme
    pub fn skip_whitespace(&mut self) -> bool {
        let skipped = self.skip_all(WHITE);
        self.ignore();
        skipped
    }

    // a line comment runs from 'start' to the end of the line and is dropped
    pub fn skip_comment(&mut self, start: char) -> bool {
        if !self.accept_char(start) {
            return false;
        }
        self.until_any(&['\n']);
        self.ignore();
        true
    }

    // scan a quoted string like "this is \"an\" example", escapes are kept
    // verbatim. Err carries whatever was read when EOF hit before the close.
    pub fn scan_quoted_string(&mut self, q: char) -> Option<Result<String, String>> {
        self.accept(&q)?;
        while let Some(n) = self.next() {
            if n == '\\' { self.next(); continue; }
            if n == q { return Some(Ok(self.extract_string())); }
        }
        Some(Err(self.extract_string()))
    }
}

///////////////////////////////////////////////////////////////////////////////
