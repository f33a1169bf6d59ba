use std::collections::VecDeque;

/// Look-ahead scanner over any iterator.
///
/// Items consumed with `next` pile up in the current lexeme until the caller
/// either `extract`s them or `ignore`s them. Peeking never touches the lexeme.
pub struct Scanner<I: Iterator> where I::Item: Clone {
    src: I,
    ahead: VecDeque<I::Item>,
    lexeme: Vec<I::Item>,
}

impl<I> Iterator for Scanner<I> where I: Iterator, I::Item: Clone {
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        let item = match self.ahead.pop_front() {
            Some(item) => item,
            None => self.src.next()?,
        };
        self.lexeme.push(item.clone());
        Some(item)
    }
}

impl<I> Scanner<I> where I: Iterator, I::Item: Clone {
    pub fn new(source: I) -> Scanner<I> {
        Scanner{src: source, ahead: VecDeque::new(), lexeme: Vec::new()}
    }

    pub fn peek(&mut self) -> Option<I::Item> {
        self.peek_nth(0)
    }

    // look n items past the next one without consuming anything
    pub fn peek_nth(&mut self, n: usize) -> Option<I::Item> {
        while self.ahead.len() <= n {
            let item = self.src.next()?;
            self.ahead.push_back(item);
        }
        self.ahead.get(n).cloned()
    }

    // last item consumed into the current lexeme
    pub fn curr(&self) -> Option<I::Item> {
        self.lexeme.last().cloned()
    }

    pub fn view(&self) -> &[I::Item] {
        &self.lexeme
    }

    pub fn ignore(&mut self) {
        self.lexeme.clear();
    }

    pub fn extract(&mut self) -> Vec<I::Item> {
        std::mem::take(&mut self.lexeme)
    }
}

impl<I> Scanner<I> where I: Iterator, I::Item: Clone + PartialEq {
    pub fn accept(&mut self, what: &I::Item) -> Option<I::Item> {
        match self.peek() {
            Some(ref next) if next == what => self.next(),
            _ => None,
        }
    }

    // Advance only if the next item is in the 'any' set
    pub fn accept_any(&mut self, any: &[I::Item]) -> Option<I::Item> {
        match self.peek() {
            Some(ref next) if any.contains(next) => self.next(),
            _ => None,
        }
    }

    // Skip over the 'over' set, returns whether the scanner advanced
    pub fn skip_all(&mut self, over: &[I::Item]) -> bool {
        let mut advanced = false;
        while self.accept_any(over).is_some() { advanced = true; }
        advanced
    }

    // Consume until an item in the 'any' set (left unconsumed) or EOF
    pub fn until_any(&mut self, any: &[I::Item]) -> bool {
        let mut advanced = false;
        while let Some(next) = self.peek() {
            if any.contains(&next) { break; }
            self.next();
            advanced = true;
        }
        advanced
    }
}
