use crate::scanner::Scanner;

#[test]
fn test_peek_and_next() {
    let mut s = Scanner::new("just a test buffer@".chars());
    assert_eq!(s.curr(), None);
    assert_eq!(s.peek(), Some('j'));
    assert_eq!(s.peek_nth(3), Some('t'));
    assert_eq!(s.next(), Some('j'));
    assert_eq!(s.curr(), Some('j'));
    while s.next() != Some('@') {}
    assert_eq!(s.curr(), Some('@'));
    assert_eq!(s.peek(), None);
    assert_eq!(s.next(), None);
    assert_eq!(s.curr(), Some('@'));
}

#[test]
fn test_extract() {
    let mut s = Scanner::new("just a test buffer@".chars());
    for _ in 0..4 { assert!(s.next().is_some()); }
    assert_eq!(s.extract().iter().cloned().collect::<String>(), "just");
    assert_eq!(s.peek(), Some(' '));
    assert_eq!(s.curr(), None);
    for _ in 0..7 { assert!(s.next().is_some()); }
    assert_eq!(s.extract_string(), " a test");
    s.next();
    s.ignore();
    assert_eq!(s.until_any(&['@']), true);
    assert_eq!(s.extract_string(), "buffer");
}

#[test]
fn test_accept() {
    let mut s = Scanner::new("heey  you!".chars());
    assert!(!s.skip_whitespace());
    assert_eq!(s.accept_any(&['h', 'e']), Some('h'));
    assert_eq!(s.curr(), Some('h'));
    assert_eq!(s.accept_any(&['h', 'e']), Some('e'));
    assert_eq!(s.accept_any(&['h', 'y', 'e']), Some('e'));
    assert_eq!(s.accept(&'e'), None);
    assert_eq!(s.accept_any(&['h', 'e', 'y']), Some('y'));
    assert!(s.skip_whitespace());
    assert!(!s.skip_whitespace());
    assert_eq!(s.peek(), Some('y'));
    assert_eq!(s.next(), Some('y'));
    assert_eq!(s.next(), Some('o'));
}

#[test]
fn test_skips() {
    let mut s = Scanner::new("heey  you!".chars());
    assert_eq!(s.accept(&'h'), Some('h'));
    assert!(s.skip_all(&['h', 'e', 'y']));
    assert!(!s.skip_all(&['h', 'e', 'y']));
    assert_eq!(s.curr(), Some('y'));
    assert!(s.until_any(&['!']));
    assert!(!s.until_any(&['!']));
    assert_eq!(s.accept_any(&['!']), Some('!'));
    assert_eq!(s.next(), None);
}

#[test]
fn test_token_scanner() {
    let mut s = Scanner::new(vec![1, 2, 3, 4].into_iter());
    assert_eq!(s.accept(&2), None);
    assert_eq!(s.accept(&1), Some(1));
    assert!(s.skip_all(&[2, 3]));
    assert_eq!(s.view(), &[1, 2, 3]);
    assert_eq!(s.extract(), vec![1, 2, 3]);
    assert_eq!(s.next(), Some(4));
}
