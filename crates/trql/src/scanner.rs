//! Lexical scanner for the time-range query language.
//!
//! The scanner reads its input one rune at a time through a small push-back
//! reader, collapsing whitespace runs into single tokens and folding
//! identifier runs through the keyword table. Positions are zero-based line
//! and column of a token's first rune.

use crate::token::{lookup, Pos, Token};

/// A lexical scanner producing one token per [`scan`](Scanner::scan) call.
///
/// Not safe for shared use; independent scanners run independently.
pub struct Scanner<'a> {
    reader: Reader<'a>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Scanner<'a> {
        Scanner {
            reader: Reader::new(input),
        }
    }

    /// Return the next token and the position of its first rune.
    ///
    /// Past the end of input, returns [`Token::Eof`] with the most recent
    /// position, repeatedly.
    pub fn scan(&mut self) -> (Token, Pos) {
        let (ch, pos) = self.reader.read();
        match ch {
            None => (Token::Eof, pos),
            Some(c) if is_whitespace(c) => self.scan_whitespace(c, pos),
            Some(c) if is_letter(c) || is_digit(c) => self.scan_ident(c, pos),
            Some('(') => (Token::LParen, pos),
            Some(')') => (Token::RParen, pos),
            Some(c) => (Token::Illegal(c), pos),
        }
    }

    /// Consume every contiguous whitespace rune after the first.
    fn scan_whitespace(&mut self, first: char, pos: Pos) -> (Token, Pos) {
        let mut buf = String::from(first);
        loop {
            match self.reader.read() {
                (None, _) => break,
                (Some(c), _) if !is_whitespace(c) => {
                    self.reader.unread();
                    break;
                }
                (Some(c), _) => buf.push(c),
            }
        }
        (Token::Ws(buf), pos)
    }

    /// Consume every contiguous ident rune after the first, then match the
    /// run against the keyword table.
    fn scan_ident(&mut self, first: char, pos: Pos) -> (Token, Pos) {
        let mut buf = String::from(first);
        loop {
            match self.reader.read() {
                (None, _) => break,
                (Some(c), _) if !is_letter(c) && !is_digit(c) => {
                    self.reader.unread();
                    break;
                }
                (Some(c), _) => buf.push(c),
            }
        }
        (lookup(&buf), pos)
    }
}

/// A rune reader with one-rune push-back and position tracking.
///
/// Carriage returns normalize before they reach the scanner: `\r\n`
/// collapses into a single `\n` occupying one position, and a bare `\r`
/// reads as `\n`.
struct Reader<'a> {
    input: std::iter::Peekable<std::str::Chars<'a>>,
    /// Position of the next fresh rune.
    pos: Pos,
    /// Most recently read rune and its position.
    last: Option<(Option<char>, Pos)>,
    replay: bool,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Reader<'a> {
        Reader {
            input: input.chars().peekable(),
            pos: Pos::default(),
            last: None,
            replay: false,
        }
    }

    /// Read the next rune and its position; `None` at the end of input,
    /// repeatedly, without advancing the position.
    fn read(&mut self) -> (Option<char>, Pos) {
        if self.replay {
            self.replay = false;
            if let Some(last) = self.last {
                return last;
            }
        }

        let ch = match self.input.next() {
            Some('\r') => {
                self.input.next_if_eq(&'\n');
                Some('\n')
            }
            other => other,
        };

        let pos = self.pos;
        match ch {
            Some('\n') => {
                self.pos.line += 1;
                self.pos.column = 0;
            }
            Some(_) => self.pos.column += 1,
            None => {}
        }
        self.last = Some((ch, pos));
        (ch, pos)
    }

    /// Push the most recent rune back; the next read returns it again.
    fn unread(&mut self) {
        self.replay = true;
    }
}

fn is_whitespace(ch: char) -> bool {
    ch == ' ' || ch == '\t' || ch == '\n'
}

fn is_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}
