//! Line-oriented lexer.
//!
//! Lexing never fails: unterminated strings are closed at the end of their
//! line and characters outside the language are skipped.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Tree,
    Sequence,
    Selector,
    Action,
    Condition,
    Parallel,
    Inverter,
    Repeat,
    Retry,
    Timeout,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "tree" => Keyword::Tree,
            "Sequence" => Keyword::Sequence,
            "Selector" => Keyword::Selector,
            "Action" => Keyword::Action,
            "Condition" => Keyword::Condition,
            "Parallel" => Keyword::Parallel,
            "Inverter" => Keyword::Inverter,
            "Repeat" => Keyword::Repeat,
            "Retry" => Keyword::Retry,
            "Timeout" => Keyword::Timeout,
            _ => return None,
        };
        Some(keyword)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Tree => "tree",
            Keyword::Sequence => "Sequence",
            Keyword::Selector => "Selector",
            Keyword::Action => "Action",
            Keyword::Condition => "Condition",
            Keyword::Parallel => "Parallel",
            Keyword::Inverter => "Inverter",
            Keyword::Repeat => "Repeat",
            Keyword::Retry => "Retry",
            Keyword::Timeout => "Timeout",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword(Keyword),
    Identifier,
    /// Quoted literal; the token text excludes the quotes.
    String,
    Number,
    LBrace,
    RBrace,
    Colon,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "keyword `{}`", k.as_str()),
            TokenKind::Identifier => f.write_str("identifier"),
            TokenKind::String => f.write_str("string"),
            TokenKind::Number => f.write_str("number"),
            TokenKind::LBrace => f.write_str("`{`"),
            TokenKind::RBrace => f.write_str("`}`"),
            TokenKind::Colon => f.write_str("`:`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 1-based source line.
    pub line: usize,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            text: text.into(),
        }
    }
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (index, line) in source.lines().enumerate() {
        tokenize_line(line, index + 1, &mut tokens);
    }
    tokens
}

fn tokenize_line(line: &str, number: usize, out: &mut Vec<Token>) {
    let mut chars = line.char_indices().peekable();
    while let Some((start, c)) = chars.next() {
        match c {
            '#' => break,
            '{' => out.push(Token::new(TokenKind::LBrace, number, "{")),
            '}' => out.push(Token::new(TokenKind::RBrace, number, "}")),
            ':' => out.push(Token::new(TokenKind::Colon, number, ":")),
            '"' | '\'' => {
                let mut text = String::new();
                for (_, ch) in chars.by_ref() {
                    if ch == c {
                        break;
                    }
                    text.push(ch);
                }
                out.push(Token::new(TokenKind::String, number, text));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(i, ch)) = chars.peek() {
                    if !(ch.is_alphanumeric() || ch == '_') {
                        break;
                    }
                    end = i + ch.len_utf8();
                    chars.next();
                }
                let word = &line[start..end];
                let kind =
                    Keyword::from_word(word).map_or(TokenKind::Identifier, TokenKind::Keyword);
                out.push(Token::new(kind, number, word));
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut seen_dot = c == '.';
                let mut end = start + 1;
                while let Some(&(i, ch)) = chars.peek() {
                    if ch == '.' && !seen_dot {
                        seen_dot = true;
                    } else if !ch.is_ascii_digit() {
                        break;
                    }
                    end = i + 1;
                    chars.next();
                }
                out.push(Token::new(TokenKind::Number, number, &line[start..end]));
            }
            _ => {}
        }
    }
}
