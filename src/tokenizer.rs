use crate::types::ShellError;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String), // Command, argument or redirection target
    Pipe,         // |
    RedirectIn,   // <
    RedirectOut,  // > or >>, both append
}

impl Token {
    pub fn as_word(&self) -> Option<&str> {
        match self {
            Token::Word(w) => Some(w),
            _ => None,
        }
    }
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, ShellError> {
    let mut tokens = Vec::new();
    let mut chars = input.trim().chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {
                chars.next();
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '<' => {
                chars.next();
                tokens.push(Token::RedirectIn);
            }
            '>' => {
                chars.next();
                if chars.peek() == Some(&'>') {
                    chars.next();
                }
                tokens.push(Token::RedirectOut);
            }
            _ => tokens.push(Token::Word(tokenize_word(&mut chars)?)),
        }
    }
    Ok(tokens)
}

// A word runs until unquoted whitespace or an operator; quoted runs join the word.
fn tokenize_word(chars: &mut Peekable<Chars>) -> Result<String, ShellError> {
    let mut word = String::new();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' | '\n' | '\r' | '|' | '<' | '>' => break,
            '\\' => {
                chars.next();
                if let Some(escaped) = chars.next() {
                    word.push(escaped);
                }
            }
            '\'' | '"' => tokenize_quoted(chars, &mut word)?,
            _ => {
                word.push(c);
                chars.next();
            }
        }
    }
    Ok(word)
}

fn tokenize_quoted(chars: &mut Peekable<Chars>, word: &mut String) -> Result<(), ShellError> {
    let Some(quote) = chars.next() else {
        return Ok(());
    };

    while let Some(c) = chars.next() {
        if c == quote {
            return Ok(());
        }
        if c == '\\' && quote == '"' {
            match chars.peek() {
                Some(&next) if next == '"' || next == '\\' => {
                    word.push(next);
                    chars.next();
                }
                _ => word.push(c),
            }
        } else {
            word.push(c);
        }
    }
    Err(ShellError::ParseError(format!("unterminated {} quote", quote)))
}
