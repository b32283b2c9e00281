use crate::ast::{Pipeline, Redirect, RedirectMode, Segment, Stream};
use crate::tokenizer::Token;
use crate::types::ShellError;
use std::ops::Range;
use std::path::PathBuf;

pub fn parse(tokens: &[Token]) -> Result<Pipeline, ShellError> {
    let segments = split_segments(tokens)?
        .into_iter()
        .map(|range| resolve_redirections(tokens, range))
        .collect::<Result<Vec<_>, _>>()?;

    log::debug!("parsed pipeline: {:?}", segments);
    Ok(Pipeline { segments })
}

/// Cuts the token sequence at every pipe operator. An empty segment anywhere
/// rejects the whole line.
pub fn split_segments(tokens: &[Token]) -> Result<Vec<Range<usize>>, ShellError> {
    let mut segments = Vec::new();
    let mut start = 0;

    let boundaries = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| **t == Token::Pipe)
        .map(|(i, _)| i)
        .chain(std::iter::once(tokens.len()));

    for end in boundaries {
        if start == end {
            return Err(ShellError::InvalidSyntax(if tokens.is_empty() {
                "empty command".to_string()
            } else {
                "empty command in pipeline near `|'".to_string()
            }));
        }
        segments.push(start..end);
        start = end + 1;
    }
    Ok(segments)
}

/// Strips `<file` and `>file` out of one segment. The files are not opened
/// here; that happens in the child that owns them.
pub fn resolve_redirections(tokens: &[Token], range: Range<usize>) -> Result<Segment, ShellError> {
    let mut argv = Vec::new();
    let mut redirects = Vec::new();
    let mut iter = tokens[range.clone()].iter();

    while let Some(token) = iter.next() {
        let (stream, mode) = match token {
            Token::Word(word) => {
                argv.push(word.clone());
                continue;
            }
            Token::RedirectIn => (Stream::Stdin, RedirectMode::Read),
            Token::RedirectOut => (Stream::Stdout, RedirectMode::AppendCreate),
            Token::Pipe => {
                return Err(ShellError::InvalidSyntax("unexpected `|' inside a command".to_string()))
            }
        };

        let path = iter.next().and_then(Token::as_word).ok_or_else(|| {
            let op = if stream == Stream::Stdin { '<' } else { '>' };
            ShellError::InvalidSyntax(format!("expected file after `{}'", op))
        })?;
        redirects.push(Redirect {
            stream,
            path: PathBuf::from(path),
            mode,
        });
    }

    if argv.is_empty() {
        return Err(ShellError::InvalidSyntax("missing command before redirection".to_string()));
    }
    Ok(Segment {
        range,
        argv,
        redirects,
    })
}
