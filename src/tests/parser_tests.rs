use crate::ast::{Redirect, RedirectMode, Stream};
use crate::parser::{parse, resolve_redirections, split_segments};
use crate::tokenizer::tokenize;
use crate::types::ShellError;
use std::path::PathBuf;

#[test]
fn test_single_segment_spans_all_tokens() {
    let tokens = tokenize("ls -l /tmp").unwrap();
    assert_eq!(split_segments(&tokens).unwrap(), vec![0..3]);
}

#[test]
fn test_segments_split_at_pipes() {
    let tokens = tokenize("cat f | grep x | wc -l").unwrap();
    assert_eq!(split_segments(&tokens).unwrap(), vec![0..2, 3..5, 6..8]);
}

#[test]
fn test_empty_segments_reject_the_pipeline() {
    for line in ["| wc", "echo hi |", "echo hi | | wc", "|"] {
        let tokens = tokenize(line).unwrap();
        match split_segments(&tokens) {
            Err(ShellError::InvalidSyntax(_)) => {}
            other => panic!("{:?} gave {:?}", line, other),
        }
    }
}

#[test]
fn test_redirections_are_stripped_from_argv() {
    let tokens = tokenize("sort -r < in.txt > out.txt").unwrap();
    let segment = resolve_redirections(&tokens, 0..tokens.len()).unwrap();

    assert_eq!(segment.argv, vec!["sort", "-r"]);
    assert_eq!(
        segment.redirects,
        vec![
            Redirect {
                stream: Stream::Stdin,
                path: PathBuf::from("in.txt"),
                mode: RedirectMode::Read,
            },
            Redirect {
                stream: Stream::Stdout,
                path: PathBuf::from("out.txt"),
                mode: RedirectMode::AppendCreate,
            },
        ]
    );
}

#[test]
fn test_redirection_may_come_first() {
    let tokens = tokenize("> out.txt echo hi").unwrap();
    let segment = resolve_redirections(&tokens, 0..tokens.len()).unwrap();
    assert_eq!(segment.argv, vec!["echo", "hi"]);
    assert_eq!(segment.redirects.len(), 1);
}

#[test]
fn test_repeated_redirections_keep_their_order() {
    let tokens = tokenize("echo hi > a > b").unwrap();
    let segment = resolve_redirections(&tokens, 0..tokens.len()).unwrap();
    let paths: Vec<_> = segment.redirects.iter().map(|r| r.path.clone()).collect();
    assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
}

#[test]
fn test_missing_redirection_target() {
    for line in ["echo hi >", "cat <", "cat < > out"] {
        let tokens = tokenize(line).unwrap();
        assert!(
            resolve_redirections(&tokens, 0..tokens.len()).is_err(),
            "{:?} should be rejected",
            line
        );
    }
}

#[test]
fn test_segment_without_a_program() {
    let tokens = tokenize("< in.txt").unwrap();
    assert!(resolve_redirections(&tokens, 0..tokens.len()).is_err());
}

#[test]
fn test_parse_resolves_each_segment() -> Result<(), String> {
    let tokens = tokenize("cat < in | tr a-z A-Z > out").map_err(|e| e.to_string())?;
    let pipeline = parse(&tokens).map_err(|e| e.to_string())?;

    assert_eq!(pipeline.len(), 2);
    assert_eq!(pipeline.segments[0].argv, vec!["cat"]);
    assert_eq!(pipeline.segments[0].range, 0..3);
    assert_eq!(pipeline.segments[1].program(), "tr");
    assert_eq!(pipeline.segments[1].args(), ["a-z", "A-Z"]);
    assert_eq!(pipeline.segments[1].redirects[0].stream, Stream::Stdout);
    Ok(())
}
