use crate::tokenizer::{tokenize, Token};

fn word(s: &str) -> Token {
    Token::Word(s.to_string())
}

#[test]
fn test_operators_split_words() {
    let tokens = tokenize("cat<in|wc -l>out").unwrap();
    assert_eq!(
        tokens,
        vec![
            word("cat"),
            Token::RedirectIn,
            word("in"),
            Token::Pipe,
            word("wc"),
            word("-l"),
            Token::RedirectOut,
            word("out"),
        ]
    );
}

#[test]
fn test_double_angle_is_output_redirect() {
    assert_eq!(
        tokenize("echo hi >> log").unwrap(),
        vec![word("echo"), word("hi"), Token::RedirectOut, word("log")]
    );
}

#[test]
fn test_escape_character() {
    assert_eq!(
        tokenize(r"echo Hello\ World").unwrap(),
        vec![word("echo"), word("Hello World")]
    );
}

#[test]
fn test_quotes_keep_operators_literal() {
    assert_eq!(
        tokenize(r#"echo "a | b" '<' c\>d"#).unwrap(),
        vec![word("echo"), word("a | b"), word("<"), word("c>d")]
    );
}

#[test]
fn test_adjacent_quotes_join_one_word() {
    assert_eq!(
        tokenize(r#"echo pre"fix 'x'"'"y"'"#).unwrap(),
        vec![word("echo"), word("prefix 'x'\"y\"")]
    );
}

#[test]
fn test_escapes_inside_double_quotes() {
    assert_eq!(
        tokenize(r#"echo "say \"hi\" \n""#).unwrap(),
        vec![word("echo"), word("say \"hi\" \\n")]
    );
}

#[test]
fn test_empty_quotes_are_a_word() {
    assert_eq!(tokenize("echo ''").unwrap(), vec![word("echo"), word("")]);
}

#[test]
fn test_blank_line_has_no_tokens() {
    assert!(tokenize("   \t \n").unwrap().is_empty());
}

#[test]
fn test_unterminated_quote_is_an_error() {
    assert!(tokenize("echo 'oops").is_err());
    assert!(tokenize("echo \"oops").is_err());
}
