use crate::completion::Completer;
use crate::config::Config;
use anyhow::Result;
use rustyline::config::Config as EditorConfig;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use std::io::{self, BufRead, StdinLock};

/// Where command lines come from: a line editor on a terminal, or plain
/// buffered reads when input is piped.
pub enum LineReader {
    Editor(Box<Editor<Completer, DefaultHistory>>),
    Stream(StdinLock<'static>),
}

impl LineReader {
    pub fn new(config: &Config) -> Result<Self> {
        if !config.interactive {
            return Ok(LineReader::Stream(io::stdin().lock()));
        }

        let editor_config = EditorConfig::builder()
            .max_history_size(config.history_size)?
            .auto_add_history(true)
            .build();
        let mut editor = Editor::with_config(editor_config)?;
        editor.set_helper(Some(Completer::new(&config.search_path)));
        Ok(LineReader::Editor(Box::new(editor)))
    }

    /// The next line without its terminator, or `None` at end of input.
    /// `prompt` is only shown by the editor. Piped lines that are not valid
    /// UTF-8 are reported and skipped.
    pub fn next_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            LineReader::Editor(editor) => loop {
                match editor.readline(prompt) {
                    Ok(line) => return Ok(Some(line)),
                    // Ctrl-C drops the line being typed.
                    Err(ReadlineError::Interrupted) => continue,
                    Err(ReadlineError::Eof) => return Ok(None),
                    Err(e) => return Err(e.into()),
                }
            },
            LineReader::Stream(stdin) => loop {
                let mut bytes = Vec::new();
                if stdin.read_until(b'\n', &mut bytes)? == 0 {
                    return Ok(None);
                }
                match String::from_utf8(bytes) {
                    Ok(mut line) => {
                        let trimmed = line.trim_end_matches(&['\n', '\r'][..]).len();
                        line.truncate(trimmed);
                        return Ok(Some(line));
                    }
                    // Skipped whole, never run with replaced bytes.
                    Err(_) => eprintln!("fgsh: invalid UTF-8 input"),
                }
            },
        }
    }
}
