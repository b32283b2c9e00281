use crate::builtins::BUILTINS;
use crate::utils::is_executable;
use rustyline::{
    completion::{Completer as RustylineCompleter, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Context, Helper, Result,
};
use std::fs;
use std::path::{Path, PathBuf};

/// Tab completion: command names for the first word of a segment, file
/// names everywhere else.
pub struct Completer {
    commands: Vec<String>,
}

impl Completer {
    pub fn new(search_path: &[PathBuf]) -> Self {
        Self {
            commands: Self::find_commands(search_path),
        }
    }

    fn find_commands(search_path: &[PathBuf]) -> Vec<String> {
        let mut commands: Vec<String> = BUILTINS.iter().map(|b| b.name.to_string()).collect();

        for dir in search_path {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.filter_map(|r| r.ok()) {
                if !is_executable(&entry.path()) {
                    continue;
                }
                if let Some(name) = entry.file_name().to_str() {
                    commands.push(name.to_string());
                }
            }
        }

        commands.sort();
        commands.dedup();
        commands
    }

    /// Candidates for the word ending at the end of `line`.
    pub fn complete_word(&self, line: &str) -> Vec<String> {
        let word = line.rsplit(|c: char| c.is_whitespace()).next().unwrap_or("");
        let before = line[..line.len() - word.len()].trim_end();
        let starts_segment = before.is_empty() || before.ends_with('|');

        if starts_segment && !word.contains('/') {
            self.complete_command(word)
        } else {
            complete_path(word)
        }
    }

    fn complete_command(&self, prefix: &str) -> Vec<String> {
        self.commands
            .iter()
            .filter(|cmd| cmd.starts_with(prefix))
            .cloned()
            .collect()
    }
}

fn complete_path(word: &str) -> Vec<String> {
    let (dir, prefix) = match word.rfind('/') {
        Some(i) => (&word[..=i], &word[i + 1..]),
        None => ("", word),
    };
    let search_dir = if dir.is_empty() { Path::new(".") } else { Path::new(dir) };

    let Ok(entries) = fs::read_dir(search_dir) else {
        return Vec::new();
    };
    let mut completions: Vec<String> = entries
        .filter_map(|r| r.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if !name.starts_with(prefix) || (prefix.is_empty() && name.starts_with('.')) {
                return None;
            }
            let is_dir = entry.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
            Some(format!("{}{}{}", dir, name, if is_dir { "/" } else { "" }))
        })
        .collect();
    completions.sort();
    completions
}

impl Helper for Completer {}

impl RustylineCompleter for Completer {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        let start = line.rfind(char::is_whitespace).map_or(0, |i| i + 1);

        let pairs = self
            .complete_word(line)
            .into_iter()
            .map(|s| Pair {
                display: s.clone(),
                replacement: s,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Highlighter for Completer {}
impl Hinter for Completer {
    type Hint = String;
}
impl Validator for Completer {}
