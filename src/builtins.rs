use crate::config::Config;
use crate::types::ShellError;
use std::env;
use std::io::Write;
use std::path::PathBuf;

/// What the interpreter loop does after a built-in returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue(i32),
    Exit(i32),
}

pub type BuiltinFn = fn(&[String], &Config, &mut dyn Write) -> Result<Outcome, ShellError>;

pub struct Builtin {
    pub name: &'static str,
    pub doc: &'static str,
    pub run: BuiltinFn,
}

pub static BUILTINS: [Builtin; 4] = [
    Builtin { name: "?", doc: "show this help menu", run: builtin_help },
    Builtin { name: "exit", doc: "exit the command shell", run: builtin_exit },
    Builtin { name: "pwd", doc: "print current working directory", run: builtin_pwd },
    Builtin { name: "cd", doc: "change the current working directory", run: builtin_cd },
];

pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().find(|b| b.name == name)
}

fn builtin_help(_: &[String], _: &Config, out: &mut dyn Write) -> Result<Outcome, ShellError> {
    for builtin in &BUILTINS {
        writeln!(out, "{} - {}", builtin.name, builtin.doc)?;
    }
    Ok(Outcome::Continue(0))
}

fn builtin_exit(_: &[String], _: &Config, _: &mut dyn Write) -> Result<Outcome, ShellError> {
    Ok(Outcome::Exit(0))
}

fn builtin_pwd(_: &[String], _: &Config, out: &mut dyn Write) -> Result<Outcome, ShellError> {
    writeln!(out, "{}", env::current_dir()?.display())?;
    Ok(Outcome::Continue(0))
}

fn builtin_cd(args: &[String], config: &Config, _: &mut dyn Write) -> Result<Outcome, ShellError> {
    let target = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => config.home.clone().ok_or_else(|| ShellError::ChangeDir {
            path: "~".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "HOME not set"),
        })?,
    };

    env::set_current_dir(&target).map_err(|source| ShellError::ChangeDir {
        path: target.display().to_string(),
        source,
    })?;
    Ok(Outcome::Continue(0))
}
