use std::ops::Range;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
}

impl Stream {
    pub fn fd(self) -> i32 {
        match self {
            Stream::Stdin => libc::STDIN_FILENO,
            Stream::Stdout => libc::STDOUT_FILENO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectMode {
    Read,         // <
    AppendCreate, // >
}

#[derive(Debug, Clone, PartialEq)]
pub struct Redirect {
    pub stream: Stream,
    pub path: PathBuf,
    pub mode: RedirectMode,
}

/// One program invocation of a pipeline, with its own redirections.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Position of the segment in the token sequence it was cut from.
    pub range: Range<usize>,
    pub argv: Vec<String>,
    pub redirects: Vec<Redirect>,
}

impl Segment {
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }
}

/// Always holds at least one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub segments: Vec<Segment>,
}

impl Pipeline {
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
