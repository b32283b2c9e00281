pub mod ast;
pub mod builtins;
pub mod completion;
pub mod config;
pub mod context;
pub mod executor;
pub mod input;
pub mod job;
pub mod launcher;
pub mod parser;
pub mod signals;
pub mod terminal;
pub mod tokenizer;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;
