//! Prompt templates for the pipeline stages and the section classifier

pub mod embedded;
mod loader;

pub use loader::{PromptError, PromptLoader};
