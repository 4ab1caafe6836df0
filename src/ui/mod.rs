pub mod icons;
pub mod prompt;
pub mod render;

pub use prompt::{Prompter, TermPrompter};
