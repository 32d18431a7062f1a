mod args;
mod prompt;

pub use args::{Cli, Commands};
pub use prompt::Prompter;
