mod edit;
mod export;
mod generate;
mod interactive;
mod show;

pub use edit::run_edit;
pub use export::run_export;
pub use generate::{run_generate, GenerateOptions};
pub use interactive::run_interactive;
pub use show::run_show;
