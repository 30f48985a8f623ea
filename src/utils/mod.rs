pub mod prompt;
pub mod validation;
