pub mod cat;
pub mod dump;
pub mod encode;
pub mod grep;
pub mod run_common;

#[cfg(test)]
mod commands_tests;
