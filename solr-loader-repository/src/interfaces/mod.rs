//! Interface definitions for the search repository.
//!
//! This module defines the abstract `SearchIndexProvider` and `CommandRunner`
//! traits that allow for dependency injection and swappable implementations.

mod command_runner;
mod search_index_provider;

pub use command_runner::{CommandOutput, CommandRunner};
pub use search_index_provider::SearchIndexProvider;
