//! Configuration and dependency wiring for the Solr loader.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::Settings;
