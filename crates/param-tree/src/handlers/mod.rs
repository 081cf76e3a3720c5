//! Format handlers

mod properties;
mod yaml;

pub use properties::PropertiesHandler;
pub use yaml::YamlHandler;
