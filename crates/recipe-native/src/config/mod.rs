//! Client configuration: schema, paths, loading

pub mod io;
pub mod paths;
pub mod schema;

pub use io::{load_config, load_default_config};
pub use schema::ClientConfig;
