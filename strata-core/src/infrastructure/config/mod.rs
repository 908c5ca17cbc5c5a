pub mod project;
pub mod template;

pub use project::{ConnectionConfig, Engine, LookerConfig, StrataConfig, load_config};
pub use template::{DEFAULT_CONFIG, write_default_config};
