pub mod app_config;
pub mod provider;
pub mod sources;
pub mod validation;

pub use app_config::*;
pub use provider::*;
pub use sources::*;
pub use validation::*;
