//! Engine configuration.
//!
//! Deployment-level settings (data directory, allocator policy knobs,
//! lock-wait ceiling) load from a YAML file with environment-variable
//! overrides. The *pricing* configuration is domain data and lives in the
//! store instead — see [`crate::pricing`].

mod loader;
mod schema;

pub use loader::ConfigBuilder;
pub use schema::EngineConfig;
