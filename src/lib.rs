pub mod config;
pub mod dewpoint;
pub mod events;
pub mod host;
pub mod normalize;
pub mod sensor;

pub use crate::config::{setup_platform, ConfigError, PlatformConfig, SensorConfig};
pub use crate::dewpoint::dew_point;
pub use crate::events::{run_loop, MessageHandler, StateStore, States};
pub use crate::normalize::NormalizeError;
pub use crate::sensor::DewPointSensor;
