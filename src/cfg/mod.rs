pub mod duration;
mod logging_config;

pub use duration::{format_duration, parse_duration, HumanDur};
pub use logging_config::{AppenderConfig, LoggingConfig};
