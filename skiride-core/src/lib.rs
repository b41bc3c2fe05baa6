mod config;
mod constants;
mod data;
mod record;
mod stats;

pub use config::*;
pub use constants::*;
pub use data::*;
pub use record::*;
pub use stats::*;
