//! Market-hours aggregate: trading calendar, session config and the
//! availability rules evaluated against them.

pub mod config;
pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use config::*;
pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
