pub mod errors;
pub mod logging;
pub mod market_hours;
pub mod visibility;
