pub mod controller;
pub mod reconciliation;
pub mod status;

pub use controller::*;
pub use reconciliation::*;
pub use status::*;
