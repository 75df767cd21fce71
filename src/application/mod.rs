// Application layer: balance-aware operations on top of the raw queries.

mod error;
mod service;

pub use error::*;
pub use service::*;
