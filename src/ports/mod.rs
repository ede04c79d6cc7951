//! Port traits separating domain logic from I/O.

pub mod config_port;
pub mod data_port;
