//! Small stateless helpers shared by the binary and the service

pub mod math;
pub mod strings;
pub mod time;
