//! Documentation that spans more than one crate.

pub mod api;
pub mod configuration;
pub mod testing;
