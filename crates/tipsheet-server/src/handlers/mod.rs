//! Request handlers, one module per resource.

pub mod login;
pub mod results;
pub mod tips;
