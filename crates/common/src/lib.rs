//! Runtime helpers shared by every crate in the workspace.

pub mod env;
pub mod utils;
