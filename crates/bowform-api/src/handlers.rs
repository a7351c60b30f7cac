//! Request handlers.

pub mod analysis;
pub mod health;
pub mod results;
pub mod samples;

pub use analysis::*;
pub use health::*;
pub use results::*;
pub use samples::*;
