// Re-export all models organized by concern
pub mod api;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod money;

pub use api::*;
pub use domain::*;
pub use errors::*;
pub use forms::*;
pub use money::*;
