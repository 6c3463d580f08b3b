pub mod content_store;
pub mod id_generator;
pub mod seed;

pub use content_store::*;
pub use id_generator::*;
pub use seed::*;
