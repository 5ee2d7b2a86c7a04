mod build;
mod load;
mod types;

pub use build::*;
pub use load::*;
pub use types::*;
pub use oas3::spec::{SecurityRequirement, SecurityScheme};
