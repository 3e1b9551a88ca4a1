pub mod constraints;
pub mod engine;
pub mod renewable;
pub mod strategies;
pub mod types;

pub use constraints::*;
pub use engine::*;
pub use renewable::*;
pub use strategies::*;
pub use types::*;
