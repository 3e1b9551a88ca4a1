pub mod forecast;
pub mod outcome;
pub mod plant;

pub use forecast::*;
pub use outcome::*;
pub use plant::*;
