pub mod render;
pub mod series;

pub use render::*;
pub use series::*;
