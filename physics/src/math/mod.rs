mod fixed;
mod vector;

pub use fixed::Fixed;
pub use vector::FVec2;
