pub mod apply;
pub mod seed;
pub mod transform;
