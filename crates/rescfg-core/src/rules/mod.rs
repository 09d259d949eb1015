//! Tree-wide invariant enforcement

pub mod validation;

pub use validation::validate;
