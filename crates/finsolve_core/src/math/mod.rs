//! Numerical building blocks.
//!
//! - `roots`: Bracketing and derivative-based root finders

pub mod roots;
