//! Numeric algorithms.

pub mod dot_product;
