//! Read entities definitions.

pub mod order;
pub mod product;
