//! Discount Handlers

pub(crate) mod active;
pub(crate) mod index;
