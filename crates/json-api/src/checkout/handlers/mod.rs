//! Checkout Handlers

pub(crate) mod calculate;
pub(crate) mod session;
