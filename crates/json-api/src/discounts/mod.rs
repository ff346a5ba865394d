//! Restaurant Discounts

mod handlers;
mod responses;

pub(crate) use handlers::*;
