//! `good_lp` implementation of the lumen solver-backend contract.

pub mod backend;

pub use backend::GoodLpBackend;
