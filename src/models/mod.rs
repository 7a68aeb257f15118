pub mod common;
pub mod invoice;
pub mod totals;

pub use common::*;
pub use invoice::*;
pub use totals::{recompute, Totals};
