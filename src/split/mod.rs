//! Per-person share computation for the four split modes.

pub mod itemized;
pub mod shares;

pub use itemized::ItemizedSplit;
pub use shares::{even_split, percentage_split, uneven_split};
