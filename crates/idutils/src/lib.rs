#![doc = include_str!("../README.md")]

mod generator;
mod id;
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
