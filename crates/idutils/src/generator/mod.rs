mod error;
mod lock;
mod mutex;

pub use error::*;
pub use lock::*;
