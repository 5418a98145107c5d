mod layout;
mod range;
mod snowflake;

pub use range::*;
pub use snowflake::*;
