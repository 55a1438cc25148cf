//! Collection deployment data and mint value calculation.

mod init_data;
mod value;

pub use init_data::*;
pub use value::*;
