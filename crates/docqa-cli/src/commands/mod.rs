//! Command implementations.

pub mod convert;
pub mod generate;
pub mod split;

pub use self::convert::execute_convert;
pub use self::generate::execute_generate;
pub use self::split::execute_split;
