pub mod atomic;
pub mod ops;
pub mod utils;
