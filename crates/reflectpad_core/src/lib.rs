pub mod be;
pub mod buffer;
pub mod config;
pub mod device;
pub mod dtype;
pub mod error;
pub mod layout;
pub mod pad;
pub mod pool;

pub use reflectpad_cpu as cpu;
