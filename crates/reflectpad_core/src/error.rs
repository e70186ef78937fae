use crate::{device::Device, dtype::DType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Shape mismatch ({msg}): expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        msg: String,
    },
    #[error("Unsupported device: {}", .0.name())]
    UnsupportedDevice(Device),
    #[error("Device mismatch: expected {}, got {}", .expected.name(), .got.name())]
    DeviceMismatch { expected: Device, got: Device },
    #[error("DType mismatch: expected {expected:?}, got {got:?}")]
    DTypeMismatch { expected: DType, got: DType },
    #[error("Grad is locked")]
    GradLocked,
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
