pub mod prelude;

pub use reflectpad_core as core;
#[cfg(feature = "nn")]
pub use reflectpad_nn as nn;
pub use reflectpad_tensor as tensor;

pub use reflectpad_core::dtype::{bf16, bfloat16, f16, float16, float32, float64};
