pub use crate::core::{
    config::Accumulation,
    device::{get_default_device, set_default_device, Device},
    dtype::*,
    pad::PadSpec,
};
#[cfg(feature = "nn")]
pub use crate::nn::{Layer, ReflectionPad3d};
pub use crate::tensor::{reflection_pad3d, reflection_pad3d_backward, Tensor};
pub use crate::{bf16, f16};
