use crate::{
    error::{Error, Result},
    layout::Layout,
};
use reflectpad_cpu::ops::padding::Pad3dGeometry;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of entries in a 3D pad list.
pub const PAD3D_LEN: usize = 6;

/// Reflection amounts for the three trailing axes, ordered
/// (left, right, top, bottom, front, back), i.e. (W-, W+, H-, H+, T-, T+).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PadSpec([usize; PAD3D_LEN]);

impl PadSpec {
    pub const fn new(pad: [usize; PAD3D_LEN]) -> Self {
        Self(pad)
    }

    pub const fn uniform(pad: usize) -> Self {
        Self([pad; PAD3D_LEN])
    }

    pub fn left(&self) -> usize {
        self.0[0]
    }
    pub fn right(&self) -> usize {
        self.0[1]
    }
    pub fn top(&self) -> usize {
        self.0[2]
    }
    pub fn bottom(&self) -> usize {
        self.0[3]
    }
    pub fn front(&self) -> usize {
        self.0[4]
    }
    pub fn back(&self) -> usize {
        self.0[5]
    }

    pub fn as_array(&self) -> [usize; PAD3D_LEN] {
        self.0
    }

    /// Leading pads in (t, h, w) order.
    pub fn pad_before(&self) -> [usize; 3] {
        [self.front(), self.top(), self.left()]
    }

    /// Trailing pads in (t, h, w) order.
    pub fn pad_after(&self) -> [usize; 3] {
        [self.back(), self.bottom(), self.right()]
    }

    /// Shape of the padded tensor for an input of `input_shape`.
    ///
    /// Fails with `InvalidArgument` when the rank is not 4 or 5, or when a
    /// non-zero pad is not strictly smaller than its axis.
    pub fn output_shape(&self, input_shape: &[usize]) -> Result<Vec<usize>> {
        let geometry = self.geometry(input_shape)?;
        let mut output_shape = input_shape.to_vec();
        let ndim = output_shape.len();
        output_shape[ndim - 3..].copy_from_slice(&geometry.output);
        Ok(output_shape)
    }

    /// Validated kernel geometry for an input of `input_shape`.
    pub fn geometry(&self, input_shape: &[usize]) -> Result<Pad3dGeometry> {
        const AXES: [&str; 3] = ["depth (T)", "height (H)", "width (W)"];

        let (planes, input) = Layout::split_volume(input_shape)?;
        let pad_before = self.pad_before();
        let pad_after = self.pad_after();

        let mut output = [0; 3];
        for axis in 0..3 {
            let (before, after, size) = (pad_before[axis], pad_after[axis], input[axis]);
            if (before > 0 && before >= size) || (after > 0 && after >= size) {
                return Err(Error::InvalidArgument(format!(
                    "Reflection padding ({}, {}) on {} axis must be less than the dimension size ({})",
                    before, after, AXES[axis], size
                )));
            }
            output[axis] = size + before + after;
        }

        Ok(Pad3dGeometry {
            planes,
            input,
            output,
            pad_before,
        })
    }
}

impl From<[usize; PAD3D_LEN]> for PadSpec {
    fn from(pad: [usize; PAD3D_LEN]) -> Self {
        Self(pad)
    }
}

impl TryFrom<&[usize]> for PadSpec {
    type Error = Error;

    fn try_from(pad: &[usize]) -> Result<Self> {
        let pad: [usize; PAD3D_LEN] = pad.try_into().map_err(|_| {
            Error::InvalidArgument(format!(
                "Reflection pad expects {} values (left, right, top, bottom, front, back), got {}",
                PAD3D_LEN,
                pad.len()
            ))
        })?;
        Ok(Self(pad))
    }
}

impl TryFrom<&[i64]> for PadSpec {
    type Error = Error;

    fn try_from(pad: &[i64]) -> Result<Self> {
        if pad.len() != PAD3D_LEN {
            return Err(Error::InvalidArgument(format!(
                "Reflection pad expects {} values (left, right, top, bottom, front, back), got {}",
                PAD3D_LEN,
                pad.len()
            )));
        }

        let mut out = [0usize; PAD3D_LEN];
        for (dst, &value) in out.iter_mut().zip(pad) {
            *dst = usize::try_from(value)
                .map_err(|_| Error::InvalidArgument(format!("Reflection pad values must be non-negative, got {}", value)))?;
        }
        Ok(Self(out))
    }
}
