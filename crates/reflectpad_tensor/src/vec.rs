use crate::Tensor;
use reflectpad_core::{dtype::Element, error::Result};

impl Tensor {
    /// Copies the elements to the host in row-major order, converting to `T`.
    pub fn to_flatten_vec<T: Element>(&self) -> Result<Vec<T>> {
        Ok(self.buffer().to_vec())
    }
}
