use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl Layout {
    pub fn from_shape(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            strides: Self::compute_strides(shape),
        }
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }
    pub fn size_dim(&self, dim: usize) -> Option<usize> {
        self.shape.get(dim).copied()
    }
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn view(&mut self, new_shape: &[usize]) -> Result<()> {
        let old_size = self.size();
        let new_size = Self::compute_size(new_shape);

        if old_size != new_size {
            return Err(Error::ShapeMismatch {
                expected: self.shape.clone(),
                got: new_shape.to_vec(),
                msg: format!("cannot view layout of size {} as size {}", old_size, new_size),
            });
        }

        self.shape = new_shape.to_vec();
        self.strides = Self::compute_strides(new_shape);

        Ok(())
    }

    /// Splits a rank-4 ([C,T,H,W]) or rank-5 ([N,C,T,H,W]) shape into the number
    /// of (batch × channel) planes and the trailing (t, h, w) extent.
    pub fn split_volume(shape: &[usize]) -> Result<(usize, [usize; 3])> {
        match shape.len() {
            4 | 5 => {
                let (lead, spatial) = shape.split_at(shape.len() - 3);
                Ok((lead.iter().product(), [spatial[0], spatial[1], spatial[2]]))
            }
            ndim => Err(Error::InvalidArgument(format!(
                "expected a 4D [C,T,H,W] or 5D [N,C,T,H,W] tensor, got {} dimensions (shape {:?})",
                ndim, shape
            ))),
        }
    }

    // helper

    pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
        if shape.is_empty() {
            return vec![];
        }

        let mut strides = vec![1; shape.len()];
        for i in (0..shape.len() - 1).rev() {
            strides[i] = strides[i + 1] * shape[i + 1];
        }
        strides
    }

    pub fn compute_size(shape: &[usize]) -> usize {
        shape.iter().product()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_are_row_major() {
        let layout = Layout::from_shape(&[2, 3, 4, 5]);
        assert_eq!(layout.strides(), &[60, 20, 5, 1]);
        assert_eq!(layout.size(), 120);
    }

    #[test]
    fn split_volume_folds_leading_axes() {
        assert_eq!(Layout::split_volume(&[3, 4, 5, 6]).unwrap(), (3, [4, 5, 6]));
        assert_eq!(Layout::split_volume(&[2, 3, 4, 5, 6]).unwrap(), (6, [4, 5, 6]));
        assert!(matches!(Layout::split_volume(&[4, 5, 6]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn view_rejects_size_change() {
        let mut layout = Layout::from_shape(&[2, 3]);
        assert!(layout.view(&[3, 2]).is_ok());
        assert!(layout.view(&[4]).is_err());
    }
}
