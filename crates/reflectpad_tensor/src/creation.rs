use crate::Tensor;
use rand::distributions::Distribution;
use reflectpad_core::{
    buffer::{Buffer, Storage},
    device::{get_default_device, Device},
    dtype::{get_default_dtype, DType, Element},
    error::{Error, Result},
    layout::Layout,
};

impl Tensor {
    /// One-dimensional tensor on the default device, converted to the default dtype.
    pub fn new<T: Element>(data: Vec<T>) -> Result<Self> {
        let shape = [data.len()];
        Self::new_with_spec(data, &shape, get_default_device(), get_default_dtype())
    }

    pub fn new_with_spec<T: Element>(data: Vec<T>, shape: &[usize], device: Device, dtype: DType) -> Result<Self> {
        let layout = Layout::from_shape(shape);
        if layout.size() != data.len() {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
                msg: "data length does not match shape".to_string(),
            });
        }

        let storage = Storage::from_vec(data).to_dtype(dtype);
        Ok(Self::from_parts(Buffer::from_storage(storage, device), layout))
    }

    pub fn zeros(shape: &[usize]) -> Result<Self> {
        Self::zeros_with_spec(shape, get_default_device(), get_default_dtype())
    }

    pub fn zeros_with_spec(shape: &[usize], device: Device, dtype: DType) -> Result<Self> {
        let layout = Layout::from_shape(shape);
        Ok(Self::from_parts(Buffer::zeros(layout.size(), device, dtype), layout))
    }

    pub fn zeros_like(src: &Tensor) -> Result<Self> {
        Self::zeros_with_spec(src.shape(), src.device(), src.dtype())
    }

    pub fn ones_like(src: &Tensor) -> Result<Self> {
        Self::new_with_spec(vec![1.0f64; src.size()], src.shape(), src.device(), src.dtype())
    }

    pub fn randn(shape: &[usize]) -> Result<Self> {
        Self::randn_with_spec(shape, get_default_device(), get_default_dtype())
    }

    /// Samples every element from the standard normal distribution.
    pub fn randn_with_spec(shape: &[usize], device: Device, dtype: DType) -> Result<Self> {
        let normal = rand_distr::Normal::new(0.0f64, 1.0).map_err(|e| Error::InvalidArgument(e.to_string()))?;
        let mut rng = rand::thread_rng();
        let size = Layout::compute_size(shape);
        let data: Vec<f64> = (0..size).map(|_| normal.sample(&mut rng)).collect();
        Self::new_with_spec(data, shape, device, dtype)
    }

    // with

    pub fn with_shape(&mut self, shape: &[usize]) -> Result<()> {
        self.metadata.layout.view(shape)
    }

    pub fn with_dtype(&mut self, dtype: DType) -> Result<()> {
        if self.dtype() != dtype {
            self.data.buffer = self.buffer().to_dtype(dtype).into();
        }
        Ok(())
    }

    pub fn with_device(&mut self, device: Device) -> Result<()> {
        if self.device() != device {
            self.data.buffer = self.buffer().to_device(device).into();
        }
        Ok(())
    }

    pub fn to_device(&self, device: Device) -> Result<Self> {
        let mut tensor = self.clone();
        tensor.with_device(device)?;
        Ok(tensor)
    }

    pub fn to_dtype(&self, dtype: DType) -> Result<Self> {
        let mut tensor = self.clone();
        tensor.with_dtype(dtype)?;
        Ok(tensor)
    }
}
