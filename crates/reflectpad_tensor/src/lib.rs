mod creation;
pub(crate) mod ops;
mod vec;

pub use ops::padding::{reflection_pad3d, reflection_pad3d_backward};

use reflectpad_core::{
    buffer::Buffer,
    device::Device,
    dtype::DType,
    error::{Error, Result},
    layout::Layout,
};
use log::trace;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct TensorData {
    buffer: Arc<Buffer>,
    grad: Option<Arc<Mutex<Option<Tensor>>>>,
}

#[derive(Clone)]
pub struct TensorMetadata {
    layout: Layout,
    requires_grad: bool,
}

#[allow(clippy::type_complexity)]
pub type BackwardFn = Arc<dyn Fn(&[Tensor], &Tensor) -> Result<Vec<Tensor>> + Send + Sync>;

#[derive(Clone)]
pub struct TensorNode {
    op_name: String,
    inputs: Vec<Tensor>,
    backward_fn: Option<BackwardFn>,
}

#[derive(Clone)]
pub struct Tensor {
    data: TensorData,
    metadata: TensorMetadata,
    node: Option<TensorNode>,
}

impl TensorNode {
    pub fn new(op_name: String, inputs: Vec<Tensor>, backward_fn: Option<BackwardFn>) -> Self {
        Self {
            op_name,
            inputs,
            backward_fn,
        }
    }

    pub fn op_name(&self) -> &str {
        &self.op_name
    }

    pub fn inputs(&self) -> &[Tensor] {
        &self.inputs
    }

    /// Runs the recorded backward closure, skipping it entirely when no input
    /// asks for a gradient.
    pub fn backward(&self, grad_output: &Tensor) -> Result<()> {
        if !self.inputs.iter().any(Tensor::requires_grad) {
            return Ok(());
        }
        if let Some(ref func) = self.backward_fn {
            trace!("backward through {}", self.op_name);
            let grads_for_inputs = (func)(&self.inputs, grad_output)?;
            for (input, grad_in) in self.inputs.iter().zip(grads_for_inputs.iter()) {
                if input.requires_grad() {
                    input.accumulate_grad(grad_in)?;
                    input._backward(grad_in)?;
                }
            }
        }
        Ok(())
    }
}

impl Tensor {
    pub(crate) fn from_parts(buffer: Buffer, layout: Layout) -> Self {
        Self {
            data: TensorData {
                buffer: Arc::new(buffer),
                grad: None,
            },
            metadata: TensorMetadata {
                layout,
                requires_grad: false,
            },
            node: None,
        }
    }

    // data

    pub fn buffer(&self) -> &Buffer {
        &self.data.buffer
    }

    pub fn with_buffer_mut<F, R>(&mut self, func: F) -> Result<R>
    where
        F: FnOnce(&mut Buffer) -> Result<R>,
    {
        let buffer = Arc::make_mut(&mut self.data.buffer);
        func(buffer)
    }

    pub fn layout(&self) -> &Layout {
        &self.metadata.layout
    }

    pub fn shape(&self) -> &[usize] {
        self.metadata.layout.shape()
    }

    pub fn strides(&self) -> &[usize] {
        self.metadata.layout.strides()
    }

    pub fn size(&self) -> usize {
        self.metadata.layout.size()
    }

    pub fn ndim(&self) -> usize {
        self.metadata.layout.ndim()
    }

    pub fn dim_size(&self, dim: usize) -> Option<usize> {
        self.metadata.layout.size_dim(dim)
    }

    // data - grad

    pub fn with_grad(&mut self) -> Result<()> {
        self.metadata.requires_grad = true;
        if self.data.grad.is_none() {
            self.data.grad = Some(Arc::new(Mutex::new(None)));
        }
        Ok(())
    }

    pub fn grad(&self) -> Result<Option<Tensor>> {
        Ok(match &self.data.grad {
            Some(g) => g.lock().map_err(|_| Error::GradLocked)?.clone(),
            None => None,
        })
    }

    pub fn accumulate_grad(&self, grad_in: &Tensor) -> Result<()> {
        if let Some(grad_mutex) = &self.data.grad {
            let mut guard = grad_mutex.lock().map_err(|_| Error::GradLocked)?;
            match guard.as_mut() {
                Some(existing) => existing.with_buffer_mut(|buffer| buffer.add_assign(grad_in.buffer()))?,
                None => *guard = Some(grad_in.detach()),
            }
        }
        Ok(())
    }

    pub fn zero_grad(&self) -> Result<()> {
        if let Some(grad_mutex) = &self.data.grad {
            *grad_mutex.lock().map_err(|_| Error::GradLocked)? = None;
        }

        if let Some(node) = &self.node {
            for input in node.inputs() {
                if input.requires_grad() {
                    input.zero_grad()?;
                }
            }
        }

        Ok(())
    }

    /// A copy of this tensor's value with no autograd history.
    pub fn detach(&self) -> Tensor {
        Self::from_parts(self.buffer().clone(), self.layout().clone())
    }

    // node

    pub fn node(&self) -> Option<&TensorNode> {
        self.node.as_ref()
    }

    pub fn set_node(&mut self, node: TensorNode) {
        self.node = Some(node);
    }

    pub fn backward(&self) -> Result<()> {
        if self.requires_grad() {
            let grad_out = Self::ones_like(self)?;
            self._backward(&grad_out)?;
        }

        Ok(())
    }

    fn _backward(&self, grad_out: &Tensor) -> Result<()> {
        if let Some(ref node) = self.node {
            node.backward(grad_out)?;
        }

        Ok(())
    }

    // etc

    pub fn device(&self) -> Device {
        self.data.buffer.device()
    }

    pub fn dtype(&self) -> DType {
        self.data.buffer.dtype()
    }

    pub fn requires_grad(&self) -> bool {
        self.metadata.requires_grad
    }
}
