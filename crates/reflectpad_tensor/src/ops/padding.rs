use crate::{BackwardFn, Tensor, TensorNode};
use reflectpad_core::{
    be::ops::padding,
    config::{self, Accumulation},
    error::{Error, Result},
    pad::PadSpec,
    pool,
};
use std::sync::Arc;

impl Tensor {
    /// Reflection-pads the three trailing axes of a [C,T,H,W] or [N,C,T,H,W]
    /// tensor. `pad` is (left, right, top, bottom, front, back).
    pub fn pad_with_reflection3d(&self, pad: &[usize]) -> Result<Tensor> {
        let pad = PadSpec::try_from(pad)?;
        self.reflection_pad3d(&pad)
    }

    pub fn reflection_pad3d(&self, pad: &PadSpec) -> Result<Tensor> {
        let output_shape = pad.output_shape(self.shape())?;
        pool::ensure_supported(self.device())?;

        let mut result = Self::zeros_with_spec(&output_shape, self.device(), self.dtype())?;
        result.with_buffer_mut(|out_buf| padding::pad3d_with_reflection(out_buf, self.buffer(), self.shape(), pad))?;

        if self.requires_grad() {
            result.with_grad()?;

            let input_shape = self.shape().to_vec();
            let pad = *pad;

            let backward_fn: BackwardFn = Arc::new(move |_inputs: &[Tensor], grad_out: &Tensor| -> Result<Vec<Tensor>> {
                let grad_in = backward_into_shape(grad_out, &input_shape, &pad, config::get().accumulation)?;
                Ok(vec![grad_in])
            });

            let node = TensorNode::new("reflection_pad3d".to_string(), vec![self.clone()], Some(backward_fn));
            result.set_node(node);
        }

        Ok(result)
    }
}

fn backward_into_shape(grad_output: &Tensor, input_shape: &[usize], pad: &PadSpec, accumulation: Accumulation) -> Result<Tensor> {
    let expected_shape = pad.output_shape(input_shape)?;
    if grad_output.shape() != expected_shape.as_slice() {
        return Err(Error::ShapeMismatch {
            expected: expected_shape,
            got: grad_output.shape().to_vec(),
            msg: "grad_output must have the padded shape of the input".to_string(),
        });
    }
    pool::ensure_supported(grad_output.device())?;

    let mut grad_in = Tensor::zeros_with_spec(input_shape, grad_output.device(), grad_output.dtype())?;
    grad_in.with_buffer_mut(|in_buf| {
        padding::pad3d_with_reflection_backward(
            in_buf,
            grad_output.buffer(),
            grad_output.shape(),
            input_shape,
            pad,
            accumulation,
        )
    })?;
    Ok(grad_in)
}

/// Functional form of [`Tensor::pad_with_reflection3d`].
pub fn reflection_pad3d(input: &Tensor, pad: &[usize]) -> Result<Tensor> {
    input.pad_with_reflection3d(pad)
}

/// Gradient of [`reflection_pad3d`] with respect to `input`.
///
/// Only the shape of `input` is consulted. The accumulation strategy comes
/// from the engine configuration.
pub fn reflection_pad3d_backward(grad_output: &Tensor, input: &Tensor, pad: &[usize]) -> Result<Tensor> {
    let pad = PadSpec::try_from(pad)?;
    backward_into_shape(grad_output, input.shape(), &pad, config::get().accumulation)
}
