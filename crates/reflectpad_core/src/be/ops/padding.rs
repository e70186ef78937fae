//! Reflection padding engine.
//!
//! Both entry points validate every argument before touching a buffer, then
//! run the kernel inside the worker pool the buffers are placed on.

use crate::{
    buffer::Buffer,
    config::Accumulation,
    device::Device,
    error::{Error, Result},
    pad::PadSpec,
    pool, zip_storage,
};
use log::debug;
use reflectpad_cpu::ops::padding::{
    pad3d_with_reflection as pad3d_kernel, pad3d_with_reflection_backward_atomic, pad3d_with_reflection_backward_partitioned,
    Pad3dGeometry,
};

fn check_placement(dst: &Buffer, src: &Buffer) -> Result<Device> {
    let device = src.device();
    pool::ensure_supported(device)?;
    if dst.device() != device {
        return Err(Error::DeviceMismatch {
            expected: device,
            got: dst.device(),
        });
    }
    if dst.dtype() != src.dtype() {
        return Err(Error::DTypeMismatch {
            expected: src.dtype(),
            got: dst.dtype(),
        });
    }
    Ok(device)
}

fn check_len(buffer: &Buffer, expected_shape: &[usize], what: &str) -> Result<()> {
    let expected: usize = expected_shape.iter().product();
    if buffer.len() != expected {
        return Err(Error::ShapeMismatch {
            expected: expected_shape.to_vec(),
            got: vec![buffer.len()],
            msg: format!("{} buffer holds {} elements", what, buffer.len()),
        });
    }
    Ok(())
}

/// Writes the reflection-padded `input` into `output`.
///
/// `output` must already hold exactly as many elements as the padded shape.
pub fn pad3d_with_reflection(output: &mut Buffer, input: &Buffer, input_shape: &[usize], pad: &PadSpec) -> Result<()> {
    let geometry = pad.geometry(input_shape)?;
    let output_shape = pad.output_shape(input_shape)?;
    let device = check_placement(output, input)?;
    check_len(input, input_shape, "input")?;
    check_len(output, &output_shape, "output")?;

    debug!(
        "reflection_pad3d forward: {:?} -> {:?}, pad {:?}, {} on {}",
        input_shape,
        output_shape,
        pad.as_array(),
        input.dtype().as_str(),
        device.name()
    );

    let (dst, src) = (output.storage_mut(), input.storage());
    pool::install(device, move || zip_storage!(dst, src, |out, inp| pad3d_kernel(&geometry, inp, out)))?
}

/// Accumulates `grad_output` back onto `grad_input` through the reflection map.
///
/// `input_shape` is the shape of the tensor that was padded; `grad_output_shape`
/// must equal its padded shape. Contributions are added to whatever
/// `grad_input` already holds.
pub fn pad3d_with_reflection_backward(
    grad_input: &mut Buffer,
    grad_output: &Buffer,
    grad_output_shape: &[usize],
    input_shape: &[usize],
    pad: &PadSpec,
    accumulation: Accumulation,
) -> Result<()> {
    let geometry = pad.geometry(input_shape)?;
    let expected_shape = pad.output_shape(input_shape)?;
    if grad_output_shape != expected_shape.as_slice() {
        return Err(Error::ShapeMismatch {
            expected: expected_shape,
            got: grad_output_shape.to_vec(),
            msg: "grad_output must have the padded shape of the input".to_string(),
        });
    }
    let device = check_placement(grad_input, grad_output)?;
    check_len(grad_output, grad_output_shape, "grad_output")?;
    check_len(grad_input, input_shape, "grad_input")?;

    debug!(
        "reflection_pad3d backward: {:?} -> {:?}, pad {:?}, {} on {}, {} accumulation",
        grad_output_shape,
        input_shape,
        pad.as_array(),
        grad_output.dtype().as_str(),
        device.name(),
        accumulation.as_str()
    );

    let (dst, src) = (grad_input.storage_mut(), grad_output.storage());
    pool::install(device, move || {
        zip_storage!(dst, src, |grad_in, grad_out| scatter(accumulation, &geometry, grad_out, grad_in))
    })?
}

fn scatter<T: reflectpad_cpu::atomic::AtomicAdd>(accumulation: Accumulation, geometry: &Pad3dGeometry, grad_out: &[T], grad_in: &mut [T]) {
    match accumulation {
        Accumulation::Atomic => pad3d_with_reflection_backward_atomic(geometry, grad_out, grad_in),
        Accumulation::Partitioned => pad3d_with_reflection_backward_partitioned(geometry, grad_out, grad_in),
    }
}
