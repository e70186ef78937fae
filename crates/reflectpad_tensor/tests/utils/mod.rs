#![allow(dead_code)]

use reflectpad_core::{
    device::{set_default_device, Device},
    dtype::{DType, Element},
    error::Result,
};
use reflectpad_tensor::Tensor;

// Helper functions
pub fn setup_device() {
    set_default_device(Device::Pool(0));
}

pub fn setup_tensor<T: Element>(data: Vec<T>, shape: &[usize], dtype: DType) -> Result<Tensor> {
    setup_device();

    let mut tensor = Tensor::new(data)?;
    tensor.with_shape(shape)?;
    tensor.with_dtype(dtype)?;
    Ok(tensor)
}

pub fn setup_grad_tensor<T: Element>(data: Vec<T>, shape: &[usize], dtype: DType) -> Result<Tensor> {
    let mut tensor = setup_tensor(data, shape, dtype)?;
    tensor.with_grad()?;
    Ok(tensor)
}

/// `0.0, 1.0, 2.0, ...` reshaped to `shape`.
pub fn arange_tensor(shape: &[usize], dtype: DType) -> Result<Tensor> {
    let size = shape.iter().product::<usize>();
    setup_tensor((0..size).map(|v| v as f32).collect(), shape, dtype)
}

pub fn assert_close_vectors(actual: &[f64], expected: &[f64], epsilon: f64, msg: &str) {
    assert_eq!(actual.len(), expected.len(), "{}: vectors have different lengths", msg);
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            (a - e).abs() < epsilon,
            "{}. Element at position {} not close enough: {} vs {} (diff: {})",
            msg,
            i,
            a,
            e,
            (a - e).abs()
        );
    }
}

/// Exact comparison for f32/f64, tolerance for the half types.
pub fn assert_matches_dtype(actual: &[f64], expected: &[f64], dtype: DType, msg: &str) {
    if dtype.is_half() {
        assert_close_vectors(actual, expected, 0.01, msg);
    } else {
        assert_eq!(actual, expected, "{}", msg);
    }
}

#[macro_export]
macro_rules! test_ops {
    ([$($op:ident),*]) => {
        $(
            mod $op {
                use super::*;
                use paste::paste;

                paste! {
                    #[test]
                    fn bf16() -> Result<()> {
                        test_functions::[<$op _test>](DType::BF16)
                    }

                    #[test]
                    fn f16() -> Result<()> {
                        test_functions::[<$op _test>](DType::F16)
                    }

                    #[test]
                    fn f32() -> Result<()> {
                        test_functions::[<$op _test>](DType::F32)
                    }

                    #[test]
                    fn f64() -> Result<()> {
                        test_functions::[<$op _test>](DType::F64)
                    }
                }
            }
        )*
    };
}
