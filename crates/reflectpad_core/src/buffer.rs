use crate::{
    device::Device,
    dtype::{DType, Element},
    error::{Error, Result},
};
use half::{bf16, f16};

/// Typed host storage, one variant per supported element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Storage {
    BF16(Vec<bf16>),
    F16(Vec<f16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

/// Evaluates `$body` with `$v` bound to the vector inside any storage variant.
#[macro_export]
macro_rules! map_storage {
    ($storage:expr, |$v:ident| $body:expr) => {
        match $storage {
            $crate::buffer::Storage::BF16($v) => $body,
            $crate::buffer::Storage::F16($v) => $body,
            $crate::buffer::Storage::F32($v) => $body,
            $crate::buffer::Storage::F64($v) => $body,
        }
    };
}

/// Evaluates `$body` with `$d` and `$s` bound to two storages of the same
/// element type, or yields `DTypeMismatch`.
#[macro_export]
macro_rules! zip_storage {
    ($dst:expr, $src:expr, |$d:ident, $s:ident| $body:expr) => {
        match ($dst, $src) {
            ($crate::buffer::Storage::BF16($d), $crate::buffer::Storage::BF16($s)) => Ok($body),
            ($crate::buffer::Storage::F16($d), $crate::buffer::Storage::F16($s)) => Ok($body),
            ($crate::buffer::Storage::F32($d), $crate::buffer::Storage::F32($s)) => Ok($body),
            ($crate::buffer::Storage::F64($d), $crate::buffer::Storage::F64($s)) => Ok($body),
            (dst, src) => Err($crate::error::Error::DTypeMismatch {
                expected: dst.dtype(),
                got: src.dtype(),
            }),
        }
    };
}

impl Storage {
    pub fn zeros(len: usize, dtype: DType) -> Self {
        match dtype {
            DType::BF16 => Self::BF16(vec![bf16::ZERO; len]),
            DType::F16 => Self::F16(vec![f16::ZERO; len]),
            DType::F32 => Self::F32(vec![0.0; len]),
            DType::F64 => Self::F64(vec![0.0; len]),
        }
    }

    pub fn from_vec<T: Element>(data: Vec<T>) -> Self {
        Self::from_f64_iter(T::DTYPE, data.into_iter().map(Element::to_f64))
    }

    fn from_f64_iter(dtype: DType, values: impl Iterator<Item = f64>) -> Self {
        match dtype {
            DType::BF16 => Self::BF16(values.map(bf16::from_f64).collect()),
            DType::F16 => Self::F16(values.map(f16::from_f64).collect()),
            DType::F32 => Self::F32(values.map(|v| v as f32).collect()),
            DType::F64 => Self::F64(values.collect()),
        }
    }

    pub fn dtype(&self) -> DType {
        match self {
            Self::BF16(_) => DType::BF16,
            Self::F16(_) => DType::F16,
            Self::F32(_) => DType::F32,
            Self::F64(_) => DType::F64,
        }
    }

    pub fn len(&self) -> usize {
        map_storage!(self, |v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        map_storage!(self, |v| v.iter().map(|&x| T::from_f64(Element::to_f64(x))).collect())
    }

    pub fn to_dtype(&self, dtype: DType) -> Self {
        if dtype == self.dtype() {
            return self.clone();
        }
        map_storage!(self, |v| Self::from_f64_iter(dtype, v.iter().map(|&x| Element::to_f64(x))))
    }
}

/// Storage together with the device it is placed on.
#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    storage: Storage,
    device: Device,
}

impl Buffer {
    pub fn zeros(len: usize, device: Device, dtype: DType) -> Self {
        Self {
            storage: Storage::zeros(len, dtype),
            device,
        }
    }

    pub fn from_vec<T: Element>(data: Vec<T>, device: Device) -> Self {
        Self {
            storage: Storage::from_vec(data),
            device,
        }
    }

    pub fn from_storage(storage: Storage, device: Device) -> Self {
        Self { storage, device }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }
    pub fn device(&self) -> Device {
        self.device
    }
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        self.storage.to_vec()
    }

    pub fn to_dtype(&self, dtype: DType) -> Self {
        Self {
            storage: self.storage.to_dtype(dtype),
            device: self.device,
        }
    }

    /// Places a copy of this buffer on `device`. All devices share host memory,
    /// so this is a copy plus a new placement tag.
    pub fn to_device(&self, device: Device) -> Self {
        Self {
            storage: self.storage.clone(),
            device,
        }
    }

    /// Elementwise `self += other` on the host.
    pub fn add_assign(&mut self, other: &Buffer) -> Result<()> {
        if self.len() != other.len() {
            return Err(Error::ShapeMismatch {
                expected: vec![self.len()],
                got: vec![other.len()],
                msg: "add_assign".to_string(),
            });
        }
        if self.device != other.device {
            return Err(Error::DeviceMismatch {
                expected: self.device,
                got: other.device,
            });
        }
        zip_storage!(&mut self.storage, &other.storage, |dst, src| {
            for (d, &s) in dst.iter_mut().zip(src.iter()) {
                *d = *d + s;
            }
        })
    }
}
