#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placement of a tensor's storage.
///
/// `CPU` is plain host memory. `Pool(id)` is host memory owned by the `id`-th
/// worker pool of the [`pool`](crate::pool) registry; kernels for tensors on a
/// pool run on that pool's threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Device {
    CPU,
    Pool(usize),
}

impl Device {
    pub fn name(&self) -> String {
        match self {
            Device::CPU => "CPU".to_string(),
            Device::Pool(id) => format!("Worker Pool {}", id),
        }
    }

    pub fn is_pool(&self) -> bool {
        matches!(self, Device::Pool(_))
    }
}

thread_local! {
    static DEFAULT_DEVICE: std::cell::Cell<Device> = const { std::cell::Cell::new(Device::CPU) };
}

pub fn get_default_device() -> Device {
    DEFAULT_DEVICE.with(|d| d.get())
}

pub fn set_default_device(device: Device) {
    DEFAULT_DEVICE.with(|d| d.set(device));
}

pub fn auto_set_device() {
    set_default_device(Device::Pool(0));
}
