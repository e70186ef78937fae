//! Registry of the worker pools backing `Device::Pool`.

use crate::{
    config,
    device::Device,
    error::{Error, Result},
};
use log::trace;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::OnceLock;

static POOLS: OnceLock<Vec<ThreadPool>> = OnceLock::new();

fn build_pools(config: &config::EngineConfig) -> Result<Vec<ThreadPool>> {
    (0..config.pools)
        .map(|id| -> Result<ThreadPool> {
            let mut builder = ThreadPoolBuilder::new().thread_name(move |i| format!("reflectpad-pool{}-{}", id, i));
            if let Some(num_threads) = config.num_threads {
                builder = builder.num_threads(num_threads);
            }
            let pool = builder.build()?;
            trace!("built worker pool {} with {} threads", id, pool.current_num_threads());
            Ok(pool)
        })
        .collect()
}

fn pools() -> Result<&'static [ThreadPool]> {
    if let Some(pools) = POOLS.get() {
        return Ok(pools.as_slice());
    }
    let built = build_pools(config::get())?;
    // A concurrent caller may have won the race; its pools are kept and ours dropped.
    Ok(POOLS.get_or_init(move || built).as_slice())
}

pub fn num_pools() -> Result<usize> {
    Ok(pools()?.len())
}

/// Whether padding kernels can run for tensors placed on `device`.
pub fn supports(device: Device) -> bool {
    match device {
        Device::CPU => false,
        Device::Pool(id) => num_pools().map(|n| id < n).unwrap_or(false),
    }
}

pub fn ensure_supported(device: Device) -> Result<()> {
    if supports(device) {
        Ok(())
    } else {
        Err(Error::UnsupportedDevice(device))
    }
}

pub fn current_num_threads(device: Device) -> Result<usize> {
    Ok(pool(device)?.current_num_threads())
}

fn pool(device: Device) -> Result<&'static ThreadPool> {
    match device {
        Device::CPU => Err(Error::UnsupportedDevice(device)),
        Device::Pool(id) => pools()?.get(id).ok_or(Error::UnsupportedDevice(device)),
    }
}

/// Runs `op` inside the worker pool behind `device`, blocking until it returns.
pub fn install<R, OP>(device: Device, op: OP) -> Result<R>
where
    R: Send,
    OP: FnOnce() -> R + Send,
{
    Ok(pool(device)?.install(op))
}
