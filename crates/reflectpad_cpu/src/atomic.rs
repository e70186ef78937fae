use half::{bf16, f16};
use std::ops::Add;
use std::sync::atomic::{AtomicU16, AtomicU32, AtomicU64, Ordering};

/// Floating-point element that can be accumulated from many workers at once.
///
/// Each value is stored as its bit pattern inside an unsigned atomic of the same
/// width; `fetch_add` retries a compare-and-swap until the sum lands.
pub trait AtomicAdd: Copy + Send + Sync + Add<Output = Self> + 'static {
    const ZERO: Self;

    type Cell: Send + Sync;

    fn to_cell(self) -> Self::Cell;
    fn fetch_add(cell: &Self::Cell, value: Self);
    fn from_cell(cell: Self::Cell) -> Self;
}

macro_rules! atomic_add_impl {
    ($type:ty, $atomic:ty, $zero:expr) => {
        impl AtomicAdd for $type {
            const ZERO: Self = $zero;

            type Cell = $atomic;

            #[inline]
            fn to_cell(self) -> Self::Cell {
                <$atomic>::new(self.to_bits())
            }

            #[inline]
            fn fetch_add(cell: &Self::Cell, value: Self) {
                // The closure never returns None, so the update always succeeds.
                let _ = cell.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                    Some((<$type>::from_bits(bits) + value).to_bits())
                });
            }

            #[inline]
            fn from_cell(cell: Self::Cell) -> Self {
                <$type>::from_bits(cell.into_inner())
            }
        }
    };
}

atomic_add_impl!(bf16, AtomicU16, bf16::ZERO);
atomic_add_impl!(f16, AtomicU16, f16::ZERO);
atomic_add_impl!(f32, AtomicU32, 0.0f32);
atomic_add_impl!(f64, AtomicU64, 0.0f64);
