use crate::{
    atomic::AtomicAdd,
    utils::{chunk_size, ravel, unravel},
};
use rayon::prelude::*;

/// Maps output index `o` on one axis back to the input index it mirrors.
///
/// `n` is the input extent on that axis. A single reflection is applied at each
/// border, so the result is only in range when `pad_before < n` and
/// `pad_after < n`; callers are expected to have checked that.
#[inline]
pub fn reflect_index(o: usize, n: usize, pad_before: usize) -> usize {
    let last = n as isize - 1;
    let mut i = o as isize - pad_before as isize;
    if i < 0 {
        i = -i;
    }
    if i > last {
        i = 2 * last - i;
    }
    debug_assert!(
        (0..=last).contains(&i),
        "reflection of output index {} (pad {}) escapes axis of size {}",
        o,
        pad_before,
        n
    );
    i as usize
}

/// Shape information for one 3D reflection pass.
///
/// Leading axes (batch and channel) are folded into `planes`; the three
/// trailing axes are listed in (t, h, w) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pad3dGeometry {
    pub planes: usize,
    pub input: [usize; 3],
    pub output: [usize; 3],
    pub pad_before: [usize; 3],
}

impl Pad3dGeometry {
    pub fn num_els_in(&self) -> usize {
        self.planes * self.input.iter().product::<usize>()
    }

    pub fn num_els_out(&self) -> usize {
        self.planes * self.output.iter().product::<usize>()
    }

    /// Flat input index read by the flat output index `out_idx`.
    #[inline]
    pub fn source_index(&self, out_idx: usize) -> usize {
        let (plane, [t, h, w]) = unravel(out_idx, self.output);
        let src = [
            reflect_index(t, self.input[0], self.pad_before[0]),
            reflect_index(h, self.input[1], self.pad_before[1]),
            reflect_index(w, self.input[2], self.pad_before[2]),
        ];
        ravel(plane, src, self.input)
    }
}

/// Forward gather: every output cell copies the input cell it reflects from.
///
/// Each chunk of `out` is owned by exactly one worker, so no synchronization
/// is needed.
pub fn pad3d_with_reflection<T: Copy + Send + Sync>(geometry: &Pad3dGeometry, inp: &[T], out: &mut [T]) {
    debug_assert_eq!(inp.len(), geometry.num_els_in());
    debug_assert_eq!(out.len(), geometry.num_els_out());

    let chunk_size = chunk_size(out.len());
    out.par_chunks_mut(chunk_size).enumerate().for_each(|(chunk_idx, chunk)| {
        let start_idx = chunk_idx * chunk_size;
        for (local_idx, out_val) in chunk.iter_mut().enumerate() {
            *out_val = inp[geometry.source_index(start_idx + local_idx)];
        }
    });
}

/// Backward scatter-add through per-cell atomics.
///
/// Values already present in `grad_in` are kept and added to.
pub fn pad3d_with_reflection_backward_atomic<T: AtomicAdd>(geometry: &Pad3dGeometry, grad_out: &[T], grad_in: &mut [T]) {
    debug_assert_eq!(grad_in.len(), geometry.num_els_in());
    debug_assert_eq!(grad_out.len(), geometry.num_els_out());

    let cells: Vec<T::Cell> = grad_in.iter().map(|&v| v.to_cell()).collect();

    let chunk_size = chunk_size(grad_out.len());
    grad_out.par_chunks(chunk_size).enumerate().for_each(|(chunk_idx, chunk)| {
        let start_idx = chunk_idx * chunk_size;
        for (local_idx, &g) in chunk.iter().enumerate() {
            T::fetch_add(&cells[geometry.source_index(start_idx + local_idx)], g);
        }
    });

    for (dst, cell) in grad_in.iter_mut().zip(cells) {
        *dst = T::from_cell(cell);
    }
}

/// Backward scatter-add through per-worker partial buffers.
///
/// Each worker accumulates into a private buffer the size of `grad_in`; the
/// partials are summed pairwise once the parallel phase is over.
pub fn pad3d_with_reflection_backward_partitioned<T: AtomicAdd>(geometry: &Pad3dGeometry, grad_out: &[T], grad_in: &mut [T]) {
    debug_assert_eq!(grad_in.len(), geometry.num_els_in());
    debug_assert_eq!(grad_out.len(), geometry.num_els_out());

    let num_els_in = grad_in.len();
    let chunk_size = chunk_size(grad_out.len());

    let merged = grad_out
        .par_chunks(chunk_size)
        .enumerate()
        .fold(
            || vec![T::ZERO; num_els_in],
            |mut local, (chunk_idx, chunk)| {
                let start_idx = chunk_idx * chunk_size;
                for (local_idx, &g) in chunk.iter().enumerate() {
                    let in_idx = geometry.source_index(start_idx + local_idx);
                    local[in_idx] = local[in_idx] + g;
                }
                local
            },
        )
        .reduce(
            || vec![T::ZERO; num_els_in],
            |mut acc, partial| {
                for (a, p) in acc.iter_mut().zip(partial) {
                    *a = *a + p;
                }
                acc
            },
        );

    for (dst, v) in grad_in.iter_mut().zip(merged) {
        *dst = *dst + v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn width_only(n: usize, pad_l: usize, pad_r: usize) -> Pad3dGeometry {
        Pad3dGeometry {
            planes: 1,
            input: [1, 1, n],
            output: [1, 1, n + pad_l + pad_r],
            pad_before: [0, 0, pad_l],
        }
    }

    #[test]
    fn reflect_index_mirrors_both_borders() {
        assert_eq!(reflect_index(0, 4, 2), 2);
        assert_eq!(reflect_index(1, 4, 2), 1);
        assert_eq!(reflect_index(2, 4, 2), 0);
        assert_eq!(reflect_index(5, 4, 2), 3);
        assert_eq!(reflect_index(6, 4, 2), 2);
        assert_eq!(reflect_index(7, 4, 2), 1);
    }

    #[test]
    fn reflect_index_is_identity_without_padding() {
        for o in 0..5 {
            assert_eq!(reflect_index(o, 5, 0), o);
        }
    }

    #[test]
    fn forward_reflects_a_single_row() {
        let geometry = width_only(4, 2, 2);
        let inp = [1.0f32, 2.0, 3.0, 4.0];
        let mut out = vec![0.0f32; geometry.num_els_out()];
        pad3d_with_reflection(&geometry, &inp, &mut out);
        assert_eq!(out, vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 3.0, 2.0]);
    }

    #[test]
    fn forward_keeps_planes_apart() {
        let geometry = Pad3dGeometry {
            planes: 2,
            input: [1, 1, 2],
            output: [1, 1, 4],
            pad_before: [0, 0, 1],
        };
        let inp = [1.0f64, 2.0, 10.0, 20.0];
        let mut out = vec![0.0f64; geometry.num_els_out()];
        pad3d_with_reflection(&geometry, &inp, &mut out);
        assert_eq!(out, vec![2.0, 1.0, 2.0, 1.0, 20.0, 10.0, 20.0, 10.0]);
    }

    #[test]
    fn backward_strategies_agree() {
        let geometry = width_only(4, 2, 2);
        let grad_out: Vec<f32> = (1..=8).map(|v| v as f32).collect();

        let mut atomic = vec![0.0f32; 4];
        pad3d_with_reflection_backward_atomic(&geometry, &grad_out, &mut atomic);
        let mut partitioned = vec![0.0f32; 4];
        pad3d_with_reflection_backward_partitioned(&geometry, &grad_out, &mut partitioned);

        assert_eq!(atomic, vec![3.0, 14.0, 13.0, 6.0]);
        assert_eq!(partitioned, atomic);
    }

    #[test]
    fn backward_accumulates_onto_existing_values() {
        let geometry = width_only(2, 1, 0);
        let grad_out = [1.0f64, 1.0, 1.0];

        let mut grad_in = vec![10.0f64, 10.0];
        pad3d_with_reflection_backward_atomic(&geometry, &grad_out, &mut grad_in);
        assert_eq!(grad_in, vec![11.0, 12.0]);

        let mut grad_in = vec![10.0f64, 10.0];
        pad3d_with_reflection_backward_partitioned(&geometry, &grad_out, &mut grad_in);
        assert_eq!(grad_in, vec![11.0, 12.0]);
    }
}
