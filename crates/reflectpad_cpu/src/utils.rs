/// Splits `num_els` cells into roughly one chunk per worker of the current pool.
#[inline]
pub fn chunk_size(num_els: usize) -> usize {
    (num_els / rayon::current_num_threads()) + 1
}

/// Row-major flat index of `coords` inside a volume of extent `dims`.
#[inline]
pub fn ravel(plane: usize, coords: [usize; 3], dims: [usize; 3]) -> usize {
    ((plane * dims[0] + coords[0]) * dims[1] + coords[1]) * dims[2] + coords[2]
}

/// Inverse of [`ravel`]: the plane and the (t, h, w) coordinate of a flat index.
#[inline]
pub fn unravel(idx: usize, dims: [usize; 3]) -> (usize, [usize; 3]) {
    let w = idx % dims[2];
    let rest = idx / dims[2];
    let h = rest % dims[1];
    let rest = rest / dims[1];
    let t = rest % dims[0];
    (rest / dims[0], [t, h, w])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ravel_inverts_unravel() {
        let dims = [3, 4, 5];
        for idx in 0..(2 * 3 * 4 * 5) {
            let (plane, coords) = unravel(idx, dims);
            assert_eq!(ravel(plane, coords, dims), idx);
        }
    }
}
