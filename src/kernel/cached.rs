use super::Kernel;
use caches::{Cache, RawLRU};
use ndarray::ArrayView2;

/// A struct to cache rows of a kernel matrix over a fixed set of points.
///
/// Row `i` holds the kernel values between every point and point `i`.
pub struct CachedKernel<'a, K>
where
    K: Kernel,
{
    cache: RawLRU<usize, usize>,
    data: Vec<Vec<f64>>,
    points: ArrayView2<'a, f64>,
    base: &'a K,
}

impl<'a, K> CachedKernel<'a, K>
where
    K: Kernel,
{
    /// Generates a cached version of the kernel matrix of `base` over `points`.
    ///
    /// At most `capacity` rows (and at least one) are held at a time.
    pub fn from(base: &'a K, points: ArrayView2<'a, f64>, capacity: usize) -> CachedKernel<'a, K> {
        CachedKernel {
            cache: new_lru(capacity),
            data: Vec::new(),
            points,
            base,
        }
    }

    /// Returns the number of points.
    pub fn size(&self) -> usize {
        self.points.nrows()
    }

    /// Provides the requested rows of the kernel matrix to `fun`.
    pub fn use_rows(&mut self, idxs: &[usize], fun: &mut dyn FnMut(Vec<&[f64]>)) {
        let n = self.size();
        let poss: Vec<_> = idxs
            .iter()
            .map(|&idx| match self.cache.get(&idx) {
                Some(&pos) => pos,
                None => {
                    let pos = if self.data.len() < self.cache.cap() {
                        self.data.push(vec![0.0; n]);
                        self.data.len() - 1
                    } else {
                        match self.cache.remove_lru() {
                            Some((_idx, pos)) => pos,
                            None => {
                                self.data.push(vec![0.0; n]);
                                self.data.len() - 1
                            }
                        }
                    };
                    self.base
                        .compute_row(self.points, self.points.row(idx), &mut self.data[pos]);
                    self.cache.put(idx, pos);
                    pos
                }
            })
            .collect();
        fun(poss
            .into_iter()
            .map(|pos| self.data[pos].as_slice())
            .collect());
    }

    /// Returns the diagonal entry belonging to point `i`.
    pub fn diag(&self, i: usize) -> f64 {
        let xi = self.points.row(i);
        self.base.compute_elementwise(xi, xi)
    }
}

fn new_lru(capacity: usize) -> RawLRU<usize, usize> {
    RawLRU::new(capacity.max(1)).expect("cache capacity is positive")
}
