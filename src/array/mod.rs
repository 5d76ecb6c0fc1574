//! container types for gridded data pulled out of a mesh

mod scalar_2d;
mod scalar_3d;

pub use scalar_2d::Scalar2D;
pub use scalar_3d::Scalar3D;

use crate::mesh::Dimensions;
use num_traits::Float;

/// Reinterpret a flat, point-ordered buffer as a row-major `(N3, N2, N1)` array.
///
/// Element `[k, j, i]` of the output is element `k * N2 * N1 + j * N1 + i` of the input,
/// which is the vtk point ordering (first axis fastest) viewed from the slowest axis down.
pub fn reshape_grid<T: Clone>(
    values: &[T],
    dims: Dimensions,
) -> Result<ndarray::Array3<T>, ndarray::ShapeError> {
    ndarray::Array3::from_shape_vec(dims.grid_shape(), values.to_vec())
}

/// smallest and largest value of an iterator, skipping NaN
pub fn min_max<F, I>(values: I) -> Option<(F, F)>
where
    F: Float,
    I: IntoIterator<Item = F>,
{
    values
        .into_iter()
        .filter(|x| !x.is_nan())
        .fold(None, |acc, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
}
