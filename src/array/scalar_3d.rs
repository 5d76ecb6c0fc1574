use super::Scalar2D;
use crate::prelude::*;

#[derive(Deref, DerefMut, Into, Clone, PartialEq, Default, Debug)]
/// A scalar point field (such as pressure or density) laid out on the structured grid.
///
/// The array shape is `(N3, N2, N1)`: the reported dimensions in reverse, so the last
/// axis is the one that varies fastest in the file.
pub struct Scalar3D<NUM>(Array3<NUM>);

impl<NUM> Scalar3D<NUM>
where
    NUM: Clone,
{
    /// Construct a `Scalar3D` from an array.
    pub fn new(arr: Array3<NUM>) -> Self {
        Self(arr)
    }

    /// Reshape a flat point-ordered buffer onto the grid
    pub fn from_flat(values: &[NUM], dims: Dimensions) -> Result<Self, ndarray::ShapeError> {
        crate::array::reshape_grid(values, dims).map(Self)
    }

    /// get the array that this type wraps.
    /// usually this method is not required because `Scalar3D` implements
    /// [`DerefMut`](std::ops::DerefMut) and [`Deref`](std::ops::Deref)
    pub fn inner(self) -> Array3<NUM> {
        self.0
    }

    /// Cut the plane at `index` along grid axis `axis` (0, 1 or 2).
    ///
    /// Returns `None` if the index is past the end of that axis.
    pub fn plane(&self, axis: usize, index: usize) -> Option<Scalar2D<NUM>> {
        let axis = ndarray::Axis(axis);

        if index >= self.0.len_of(axis) {
            return None;
        }

        Some(Scalar2D::new(self.0.index_axis(axis, index).to_owned()))
    }
}

#[test]
fn plane_cuts() {
    let dims = Dimensions::new(2, 3, 4);
    let flat: Vec<f64> = (0..24).map(|x| x as f64).collect();
    let grid = Scalar3D::from_flat(&flat, dims).unwrap();

    let first = grid.plane(0, 1).unwrap();
    assert_eq!(first.dim(), (3, 2));
    assert_eq!(first[[0, 0]], 6.0);
    assert_eq!(first[[2, 1]], 11.0);

    let second = grid.plane(1, 2).unwrap();
    assert_eq!(second.dim(), (4, 2));
    assert_eq!(second[[1, 0]], 10.0);

    let third = grid.plane(2, 0).unwrap();
    assert_eq!(third.dim(), (4, 3));
    assert_eq!(third[[3, 2]], 22.0);

    assert!(grid.plane(0, 4).is_none());
    assert!(grid.plane(2, 2).is_none());
}
