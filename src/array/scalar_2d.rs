use crate::prelude::*;
use num_traits::Float;

#[derive(Deref, DerefMut, Into, Clone, PartialEq, Default, Debug)]
/// A 2D plane of scalar values cut out of a [`Scalar3D`](crate::array::Scalar3D).
///
/// Rows follow the slower of the two remaining grid axes and columns the faster one.
pub struct Scalar2D<NUM>(Array2<NUM>);

impl<NUM> Scalar2D<NUM> {
    /// Construct a `Scalar2D` from an array.
    pub fn new(arr: Array2<NUM>) -> Self {
        Self(arr)
    }

    /// get the array that this type wraps.
    pub fn inner(self) -> Array2<NUM> {
        self.0
    }
}

impl<NUM> Scalar2D<NUM>
where
    NUM: Float,
{
    /// smallest and largest finite value in the plane
    pub fn range(&self) -> Option<(NUM, NUM)> {
        crate::array::min_max(self.0.iter().copied())
    }
}

#[test]
fn plane_range() {
    let arr = Array2::from_shape_vec((2, 2), vec![4.0, -2.0, f64::NAN, 1.5]).unwrap();
    let plane = Scalar2D::new(arr);

    assert_eq!(plane.range(), Some((-2.0, 4.0)));
    assert_eq!(plane.dim(), (2, 2));
}
