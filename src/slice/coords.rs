use super::{Axis, SliceError};
use crate::array::reshape_grid;
use crate::prelude::*;

/// The x, y and z point coordinates, each reshaped onto the `(N3, N2, N1)` grid
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrids {
    pub x: Array3<f64>,
    pub y: Array3<f64>,
    pub z: Array3<f64>,
}

impl CoordinateGrids {
    /// reshape every coordinate column of the mesh points
    pub fn from_mesh(mesh: &StructuredMesh, dims: Dimensions) -> Result<Self, SliceError> {
        let column = |component: usize| -> Result<Array3<f64>, SliceError> {
            let values: Vec<f64> = mesh.points().column(component).to_vec();

            reshape_grid(&values, dims).map_err(|_| SliceError::Reshape {
                field: "points".into(),
                expected: dims.num_points(),
                actual: values.len(),
            })
        };

        Ok(Self {
            x: column(0)?,
            y: column(1)?,
            z: column(2)?,
        })
    }

    /// coordinate grid for a physical axis
    pub fn get(&self, axis: Axis) -> &Array3<f64> {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}
