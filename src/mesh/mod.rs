//! # Mesh Information
//!
//! A [`StructuredMesh`] holds everything a reader pulls out of a structured grid file:
//! the number of points along each axis ([`Dimensions`]), the coordinates of every point,
//! and the named arrays sampled at those points.
//!
//! Points are stored in file order, which for every structured vtk dataset means the first
//! axis varies fastest. Point data arrays are aligned index-for-index with the points. Neither
//! the points nor the arrays are checked against the dimensions when a mesh is built; a mismatch
//! only becomes an error once something tries to reshape the data onto the grid.
//!
//! Rectilinear grids and image data only store per-axis locations. Use
//! [`StructuredMesh::from_axis_locations`] to expand them into explicit points.

mod dimensions;

pub use dimensions::error::InvalidExtent;
pub use dimensions::{Dimensions, Extent};

use crate::prelude::*;

/// The kind of dataset a mesh was read from. Only used for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DatasetKind {
    #[display(fmt = "StructuredGrid")]
    StructuredGrid,
    #[display(fmt = "RectilinearGrid")]
    RectilinearGrid,
    #[display(fmt = "StructuredPoints")]
    StructuredPoints,
}

/// A named array sampled at every point of the mesh.
///
/// `values` is flat: a vector array with 3 components stores `x0 y0 z0 x1 y1 z1 ...`
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct PointArray {
    pub name: String,
    pub components: usize,
    pub values: Vec<f64>,
}

impl PointArray {
    /// a single component array
    pub fn scalar<T: Into<String>>(name: T, values: Vec<f64>) -> Self {
        Self::new(name.into(), 1, values)
    }

    /// number of tuples in the array
    pub fn num_tuples(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.values.len() / self.components
        }
    }

    /// the shape of the array: `[n]` for scalars, `[n, components]` otherwise
    pub fn shape(&self) -> Vec<usize> {
        if self.components == 1 {
            vec![self.values.len()]
        } else {
            vec![self.num_tuples(), self.components]
        }
    }
}

/// Wrapper that formats an array shape like `(24,)` or `(24, 3)`
pub struct Shape<'a>(pub &'a [usize]);

impl fmt::Display for Shape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [single] => write!(f, "({single},)"),
            dims => {
                write!(f, "(")?;
                for (idx, dim) in dims.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{dim}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// An in-memory structured grid: dimensions, point coordinates and point data.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredMesh {
    kind: DatasetKind,
    dimensions: Dimensions,
    /// `(n, 3)` array of point coordinates
    points: Array2<f64>,
    point_data: Vec<PointArray>,
}

impl StructuredMesh {
    /// Construct a mesh from an `(n, 3)` array of points
    pub fn new(kind: DatasetKind, dimensions: Dimensions, points: Array2<f64>) -> Self {
        Self {
            kind,
            dimensions,
            points,
            point_data: Vec::new(),
        }
    }

    /// Construct a mesh from a flat `x0 y0 z0 x1 y1 z1 ...` coordinate buffer.
    ///
    /// A trailing partial point is dropped.
    pub fn from_flat_points(kind: DatasetKind, dimensions: Dimensions, mut flat: Vec<f64>) -> Self {
        let num_points = flat.len() / 3;
        flat.truncate(num_points * 3);

        // the length is a multiple of 3 so the shape always matches
        let points = Array2::from_shape_vec((num_points, 3), flat)
            .unwrap_or_else(|_| Array2::zeros((0, 3)));

        Self::new(kind, dimensions, points)
    }

    /// Expand per-axis point locations (rectilinear grids, image data) into explicit points
    /// with the x location varying fastest.
    ///
    /// # Panics
    ///
    /// Panics if the expanded coordinate buffer cannot be allocated. Readers go through
    /// [`StructuredMesh::try_from_axis_locations`] instead.
    pub fn from_axis_locations(
        kind: DatasetKind,
        x_locations: &[f64],
        y_locations: &[f64],
        z_locations: &[f64],
    ) -> Self {
        let dimensions = Dimensions::new(x_locations.len(), y_locations.len(), z_locations.len());

        let mut flat = Vec::with_capacity(dimensions.num_points().saturating_mul(3));
        expand_axes(&mut flat, x_locations, y_locations, z_locations);

        Self::from_flat_points(kind, dimensions, flat)
    }

    /// Like [`StructuredMesh::from_axis_locations`], but returns `None` when the point count
    /// overflows or the coordinate buffer cannot be allocated.
    pub fn try_from_axis_locations(
        kind: DatasetKind,
        x_locations: &[f64],
        y_locations: &[f64],
        z_locations: &[f64],
    ) -> Option<Self> {
        let dimensions = Dimensions::new(x_locations.len(), y_locations.len(), z_locations.len());
        let length = dimensions.checked_num_points()?.checked_mul(3)?;

        let mut flat = Vec::new();
        flat.try_reserve_exact(length).ok()?;
        expand_axes(&mut flat, x_locations, y_locations, z_locations);

        Some(Self::from_flat_points(kind, dimensions, flat))
    }

    /// add a point data array, replacing any array with the same name
    pub fn insert_point_array(&mut self, array: PointArray) {
        if let Some(existing) = self.point_data.iter_mut().find(|a| a.name == array.name) {
            *existing = array;
        } else {
            self.point_data.push(array);
        }
    }

    /// builder flavour of [`StructuredMesh::insert_point_array`]
    pub fn with_point_array(mut self, array: PointArray) -> Self {
        self.insert_point_array(array);
        self
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn points(&self) -> &Array2<f64> {
        &self.points
    }

    pub fn num_points(&self) -> usize {
        self.points.nrows()
    }

    pub fn num_cells(&self) -> usize {
        self.dimensions.num_cells()
    }

    /// all point data arrays in file order
    pub fn point_data(&self) -> &[PointArray] {
        &self.point_data
    }

    /// look up a point data array by name
    pub fn point_array(&self, name: &str) -> Option<&PointArray> {
        self.point_data.iter().find(|array| array.name == name)
    }

    /// `(min, max)` of one coordinate column, `None` for a mesh without points
    pub fn bounds(&self, component: usize) -> Option<(f64, f64)> {
        crate::array::min_max(self.points.column(component).iter().copied())
    }
}

fn expand_axes(
    flat: &mut Vec<f64>,
    x_locations: &[f64],
    y_locations: &[f64],
    z_locations: &[f64],
) {
    for z in z_locations {
        for y in y_locations {
            for x in x_locations {
                flat.extend([*x, *y, *z]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_locations_are_x_fastest() {
        let mesh = StructuredMesh::from_axis_locations(
            DatasetKind::RectilinearGrid,
            &[0., 1.],
            &[10., 20., 30.],
            &[100.],
        );

        assert_eq!(mesh.dimensions(), Dimensions::new(2, 3, 1));
        assert_eq!(mesh.num_points(), 6);
        assert_eq!(mesh.points().row(1).to_vec(), vec![1., 10., 100.]);
        assert_eq!(mesh.points().row(2).to_vec(), vec![0., 20., 100.]);
        assert_eq!(mesh.bounds(1), Some((10., 30.)));
    }

    #[test]
    fn fallible_expansion_matches() {
        let x = [0., 1.];
        let y = [10., 20., 30.];
        let z = [100.];

        let kind = DatasetKind::RectilinearGrid;
        let mesh = StructuredMesh::try_from_axis_locations(kind, &x, &y, &z);

        assert_eq!(mesh, Some(StructuredMesh::from_axis_locations(kind, &x, &y, &z)));
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut mesh = StructuredMesh::from_flat_points(
            DatasetKind::StructuredGrid,
            Dimensions::new(1, 1, 1),
            vec![0., 0., 0.],
        );

        mesh.insert_point_array(PointArray::scalar("Pressure", vec![1.0]));
        mesh.insert_point_array(PointArray::scalar("Density", vec![2.0]));
        mesh.insert_point_array(PointArray::scalar("Pressure", vec![3.0]));

        let names: Vec<_> = mesh.point_data().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Pressure", "Density"]);
        assert_eq!(mesh.point_array("Pressure").unwrap().values, vec![3.0]);
        assert!(mesh.point_array("Velocity").is_none());
    }

    #[test]
    fn shapes_format_like_numpy() {
        let scalar = PointArray::scalar("p", vec![0.; 24]);
        let vector = PointArray::new("u".into(), 3, vec![0.; 72]);

        assert_eq!(Shape(&scalar.shape()).to_string(), "(24,)");
        assert_eq!(Shape(&vector.shape()).to_string(), "(24, 3)");
    }
}
