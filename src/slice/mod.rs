//! # Slicing
//!
//! Turns `(field, index, axis)` requests into 2D planes of a mesh. Every field is reshaped
//! from its flat point order onto the `(N3, N2, N1)` grid, and each request fixes one of the
//! three grid axes:
//!
//! | axis label | fixed grid axis | plane values      | abscissa | ordinate |
//! |------------|-----------------|-------------------|----------|----------|
//! | `x`        | 0               | `field[i, :, :]`  | Y        | Z        |
//! | `y`        | 1               | `field[:, i, :]`  | X        | Z        |
//! | `z`        | 2               | `field[:, :, i]`  | X        | Y        |
//!
//! The coordinate planes are cut out of the reshaped point coordinates at the same index,
//! so every value in a plane has a matching abscissa and ordinate.

mod coords;
mod error;
mod layout;

pub use coords::CoordinateGrids;
pub use error::SliceError;
pub use layout::GridLayout;

use crate::array::Scalar3D;
use crate::plot::{Figure, Panel};
use crate::prelude::*;

use std::str::FromStr;
use tracing::{debug, info};

/// Physical axis named by a slice request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Axis {
    #[display(fmt = "x")]
    X,
    #[display(fmt = "y")]
    Y,
    #[display(fmt = "z")]
    Z,
}

impl Axis {
    /// index of the `(N3, N2, N1)` grid axis this label fixes
    pub fn grid_axis(&self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// the physical axes plotted along the abscissa and ordinate of a plane cut along `self`
    pub fn in_plane(&self) -> (Axis, Axis) {
        match self {
            Self::X => (Self::Y, Self::Z),
            Self::Y => (Self::X, Self::Z),
            Self::Z => (Self::X, Self::Y),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        }
    }
}

impl FromStr for Axis {
    type Err = SliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "x" | "X" => Ok(Self::X),
            "y" | "Y" => Ok(Self::Y),
            "z" | "Z" => Ok(Self::Z),
            _ => Err(SliceError::UnknownAxis(s.to_string())),
        }
    }
}

/// A single `(field, index, axis)` slice
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct SliceRequest {
    pub field: String,
    pub index: usize,
    pub axis: Axis,
}

/// A validated, non-empty list of slice requests
#[derive(Debug, Clone, PartialEq, Eq, Deref)]
pub struct SliceRequests(Vec<SliceRequest>);

impl SliceRequests {
    /// Zip the three parallel request lists together.
    ///
    /// The lists must have the same length, every axis label must be one of `x`, `y` or `z`,
    /// and at least one request must be present.
    pub fn new<F, A>(fields: &[F], slices: &[usize], axes: &[A]) -> Result<Self, SliceError>
    where
        F: AsRef<str>,
        A: AsRef<str>,
    {
        if fields.len() != slices.len() || fields.len() != axes.len() {
            return Err(SliceError::SliceRequestMismatch {
                fields: fields.len(),
                slices: slices.len(),
                axes: axes.len(),
            });
        }

        let requests = fields
            .iter()
            .zip(slices)
            .zip(axes)
            .map(|((field, index), axis)| {
                let axis = axis.as_ref().parse::<Axis>()?;
                Ok(SliceRequest::new(field.as_ref().to_string(), *index, axis))
            })
            .collect::<Result<Vec<_>, SliceError>>()?;

        if requests.is_empty() {
            return Err(SliceError::NoSliceRequests);
        }

        Ok(Self(requests))
    }
}

/// Cut the plane at `index` along `axis` out of a reshaped grid.
///
/// Returns `None` if `index` is past the end of the fixed grid axis.
pub fn extract_plane<T: Clone>(grid: &Array3<T>, axis: Axis, index: usize) -> Option<Array2<T>> {
    let axis = ndarray::Axis(axis.grid_axis());

    if index >= grid.len_of(axis) {
        return None;
    }

    Some(grid.index_axis(axis, index).to_owned())
}

/// Extract one panel per request. Requests are handled independently and in order; the first
/// failure aborts the whole set.
pub fn build_panels(
    mesh: &StructuredMesh,
    dims: Dimensions,
    requests: &SliceRequests,
) -> Result<Vec<Panel>, SliceError> {
    let coordinates = CoordinateGrids::from_mesh(mesh, dims)?;

    requests
        .iter()
        .map(|request| build_panel(mesh, dims, &coordinates, request))
        .collect()
}

fn build_panel(
    mesh: &StructuredMesh,
    dims: Dimensions,
    coordinates: &CoordinateGrids,
    request: &SliceRequest,
) -> Result<Panel, SliceError> {
    let SliceRequest { field, index, axis } = request;

    let array = mesh
        .point_array(field)
        .ok_or_else(|| SliceError::FieldNotFound(field.clone()))?;

    let grid = Scalar3D::from_flat(&array.values, dims).map_err(|_| SliceError::Reshape {
        field: field.clone(),
        expected: dims.num_points(),
        actual: array.values.len(),
    })?;

    let values = grid
        .plane(axis.grid_axis(), *index)
        .ok_or_else(|| SliceError::IndexOutOfBounds {
            field: field.clone(),
            axis: axis.to_string(),
            index: *index,
            len: grid.len_of(ndarray::Axis(axis.grid_axis())),
        })?
        .inner();

    // the coordinate grids share the field's shape so the index is in bounds
    let (abscissa_axis, ordinate_axis) = axis.in_plane();
    let abscissa =
        extract_plane(coordinates.get(abscissa_axis), *axis, *index).unwrap_or_default();
    let ordinate =
        extract_plane(coordinates.get(ordinate_axis), *axis, *index).unwrap_or_default();

    debug!(%field, %axis, index, shape = ?values.dim(), "extracted plane");

    Ok(Panel {
        title: field.clone(),
        axis: *axis,
        index: *index,
        abscissa,
        ordinate,
        values,
    })
}

/// Slice every requested field and hand the finished figure to `renderer`.
///
/// `fields`, `slices` and `axes` are parallel lists, one entry per panel. Nothing is rendered
/// unless every request succeeds.
pub fn slicer<F, A, R>(
    mesh: &StructuredMesh,
    dims: Dimensions,
    fields: &[F],
    slices: &[usize],
    axes: &[A],
    renderer: &mut R,
) -> Result<(), Error>
where
    F: AsRef<str>,
    A: AsRef<str>,
    R: PlotRenderer + ?Sized,
{
    let requests = SliceRequests::new(fields, slices, axes)?;
    let panels = build_panels(mesh, dims, &requests)?;
    let layout = GridLayout::for_panels(panels.len());

    info!(
        panels = panels.len(),
        rows = layout.rows,
        cols = layout.cols,
        "rendering slices"
    );

    renderer.render(&Figure::new(layout, panels))?;

    Ok(())
}
