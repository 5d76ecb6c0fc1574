use crate::prelude::*;

/// Number of grid points along each structured axis, in the order the file reports them.
///
/// The arrays of a structured grid are stored with the first axis varying fastest, so
/// the row-major shape of a field is the *reverse* of this triple: see [`Dimensions::grid_shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Constructor)]
pub struct Dimensions {
    pub n1: usize,
    pub n2: usize,
    pub n3: usize,
}

impl Dimensions {
    /// build a set of dimensions from a vtk extent string such as `"0 9 0 19 0 4"`
    ///
    /// # Example
    /// ```
    /// let dims = vtk_slicer::Dimensions::from_extent_string("0 9 0 19 1 5").unwrap();
    /// assert_eq!(dims.as_array(), [10, 20, 5]);
    /// ```
    pub fn from_extent_string(extent: &str) -> Result<Self, error::InvalidExtent> {
        Extent::from_extent_string(extent).map(|extent| extent.dimensions())
    }

    pub fn as_array(&self) -> [usize; 3] {
        [self.n1, self.n2, self.n3]
    }

    /// The shape a flat point array takes on once reshaped: `(N3, N2, N1)`
    pub fn grid_shape(&self) -> (usize, usize, usize) {
        (self.n3, self.n2, self.n1)
    }

    /// total number of points on the grid, saturating at `usize::MAX`
    pub fn num_points(&self) -> usize {
        self.n1.saturating_mul(self.n2).saturating_mul(self.n3)
    }

    /// total number of points on the grid, `None` if it does not fit in a `usize`
    pub fn checked_num_points(&self) -> Option<usize> {
        self.n1.checked_mul(self.n2)?.checked_mul(self.n3)
    }

    /// number of cells on the grid. Flat axes (a single point) do not
    /// reduce the count to zero
    pub fn num_cells(&self) -> usize {
        self.as_array()
            .iter()
            .map(|n| n.saturating_sub(1).max(1))
            .fold(1, usize::saturating_mul)
    }
}

impl From<[usize; 3]> for Dimensions {
    fn from(x: [usize; 3]) -> Self {
        Self::new(x[0], x[1], x[2])
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.n1, self.n2, self.n3)
    }
}

/// The inclusive index ranges found in `WholeExtent` / `Extent` attributes
/// of xml vtk files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extent {
    pub x_start: i64,
    pub x_end: i64,
    pub y_start: i64,
    pub y_end: i64,
    pub z_start: i64,
    pub z_end: i64,
}

impl Extent {
    /// Parse an extent in the form `"x_start x_end y_start y_end z_start z_end"`
    pub fn from_extent_string(extent: &str) -> Result<Self, error::InvalidExtent> {
        let invalid = || error::InvalidExtent::new(extent.to_string());

        let values = extent
            .split_ascii_whitespace()
            .map(|x| x.parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        if values.len() != 6 {
            return Err(invalid());
        }

        let out = Extent {
            x_start: values[0],
            x_end: values[1],
            y_start: values[2],
            y_end: values[3],
            z_start: values[4],
            z_end: values[5],
        };

        // every axis needs a length and the grid a point count that fit in a usize
        let lengths = [
            span(out.x_start, out.x_end),
            span(out.y_start, out.y_end),
            span(out.z_start, out.z_end),
        ];
        let dims = match lengths {
            [Some(n1), Some(n2), Some(n3)] => Dimensions::new(n1, n2, n3),
            _ => return Err(invalid()),
        };
        if dims.checked_num_points().is_none() {
            return Err(invalid());
        }

        Ok(out)
    }

    /// Get the total length in the X direction as paraview would interpret it
    pub fn x_len(&self) -> usize {
        span(self.x_start, self.x_end).unwrap_or(0)
    }

    /// Get the total length in the Y direction as paraview would interpret it
    pub fn y_len(&self) -> usize {
        span(self.y_start, self.y_end).unwrap_or(0)
    }

    /// Get the total length in the Z direction as paraview would interpret it
    pub fn z_len(&self) -> usize {
        span(self.z_start, self.z_end).unwrap_or(0)
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.x_len(), self.y_len(), self.z_len())
    }
}

/// number of points in the inclusive range `start..=end`, `None` for reversed or oversized ranges
fn span(start: i64, end: i64) -> Option<usize> {
    let len = end.checked_sub(start)?.checked_add(1)?;
    usize::try_from(len).ok().filter(|len| *len > 0)
}

pub mod error {
    use derive_more::{Constructor, Display};

    #[derive(Display, Debug, Constructor, PartialEq, Eq)]
    #[display(fmt = "`{extent}` is not a valid extent of six ordered integers")]
    pub struct InvalidExtent {
        extent: String,
    }

    impl std::error::Error for InvalidExtent {}
}
