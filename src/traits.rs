//! # Traits
//!
//! The two seams of the slicing pipeline. A [`MeshReader`] turns a path into a
//! [`StructuredMesh`], and a [`PlotRenderer`] displays a finished [`Figure`] of slice panels.
//! The default implementations are [`VtkReader`](crate::VtkReader) and
//! [`SvgRenderer`](crate::SvgRenderer), but anything that can produce a mesh or consume a
//! figure can be swapped in:
//!
//! ```
//! use vtk_slicer::{Figure, PlotRenderer};
//!
//! /// remembers the titles of every panel it was asked to draw
//! #[derive(Default)]
//! struct TitleCollector {
//!     titles: Vec<String>,
//! }
//!
//! impl PlotRenderer for TitleCollector {
//!     fn render(&mut self, figure: &Figure) -> Result<(), vtk_slicer::Error> {
//!         self.titles
//!             .extend(figure.panels.iter().map(|panel| panel.title.clone()));
//!         Ok(())
//!     }
//! }
//! ```

use crate::plot::Figure;
use crate::Error;
use crate::StructuredMesh;

use std::path::Path;

/// Load a structured mesh from a file
pub trait MeshReader {
    fn read_mesh(&self, path: &Path) -> Result<StructuredMesh, Error>;
}

/// Display or save a figure of slice panels
///
/// `render` is called exactly once per [`slicer`](crate::slicer) invocation, after every panel
/// has been extracted.
pub trait PlotRenderer {
    fn render(&mut self, figure: &Figure) -> Result<(), Error>;
}

impl<T: MeshReader + ?Sized> MeshReader for &T {
    fn read_mesh(&self, path: &Path) -> Result<StructuredMesh, Error> {
        (**self).read_mesh(path)
    }
}

impl<T: PlotRenderer + ?Sized> PlotRenderer for &mut T {
    fn render(&mut self, figure: &Figure) -> Result<(), Error> {
        (**self).render(figure)
    }
}
