//! # vtk_slicer
//!
//! Load a structured grid from a vtk file, describe it, and plot axis aligned planes of its
//! point data.
//!
//! The pipeline is four steps, each available on its own:
//!
//! 1. [`load_mesh`] checks the path and reads a [`StructuredMesh`] through a [`MeshReader`]
//!    ([`VtkReader`] understands legacy `.vtk` files and xml `.vts` / `.vtr` files)
//! 2. [`print_mesh_info`] prints the size, bounds and point data arrays of the mesh
//! 3. [`get_dims`] returns the grid dimensions as reported by the file
//! 4. [`slicer`] reshapes each requested field onto the `(N3, N2, N1)` grid, cuts one plane
//!    per request and hands the resulting [`Figure`] to a [`PlotRenderer`]
//!    ([`SvgRenderer`] writes it to an SVG file)
//!
//! ```no_run
//! use std::path::Path;
//!
//! fn main() -> Result<(), vtk_slicer::Error> {
//!     let path = Path::new("NRotSphere001N000.vtk");
//!     let mesh = vtk_slicer::load_mesh(path, &vtk_slicer::VtkReader)?;
//!     vtk_slicer::print_mesh_info(&mesh)?;
//!
//!     let dims = vtk_slicer::get_dims(&mesh);
//!     let mut renderer = vtk_slicer::SvgRenderer::new("slices.svg");
//!
//!     vtk_slicer::slicer(
//!         &mesh,
//!         dims,
//!         &["Pressure", "Density"],
//!         &[0, 3],
//!         &["y", "z"],
//!         &mut renderer,
//!     )
//! }
//! ```

pub mod array;
mod config;
mod inspect;
mod loader;
pub mod mesh;
pub mod parse;
pub mod plot;
pub mod prelude;
pub mod slice;
mod traits;

pub use traits::{MeshReader, PlotRenderer};

pub use config::{SliceConfig, DEFAULT_INPUT, DEFAULT_OUTPUT};
pub use inspect::{get_dims, print_mesh_info, write_mesh_info};
pub use loader::load_mesh;

pub use mesh::{DatasetKind, Dimensions, PointArray, StructuredMesh};
pub use parse::{read_and_parse as read_vtk, ParseError, VtkReader};
pub use plot::{Figure, Panel, SvgRenderer};
pub use slice::{
    build_panels, extract_plane, slicer, Axis, CoordinateGrids, GridLayout, SliceError,
    SliceRequest, SliceRequests,
};

pub use array::reshape_grid;

pub use ndarray;

use std::path::PathBuf;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("File not found at {}", .0.display())]
    InputFileMissing(PathBuf),
    #[error("{0}")]
    Parse(#[from] parse::ParseError),
    #[error("{0}")]
    Slice(#[from] slice::SliceError),
    #[error("Could not write the figure: `{0}`")]
    Render(#[from] quick_xml::Error),
}

/// Run the whole pipeline for a configuration: load, describe, slice and render.
pub fn run(config: &SliceConfig) -> Result<(), Error> {
    let mesh = load_mesh(&config.input, &VtkReader)?;
    print_mesh_info(&mesh)?;

    let dims = get_dims(&mesh);
    let mut renderer = SvgRenderer::new(&config.output);

    slicer(
        &mesh,
        dims,
        &config.fields,
        &config.slices,
        &config.axes,
        &mut renderer,
    )
}
