//! Common traits and types that are useful for working with `vtk_slicer`
#![allow(unused_imports)]

pub use crate::mesh::{Dimensions, PointArray, StructuredMesh};
pub use crate::plot::{Figure, Panel};
pub use crate::slice::{Axis, SliceRequests};
pub use crate::traits::{MeshReader, PlotRenderer};

pub(crate) use crate::Error;
pub(crate) use std::fmt;
pub(crate) use std::io::{BufRead, Write};

pub(crate) use derive_more::{Constructor, Deref, DerefMut, Display, From, Into};

pub(crate) use ndarray::{Array2, Array3};
