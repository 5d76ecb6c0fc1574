//! # Plotting
//!
//! A [`Figure`] is what the slicer hands to a [`PlotRenderer`](crate::PlotRenderer): one
//! [`Panel`] per slice request together with the [`GridLayout`] they are arranged in.
//! The panels own their planes so a renderer never needs to look back at the mesh.

mod colormap;
mod svg;

pub use colormap::{Colormap, Rgb};
pub use svg::{write_svg, SvgRenderer};

use crate::prelude::*;
use crate::slice::{Axis, GridLayout};

/// A single color mapped plane, drawn as one subplot
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// name of the point data array the plane was cut from
    pub title: String,
    pub axis: Axis,
    pub index: usize,
    /// physical coordinate along the horizontal plot axis of every value
    pub abscissa: Array2<f64>,
    /// physical coordinate along the vertical plot axis of every value
    pub ordinate: Array2<f64>,
    pub values: Array2<f64>,
}

impl Panel {
    pub fn abscissa_label(&self) -> &'static str {
        self.axis.in_plane().0.label()
    }

    pub fn ordinate_label(&self) -> &'static str {
        self.axis.in_plane().1.label()
    }

    /// `(min, max)` of the plane values, ignoring NaN
    pub fn value_range(&self) -> Option<(f64, f64)> {
        crate::array::min_max(self.values.iter().copied())
    }

    pub fn abscissa_range(&self) -> Option<(f64, f64)> {
        crate::array::min_max(self.abscissa.iter().copied())
    }

    pub fn ordinate_range(&self) -> Option<(f64, f64)> {
        crate::array::min_max(self.ordinate.iter().copied())
    }
}

/// Every panel of a slicer run and the grid they are laid out on
#[derive(Debug, Clone, PartialEq, Constructor)]
pub struct Figure {
    pub layout: GridLayout,
    pub panels: Vec<Panel>,
}

#[test]
fn panel_labels() {
    let panel = Panel {
        title: "Pressure".into(),
        axis: Axis::Y,
        index: 0,
        abscissa: ndarray::arr2(&[[0., 1.]]),
        ordinate: ndarray::arr2(&[[5., 5.]]),
        values: ndarray::arr2(&[[f64::NAN, 2.]]),
    };

    assert_eq!(panel.abscissa_label(), "X");
    assert_eq!(panel.ordinate_label(), "Z");
    assert_eq!(panel.value_range(), Some((2., 2.)));
    assert_eq!(panel.abscissa_range(), Some((0., 1.)));
}
