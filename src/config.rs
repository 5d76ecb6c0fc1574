use std::path::PathBuf;

/// file read when no input is given
pub const DEFAULT_INPUT: &str = "NRotSphere001N000.vtk";
/// file the figure is written to when no output is given
pub const DEFAULT_OUTPUT: &str = "slices.svg";

/// Everything a slicing run needs: where to read the mesh from, which planes to cut and
/// where to put the figure.
///
/// `fields`, `slices` and `axes` are parallel lists with one entry per panel. Their lengths
/// are only checked once slicing starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceConfig {
    pub input: PathBuf,
    pub fields: Vec<String>,
    pub slices: Vec<usize>,
    pub axes: Vec<String>,
    pub output: PathBuf,
}

impl Default for SliceConfig {
    /// a single `Pressure` plane at index 0 along `y`
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            fields: vec!["Pressure".into()],
            slices: vec![0],
            axes: vec!["y".into()],
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl SliceConfig {
    pub fn with_input<P: Into<PathBuf>>(mut self, input: P) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output<P: Into<PathBuf>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }

    /// replace the default request with explicit ones
    pub fn with_requests(
        mut self,
        fields: Vec<String>,
        slices: Vec<usize>,
        axes: Vec<String>,
    ) -> Self {
        self.fields = fields;
        self.slices = slices;
        self.axes = axes;
        self
    }
}

#[test]
fn defaults_match_single_pressure_plane() {
    let config = SliceConfig::default();

    assert_eq!(config.input, PathBuf::from("NRotSphere001N000.vtk"));
    assert_eq!(config.fields, vec!["Pressure".to_string()]);
    assert_eq!(config.slices, vec![0]);
    assert_eq!(config.axes, vec!["y".to_string()]);
    assert_eq!(config.output, PathBuf::from("slices.svg"));
}
