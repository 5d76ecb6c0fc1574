use std::path::PathBuf;

use vtk_slicer::prelude::*;
use vtk_slicer::{Error, SliceError, VtkReader};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("static")
        .join(name)
}

/// keeps every figure instead of drawing it
#[derive(Default)]
struct Recorder {
    figures: Vec<Figure>,
}

impl PlotRenderer for Recorder {
    fn render(&mut self, figure: &Figure) -> Result<(), Error> {
        self.figures.push(figure.clone());
        Ok(())
    }
}

#[test]
fn pressure_plane_end_to_end() {
    let mesh = vtk_slicer::load_mesh(&fixture("structured_ascii.vtk"), &VtkReader).unwrap();
    let dims = vtk_slicer::get_dims(&mesh);
    let mut recorder = Recorder::default();

    vtk_slicer::slicer(&mesh, dims, &["Pressure"], &[1], &["x"], &mut recorder).unwrap();

    assert_eq!(recorder.figures.len(), 1);
    let figure = &recorder.figures[0];
    assert_eq!((figure.layout.rows, figure.layout.cols), (1, 1));

    let panel = &figure.panels[0];
    assert_eq!(panel.title, "Pressure");
    assert_eq!(
        panel.values,
        ndarray::arr2(&[[6., 7.], [8., 9.], [10., 11.]])
    );
    assert_eq!((panel.abscissa_label(), panel.ordinate_label()), ("Y", "Z"));
}

#[test]
fn many_panels_share_one_figure() {
    let mesh = vtk_slicer::read_vtk(&fixture("rectilinear_appended.vtr")).unwrap();
    let mut recorder = Recorder::default();

    vtk_slicer::slicer(
        &mesh,
        mesh.dimensions(),
        &["Pressure", "Density", "Pressure", "Density", "Pressure"],
        &[0, 1, 2, 3, 1],
        &["y", "y", "x", "x", "z"],
        &mut recorder,
    )
    .unwrap();

    let figure = &recorder.figures[0];
    assert_eq!((figure.layout.rows, figure.layout.cols), (3, 3));
    assert_eq!(figure.layout.unused_cells(), 4);
    assert_eq!(figure.panels.len(), 5);

    // Density = 1 + n / 2, sliced at k = 3 of a (4, 3, 2) grid
    let density = &figure.panels[3];
    assert_eq!(density.values[[0, 0]], 1.0 + 18.0 / 2.0);

    // field[:, :, 1] of Pressure
    let z_plane = &figure.panels[4];
    assert_eq!(z_plane.values.dim(), (4, 3));
    assert_eq!(z_plane.values[[3, 2]], 23.0);
}

#[test]
fn mismatched_requests_render_nothing() {
    let mesh = vtk_slicer::read_vtk(&fixture("structured_ascii.vts")).unwrap();
    let mut recorder = Recorder::default();

    let err = vtk_slicer::slicer(
        &mesh,
        mesh.dimensions(),
        &["P", "D"],
        &[1],
        &["x", "y"],
        &mut recorder,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        Error::Slice(SliceError::SliceRequestMismatch {
            fields: 2,
            slices: 1,
            axes: 2
        })
    ));
    assert!(recorder.figures.is_empty());
}

#[test]
fn unknown_axis_is_fatal() {
    let mesh = vtk_slicer::read_vtk(&fixture("structured_ascii.vts")).unwrap();
    let mut recorder = Recorder::default();

    let err = vtk_slicer::slicer(
        &mesh,
        mesh.dimensions(),
        &["Pressure", "Pressure"],
        &[0, 0],
        &["y", "w"],
        &mut recorder,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Slice(SliceError::UnknownAxis(ref axis)) if axis == "w"));
    assert!(recorder.figures.is_empty());
}

#[test]
fn missing_file_stops_before_plotting() {
    let dir = tempfile::tempdir().unwrap();
    let config = vtk_slicer::SliceConfig::default()
        .with_input(dir.path().join("NRotSphere001N000.vtk"))
        .with_output(dir.path().join("slices.svg"));

    let err = vtk_slicer::run(&config).unwrap_err();

    assert!(matches!(err, Error::InputFileMissing(_)));
    assert!(!config.output.exists());
}

#[test]
fn run_writes_svg() {
    let dir = tempfile::tempdir().unwrap();
    let config = vtk_slicer::SliceConfig::default()
        .with_input(fixture("structured_binary.vtk"))
        .with_output(dir.path().join("slices.svg"))
        .with_requests(
            vec!["Pressure".into(), "Density".into()],
            vec![0, 1],
            vec!["y".into(), "z".into()],
        );

    vtk_slicer::run(&config).unwrap();

    let svg = std::fs::read_to_string(&config.output).unwrap();
    assert_eq!(svg.matches(r#"class="panel""#).count(), 2);
    assert_eq!(svg.matches(r#"class="colorbar""#).count(), 2);
}
