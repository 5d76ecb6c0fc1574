use std::path::PathBuf;

use vtk_slicer::DatasetKind;
use vtk_slicer::Dimensions;
use vtk_slicer::StructuredMesh;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("static")
        .join(name)
}

fn read(name: &str) -> StructuredMesh {
    vtk_slicer::read_vtk(&fixture(name)).unwrap()
}

#[test]
fn legacy_ascii_fixture() {
    let mesh = read("structured_ascii.vtk");

    assert_eq!(mesh.kind(), DatasetKind::StructuredGrid);
    assert_eq!(mesh.dimensions(), Dimensions::new(2, 3, 4));
    assert_eq!(mesh.num_points(), 24);
    assert_eq!(mesh.num_cells(), 6);

    let names: Vec<_> = mesh.point_data().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Pressure", "Density", "Velocity"]);

    let pressure = mesh.point_array("Pressure").unwrap();
    let expected: Vec<f64> = (0..24).map(|x| x as f64).collect();
    assert_eq!(pressure.values, expected);

    assert_eq!(mesh.point_array("Velocity").unwrap().shape(), vec![24, 3]);
    assert_eq!(mesh.bounds(2), Some((0.0, 0.75)));
    // cell data is not carried over
    assert!(mesh.point_array("CellId").is_none());
}

#[test]
fn every_format_reads_the_same_grid() {
    let reference = read("structured_ascii.vtk");

    for name in [
        "structured_binary.vtk",
        "structured_ascii.vts",
        "structured_base64.vts",
        "rectilinear_appended.vtr",
    ] {
        let mesh = read(name);

        assert_eq!(mesh.dimensions(), reference.dimensions(), "{name}");
        assert_eq!(mesh.points(), reference.points(), "{name}");
        assert_eq!(mesh.point_data(), reference.point_data(), "{name}");
    }

    assert_eq!(
        read("rectilinear_appended.vtr").kind(),
        DatasetKind::RectilinearGrid
    );
}

#[test]
fn inspector_lists_shapes() {
    let mesh = read("structured_base64.vts");

    let mut out = Vec::new();
    vtk_slicer::write_mesh_info(&mesh, &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();

    assert!(out.starts_with("StructuredGrid\n"));
    assert!(out.contains("  Dimensions:   2, 3, 4\n"));
    assert!(out.ends_with(
        "Point Data:\n  - Pressure: (24,)\n  - Density: (24,)\n  - Velocity: (24, 3)\n"
    ));
}

#[test]
fn unreadable_files() {
    let dir = tempfile::tempdir().unwrap();

    let not_vtk = dir.path().join("mesh.stl");
    std::fs::write(&not_vtk, "solid cube\nendsolid cube\n").unwrap();
    let err = vtk_slicer::read_vtk(&not_vtk).unwrap_err();
    assert!(matches!(err, vtk_slicer::ParseError::UnknownFormat));

    let compressed = dir.path().join("compressed.vts");
    std::fs::write(
        &compressed,
        r#"<?xml version="1.0"?>
<VTKFile type="StructuredGrid" version="1.0" byte_order="LittleEndian" compressor="vtkZLibDataCompressor">
</VTKFile>
"#,
    )
    .unwrap();
    let err = vtk_slicer::read_vtk(&compressed).unwrap_err();
    assert!(err.to_string().contains("compressed data"));
}
