//! Human readable summaries of a loaded mesh

use crate::mesh::Shape;
use crate::prelude::*;

/// The grid dimensions exactly as the file reported them.
///
/// No check is made against the number of points or the length of any array; a mismatch
/// shows up once a field is reshaped onto the grid.
pub fn get_dims(mesh: &StructuredMesh) -> Dimensions {
    mesh.dimensions()
}

/// Print the summary from [`write_mesh_info`] to stdout
pub fn print_mesh_info(mesh: &StructuredMesh) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    write_mesh_info(mesh, &mut lock)
}

/// Write a short description of the mesh followed by the shape of every point data array:
///
/// ```text
/// StructuredGrid
///   N Cells:      6
///   N Points:     24
///   X Bounds:     0.000e+00, 1.000e+00
///   Y Bounds:     0.000e+00, 2.000e+00
///   Z Bounds:     0.000e+00, 3.000e+00
///   Dimensions:   2, 3, 4
///   N Arrays:     2
/// Point Data:
///   - Pressure: (24,)
///   - Velocity: (24, 3)
/// ```
pub fn write_mesh_info<W: Write>(mesh: &StructuredMesh, writer: &mut W) -> std::io::Result<()> {
    writeln!(writer, "{}", mesh.kind())?;
    writeln!(writer, "  N Cells:      {}", mesh.num_cells())?;
    writeln!(writer, "  N Points:     {}", mesh.num_points())?;

    for (component, label) in ["X", "Y", "Z"].iter().enumerate() {
        match mesh.bounds(component) {
            Some((lo, hi)) => writeln!(
                writer,
                "  {label} Bounds:     {}, {}",
                scientific(lo),
                scientific(hi)
            )?,
            None => writeln!(writer, "  {label} Bounds:     empty")?,
        }
    }

    writeln!(writer, "  Dimensions:   {}", mesh.dimensions())?;
    writeln!(writer, "  N Arrays:     {}", mesh.point_data().len())?;

    if !mesh.point_data().is_empty() {
        writeln!(writer, "Point Data:")?;
        for array in mesh.point_data() {
            writeln!(writer, "  - {}: {}", array.name, Shape(&array.shape()))?;
        }
    }

    Ok(())
}

/// `1.500e+01` style formatting with a signed, two digit exponent
fn scientific(value: f64) -> String {
    let formatted = format!("{value:.3e}");

    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => formatted,
        },
        // inf and NaN have no exponent
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{DatasetKind, PointArray};

    #[test]
    fn summary_lists_fields_in_order() {
        let mesh = StructuredMesh::from_axis_locations(
            DatasetKind::StructuredPoints,
            &[0., 1.],
            &[0., 1., 2.],
            &[0., 1., 2., 3.],
        )
        .with_point_array(PointArray::scalar("Pressure", vec![0.; 24]))
        .with_point_array(PointArray::new("Velocity".into(), 3, vec![0.; 72]));

        let mut out = Vec::new();
        write_mesh_info(&mesh, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        let expected = "\
StructuredPoints
  N Cells:      6
  N Points:     24
  X Bounds:     0.000e+00, 1.000e+00
  Y Bounds:     0.000e+00, 2.000e+00
  Z Bounds:     0.000e+00, 3.000e+00
  Dimensions:   2, 3, 4
  N Arrays:     2
Point Data:
  - Pressure: (24,)
  - Velocity: (24, 3)
";
        assert_eq!(out, expected);
    }

    #[test]
    fn no_point_data_header_without_arrays() {
        let mesh = StructuredMesh::from_flat_points(
            DatasetKind::StructuredGrid,
            Dimensions::new(1, 1, 1),
            vec![0.5, 0.0, -2.0],
        );

        let mut out = Vec::new();
        write_mesh_info(&mesh, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(!out.contains("Point Data:"));
        assert!(out.contains("  Z Bounds:     -2.000e+00, -2.000e+00\n"));
        assert_eq!(get_dims(&mesh), Dimensions::new(1, 1, 1));
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(scientific(0.0), "0.000e+00");
        assert_eq!(scientific(1234.0), "1.234e+03");
        assert_eq!(scientific(-0.0625), "-6.250e-02");
    }
}
