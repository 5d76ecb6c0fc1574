use crate::prelude::*;

use std::path::Path;
use tracing::info;

/// Load the mesh at `path` with `reader`.
///
/// The path is checked before the reader is called, so a missing file is always reported
/// as [`Error::InputFileMissing`] no matter which reader is used.
pub fn load_mesh<R>(path: &Path, reader: &R) -> Result<StructuredMesh, Error>
where
    R: MeshReader + ?Sized,
{
    if !path.is_file() {
        return Err(Error::InputFileMissing(path.to_path_buf()));
    }

    info!(path = %path.display(), "loading mesh");
    reader.read_mesh(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::DatasetKind;
    use std::cell::Cell;

    /// hands out an empty mesh and counts how often it was asked to
    #[derive(Default)]
    struct CountingReader {
        calls: Cell<usize>,
    }

    impl MeshReader for CountingReader {
        fn read_mesh(&self, _path: &Path) -> Result<StructuredMesh, Error> {
            self.calls.set(self.calls.get() + 1);
            Ok(StructuredMesh::from_flat_points(
                DatasetKind::StructuredGrid,
                Dimensions::new(1, 1, 1),
                vec![0.0; 3],
            ))
        }
    }

    #[test]
    fn missing_file_never_reaches_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NRotSphere001N000.vtk");
        let reader = CountingReader::default();

        let err = load_mesh(&path, &reader).unwrap_err();

        assert!(matches!(&err, Error::InputFileMissing(missing) if missing == &path));
        assert_eq!(
            err.to_string(),
            format!("File not found at {}", path.display())
        );
        assert_eq!(reader.calls.get(), 0);
    }

    #[test]
    fn directories_are_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let reader = CountingReader::default();

        let err = load_mesh(dir.path(), &reader).unwrap_err();
        assert!(matches!(err, Error::InputFileMissing(_)));
    }

    #[test]
    fn existing_file_is_delegated() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let reader = CountingReader::default();

        let mesh = load_mesh(file.path(), &reader).unwrap();

        assert_eq!(mesh.num_points(), 1);
        assert_eq!(reader.calls.get(), 1);
    }
}
