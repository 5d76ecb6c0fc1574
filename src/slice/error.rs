/// Everything that can stop a set of slice requests from turning into panels.
///
/// All of these are fatal: no figure is rendered once one of them is returned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SliceError {
    #[error(
        "fields, slices and axes must have the same length (got {fields} fields, {slices} slices and {axes} axes)"
    )]
    SliceRequestMismatch {
        fields: usize,
        slices: usize,
        axes: usize,
    },
    #[error("no slices were requested")]
    NoSliceRequests,
    #[error("unknown axis `{0}`, expected one of x, y or z")]
    UnknownAxis(String),
    #[error("field `{0}` is not present in the point data")]
    FieldNotFound(String),
    #[error("cannot reshape `{field}` onto the grid: expected {expected} values, found {actual}")]
    Reshape {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("slice index {index} is out of bounds for `{field}` along the {axis} axis (length {len})")]
    IndexOutOfBounds {
        field: String,
        axis: String,
        index: usize,
        len: usize,
    },
}

#[test]
fn mismatch_message() {
    let err = SliceError::SliceRequestMismatch {
        fields: 2,
        slices: 1,
        axes: 2,
    };
    assert_eq!(
        err.to_string(),
        "fields, slices and axes must have the same length (got 2 fields, 1 slices and 2 axes)"
    );
}
