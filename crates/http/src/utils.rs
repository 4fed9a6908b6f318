//! Internal helper macros.

/// Returns `Err($error)` early unless `$predicate` holds.
///
/// ```ignore
/// ensure!(!raw.is_empty(), ParseError::Empty);
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
