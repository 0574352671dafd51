//! Internal helper macros.

/// Returns early with `Err($error)` unless `$predicate` holds.
///
/// Used for request validation, where a failed check ends parsing instead of panicking.
///
/// ```ignore
/// ensure!(path.starts_with('/'), ParseError::invalid_path("path must start with '/'"));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
