//! Turning free-text note titles into safe file names.

/// Characters that cannot appear in a file name on at least one common platform.
pub const ILLEGAL_FILENAME_CHARS: [char; 10] =
    ['\0', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Replace every illegal file name character in `title` with `-`.
pub fn sanitize_title(title: &str) -> String {
    title.replace(ILLEGAL_FILENAME_CHARS, "-")
}

/// Whether `title` can be used as a file name unchanged.
pub(crate) fn is_safe_title(title: &str) -> bool {
    !title.contains(ILLEGAL_FILENAME_CHARS)
}
