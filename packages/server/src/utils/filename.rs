use std::path::Path;

/// Reasons an uploaded file name is rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum FilenameError {
    /// Filename is empty or whitespace-only.
    Empty,
    /// Filename contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Filename contains control characters (CR, LF, NUL, etc.).
    ControlCharacter,
    /// Filename starts with a dot (hidden file).
    Hidden,
    /// Extension is not 1-16 ASCII alphanumeric characters.
    InvalidExtension,
}

impl FilenameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Filename cannot be empty",
            Self::ContainsPathSeparator => "Invalid filename: path separators are not allowed",
            Self::ControlCharacter => "Invalid filename: control characters are not allowed",
            Self::Hidden => "Invalid filename: hidden files (starting with '.') are not allowed",
            Self::InvalidExtension => {
                "Invalid filename: extension must be 1-16 ASCII letters or digits"
            }
        }
    }
}

const MAX_EXTENSION_LEN: usize = 16;

/// Validates a flat filename (no directory components allowed).
pub fn validate_flat_filename(filename: &str) -> Result<&str, FilenameError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(FilenameError::Empty);
    }

    // Also covers NUL and CR/LF header injection.
    if trimmed.chars().any(|c| c.is_control()) {
        return Err(FilenameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(FilenameError::ContainsPathSeparator);
    }

    if trimmed.starts_with('.') {
        return Err(FilenameError::Hidden);
    }

    Ok(trimmed)
}

/// Returns the text after the last `.` of a validated filename, if any.
pub fn extension_of(filename: &str) -> Result<Option<&str>, FilenameError> {
    let Some((_, ext)) = filename.rsplit_once('.') else {
        return Ok(None);
    };
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(FilenameError::InvalidExtension);
    }
    Ok(Some(ext))
}

/// Builds the stored name of a student's avatar: `{student_id}.{ext}`, or
/// just `{student_id}` when the upload has no extension.
pub fn avatar_file_name(student_id: i32, original: &str) -> Result<String, FilenameError> {
    let original = validate_flat_filename(original)?;
    Ok(match extension_of(original)? {
        Some(ext) => format!("{student_id}.{ext}"),
        None => student_id.to_string(),
    })
}

/// Store name of a file recorded by its absolute path: the final component.
pub fn stored_file_name(path: &str) -> Option<&str> {
    Path::new(path).file_name().and_then(|n| n.to_str())
}
