use crate::error::AppError;

const MAX_FILENAME_CHARS: usize = 255;

/// Check an uploaded document name and return it trimmed.
///
/// Names are stored for display and echoed into `Content-Disposition`, so path
/// components and control characters are refused.
pub fn validate_upload_filename(filename: &str) -> Result<&str, AppError> {
    let name = filename.trim();

    if name.is_empty() {
        return Err(AppError::Validation("Filename cannot be empty".into()));
    }
    if name.chars().count() > MAX_FILENAME_CHARS {
        return Err(AppError::Validation(format!(
            "Filename must be at most {MAX_FILENAME_CHARS} characters"
        )));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(AppError::Validation(
            "Invalid filename: control characters are not allowed".into(),
        ));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(AppError::Validation(
            "Invalid filename: path separators are not allowed".into(),
        ));
    }
    if name.starts_with('.') {
        return Err(AppError::Validation(
            "Invalid filename: names starting with '.' are not allowed".into(),
        ));
    }

    Ok(name)
}

/// Build a `Content-Disposition` value with an ASCII fallback and an RFC 5987
/// `filename*` for non-ASCII names.
pub fn content_disposition(disposition: &str, filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii = if ascii.trim().is_empty() {
        "download".to_string()
    } else {
        ascii
    };

    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("{disposition}; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}
