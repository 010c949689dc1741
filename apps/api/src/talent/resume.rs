use tracing::{debug, warn};

/// Extracts plain text from an uploaded PDF resume.
///
/// An unreadable document yields an empty string: onboarding continues without
/// skill extraction rather than failing the request.
pub fn extract_resume_text(pdf_bytes: &[u8]) -> String {
    if pdf_bytes.is_empty() {
        return String::new();
    }
    // pdf-extract panics on some malformed documents.
    let extracted = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf_bytes));
    match extracted {
        Ok(Ok(text)) => {
            let text = normalize_whitespace(&text);
            debug!("Extracted {} characters of resume text", text.len());
            text
        }
        Ok(Err(e)) => {
            warn!("Failed to extract resume text from PDF: {e}");
            String::new()
        }
        Err(_) => {
            warn!("PDF text extraction panicked; continuing without resume text");
            String::new()
        }
    }
}

/// Trims each line and collapses runs of blank lines into one paragraph break.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = false;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            blank_run = !out.is_empty();
            continue;
        }
        if blank_run {
            out.push_str("\n\n");
        } else if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(line);
        blank_run = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_yields_empty_text() {
        assert_eq!(extract_resume_text(&[]), "");
    }

    #[test]
    fn test_non_pdf_bytes_yield_empty_text() {
        assert_eq!(extract_resume_text(b"definitely not a pdf"), "");
    }

    #[test]
    fn test_normalize_whitespace_collapses_blank_runs() {
        let raw = "  Jane Doe \n\n\n\n Rust engineer\n  Tokio, Axum  \n\n";
        assert_eq!(normalize_whitespace(raw), "Jane Doe\n\nRust engineer\nTokio, Axum");
    }
}
