//! Best-effort mime classification at write time.

/// Sniff a mime type from magic bytes, falling back to the file extension.
/// Returns `None` when neither recognizes the content.
pub fn sniff(name: &str, content: &[u8]) -> Option<String> {
    sniff_magic(content)
        .or_else(|| extension_mime(name))
        .map(str::to_string)
}

fn sniff_magic(content: &[u8]) -> Option<&'static str> {
    if content.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
        return Some("image/gif");
    }
    if content.starts_with(b"%PDF-") {
        return Some("application/pdf");
    }
    if content.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
        return Some("application/zip");
    }
    if content.starts_with(&[0x1F, 0x8B]) {
        return Some("application/gzip");
    }
    None
}

fn extension_mime(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "txt" | "log" => Some("text/plain"),
        "html" | "htm" => Some("text/html"),
        "css" => Some("text/css"),
        "csv" => Some("text/csv"),
        "js" => Some("text/javascript"),
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "svg" => Some("image/svg+xml"),
        "webp" => Some("image/webp"),
        "bin" => Some("application/octet-stream"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magic_bytes_win_over_extension() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(sniff("image.txt", &png).as_deref(), Some("image/png"));
    }

    #[test]
    fn extension_fallback() {
        assert_eq!(sniff("notes.txt", b"hello").as_deref(), Some("text/plain"));
        assert_eq!(sniff("data.JSON", b"{}").as_deref(), Some("application/json"));
    }

    #[test]
    fn unknown_content_yields_none() {
        assert_eq!(sniff("blob.xyz", b"\x00\x01\x02"), None);
    }
}
