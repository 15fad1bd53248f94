use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::Error;

/// Base64 line length used in MIME bodies
pub const LINE_LENGTH: usize = 76;
const LINE_ENDING: &str = "\r\n";

/// Base64 encode `data` and wrap it into lines of `LINE_LENGTH`.
/// Every line, including the last one, ends with CRLF.
pub fn encode_wrapped(data: &[u8]) -> String {
    let encoded = STANDARD.encode(data);
    let mut wrapped =
        String::with_capacity(encoded.len() + (encoded.len() / LINE_LENGTH + 1) * LINE_ENDING.len());

    // Base64 output is pure ASCII so byte chunks are valid UTF-8
    for line in encoded.as_bytes().chunks(LINE_LENGTH) {
        wrapped.push_str(&String::from_utf8_lossy(line));
        wrapped.push_str(LINE_ENDING);
    }

    wrapped
}

/// Read a whole file into memory and return it base64 encoded
pub fn read_encoded(path: &Path) -> Result<String, Error> {
    let data = fs::read(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    log::debug!("Encoding attachment {} ({} bytes)", path.display(), data.len());

    Ok(encode_wrapped(&data))
}
