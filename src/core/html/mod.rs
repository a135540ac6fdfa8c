// HTML ingestion - a tolerant, block-level view of the incoming document.
// - `model.rs` is the block model every downstream flow consumes.
// - `parser.rs` lowers raw markup into that model.

pub mod model;
pub mod parser;

#[allow(unused_imports)]
pub use model::{Block, Run};
#[allow(unused_imports)]
pub use parser::{parse_blocks, HtmlError};

use base64::{engine::general_purpose, Engine as _};

/// Decodes the `html_base64` request payload. Invalid UTF-8 sequences are
/// replaced rather than rejected.
pub fn decode_base64_html(payload: &str) -> Result<String, base64::DecodeError> {
    let bytes = general_purpose::STANDARD.decode(payload)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_standard_base64() {
        let encoded = general_purpose::STANDARD.encode("<p>hello</p>");
        assert_eq!(decode_base64_html(&encoded).unwrap(), "<p>hello</p>");
    }

    #[test]
    fn rejects_garbage_payloads() {
        assert!(decode_base64_html("not!!base64").is_err());
    }
}
