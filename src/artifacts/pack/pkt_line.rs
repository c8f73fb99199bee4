//! Length-prefixed line framing for the push negotiation
//!
//! Each record is the total record length (prefix included) as 4 lowercase
//! hex digits, followed by the line itself. A `0000` record terminates the
//! list; it is a frame marker, not an empty line.

use bytes::Bytes;

/// The zero-length record terminating a pkt-line list
pub const FLUSH_PKT: &[u8; 4] = b"0000";

/// Encode lines in pkt-line framing, terminated by a flush record
pub fn encode(lines: &[&str]) -> Bytes {
    let mut data = Vec::new();
    for line in lines {
        data.extend_from_slice(format!("{:04x}", line.len() + 4).as_bytes());
        data.extend_from_slice(line.as_bytes());
    }
    data.extend_from_slice(FLUSH_PKT);

    Bytes::from(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefixes_each_line_with_its_own_total_length() {
        let data = encode(&["hello"]);
        assert_eq!(data.as_ref(), b"0009hello0000");
    }

    #[test]
    fn lowercase_hex_prefix_counts_the_prefix_itself() {
        // 252 payload bytes + 4 prefix bytes = 0x100
        let line = "x".repeat(252);
        let data = encode(&[line.as_str()]);

        assert!(data.starts_with(b"0100"));
        assert!(data.ends_with(FLUSH_PKT));
    }

    #[test]
    fn no_lines_still_emits_the_flush_record() {
        assert_eq!(encode(&[]).as_ref(), b"0000");
    }
}
