//! Parse raw response header lines into status and `Location`.

/// Status line and redirect target of the last response block seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: Option<u32>,
    pub location: Option<String>,
}

/// Parse collected header lines. A new status line (e.g. after `100 Continue`)
/// starts a fresh block, so only the final response's headers count.
///
/// Lines are raw bytes off the wire; see [`decode_header_line`].
pub fn parse_response_head<L: AsRef<[u8]>>(lines: &[L]) -> ResponseHead {
    let mut head = ResponseHead::default();

    for line in lines {
        let line = decode_header_line(line.as_ref());
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            head = ResponseHead {
                status: line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|code| code.parse::<u32>().ok()),
                location: None,
            };
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("location") {
                let value = value.trim();
                if !value.is_empty() {
                    head.location = Some(value.to_string());
                }
            }
        }
    }

    head
}

/// Header bytes as text. ASCII is kept as-is and every byte >= 0x80 is
/// percent-encoded, so a `Location` sent as Latin-1 (or any other non-UTF-8
/// encoding) still joins into a valid URL.
pub fn decode_header_line(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    for &b in raw {
        if b.is_ascii() {
            out.push(char::from(b));
        } else {
            out.push_str(&format!("%{:02X}", b));
        }
    }
    out
}
