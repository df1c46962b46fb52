use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// CRC-16/CCITT-FALSE over the payload bytes, rendered as 4 uppercase hex
/// digits. Polynomial 0x1021, initial value 0xFFFF, no reflection.
pub fn crc16_ccitt(payload: &str) -> String {
    let mut crc: u16 = 0xFFFF;
    for byte in payload.bytes() {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    format!("{crc:04X}")
}

/// Additional merchant fee attached to a dynamic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFee<'a> {
    Fixed(&'a str),
    Percent(&'a str),
}

/// Rewrites a static QRIS payload into a dynamic one carrying `amount` (tag
/// 54) and an optional service fee (tag 55), then re-signs the CRC.
///
/// Returns `None` when the input is non-ASCII or too short to carry a CRC.
pub fn make_dynamic(static_code: &str, amount: &str, fee: Option<ServiceFee<'_>>) -> Option<String> {
    let trimmed = static_code.trim();
    if !trimmed.is_ascii() || trimmed.len() <= 4 {
        return None;
    }
    // The final 4 characters are the old CRC; everything else is rebuilt.
    let stripped = &trimmed[..trimmed.len() - 4];
    let dynamic = stripped.replace("010211", "010212");

    // Without the country-code marker the amount block goes at the end.
    let (head, tail) = match dynamic.split_once("5802ID") {
        Some((head, tail)) => (head, tail),
        None => {
            warn!("⚠️ QRIS payload has no 5802ID marker, appending amount at the end");
            (dynamic.as_str(), "")
        }
    };

    let mut block = format!("54{:02}{}", amount.len(), amount);
    match fee {
        Some(ServiceFee::Fixed(f)) => {
            block.push_str(&format!("55020256{:02}{}", f.len(), f));
        }
        Some(ServiceFee::Percent(f)) => {
            block.push_str(&format!("55020357{:02}{}", f.len(), f));
        }
        None => {}
    }
    block.push_str("5802ID");

    let unsigned = format!("{head}{block}{tail}");
    let crc = crc16_ccitt(&unsigned);
    Some(format!("{unsigned}{crc}"))
}

/// Flat parse of the top-level TLV structure of an EMV payload. Non-ASCII
/// input parses as empty.
pub fn parse_tlv(payload: &str) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    if !payload.is_ascii() {
        return out;
    }
    let bytes = payload.as_bytes();
    let mut pos = 0;
    while pos + 4 <= bytes.len() {
        let tag = &payload[pos..pos + 2];
        let Ok(len) = payload[pos + 2..pos + 4].parse::<usize>() else {
            break;
        };
        let end = pos + 4 + len;
        if end > bytes.len() {
            break;
        }
        out.insert(tag.to_string(), payload[pos + 4..end].to_string());
        pos = end;
    }
    out
}

static CONSTRAINED_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z .\-_/:*]+$").unwrap());

/// Cheap shape check used to decide whether a provider string is a raw EMV
/// payload (renderable as a QR) rather than a URL or free text.
pub fn is_emv_payload(candidate: &str) -> bool {
    let trimmed = candidate.trim();
    if trimmed.len() < 20 {
        return false;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return false;
    }
    if trimmed.starts_with("000201") || lower.contains("id.co.qris") {
        return true;
    }
    // Long single-token strings over the EMV character set, without the
    // spaces free text would have.
    trimmed.len() >= 80 && !trimmed.contains(' ') && CONSTRAINED_CHARSET.is_match(trimmed)
}
