use serde_json::Value;

/// Fields the settlement flow needs out of a provider response, regardless of
/// where the provider happened to nest them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProviderFields {
    pub status: Option<String>,
    pub code_detail: Option<String>,
    pub description: Option<String>,
    pub message: Option<String>,
    pub trx_id: Option<String>,
}

/// Payment artifacts a success notification can carry.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PaymentArtifacts {
    pub payment_link: Option<String>,
    pub qr_string: Option<String>,
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Case-insensitive lookup of the first matching key directly on an object.
fn lookup_direct(value: &Value, keys: &[&str]) -> Option<String> {
    let obj = value.as_object()?;
    for key in keys {
        for (k, v) in obj {
            if k.eq_ignore_ascii_case(key) {
                if let Some(s) = scalar_to_string(v) {
                    return Some(s);
                }
            }
        }
    }
    None
}

/// Depth-first search for any of `keys`, case-insensitively. Strings that
/// look like embedded JSON documents are parsed and searched too, since some
/// providers double-encode their payloads.
fn deep_find(value: &Value, keys: &[&str]) -> Option<String> {
    match value {
        Value::Object(obj) => {
            for key in keys {
                for (k, v) in obj {
                    if k.eq_ignore_ascii_case(key) {
                        if let Some(s) = scalar_to_string(v) {
                            return Some(s);
                        }
                    }
                }
            }
            obj.values().find_map(|v| deep_find(v, keys))
        }
        Value::Array(items) => items.iter().find_map(|v| deep_find(v, keys)),
        Value::String(s) => {
            let trimmed = s.trim();
            let looks_like_json = (trimmed.starts_with('{') && trimmed.ends_with('}'))
                || (trimmed.starts_with('[') && trimmed.ends_with(']'));
            if looks_like_json {
                serde_json::from_str::<Value>(trimmed)
                    .ok()
                    .and_then(|parsed| deep_find(&parsed, keys))
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Ordered extraction: the `data` envelope wins over the root, and a direct
/// field wins over a deep search at either level.
fn extract_field(root: &Value, keys: &[&str]) -> Option<String> {
    let data = root.get("data");
    if let Some(d) = data {
        if let Some(v) = lookup_direct(d, keys) {
            return Some(v);
        }
    }
    if let Some(v) = lookup_direct(root, keys) {
        return Some(v);
    }
    if let Some(d) = data {
        if let Some(v) = deep_find(d, keys) {
            return Some(v);
        }
    }
    deep_find(root, keys)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

pub fn extract_provider_fields(root: &Value) -> ProviderFields {
    ProviderFields {
        status: non_empty(extract_field(root, &["xl_status"])),
        code_detail: non_empty(extract_field(root, &["xl_code_detail", "xl_code"])),
        description: non_empty(extract_field(root, &["xl_description", "xl_title"])),
        message: non_empty(extract_field(root, &["xl_message"])),
        trx_id: non_empty(extract_field(
            root,
            &["trx_id", "transaction_id", "transactionId"],
        )),
    }
}

/// A provider call counts as settled only when the top-level `success` flag
/// is true AND, whenever a provider status was reported at all, that status
/// reads SUCCESS. A success flag with a contradicting status is a failure.
pub fn is_provider_success(root: &Value, fields: &ProviderFields) -> bool {
    let flag = root
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    match &fields.status {
        Some(status) => flag && status.trim().eq_ignore_ascii_case("SUCCESS"),
        None => flag,
    }
}

/// Pulls a payment link and/or raw payment code out of the response, checking
/// the `data` envelope, its nested `payment_info` block, then the root.
pub fn extract_payment_artifacts(root: &Value) -> PaymentArtifacts {
    const LINK_KEYS: [&str; 4] = ["payment_link", "link", "url", "link_pembayaran"];
    const QR_KEYS: [&str; 5] = ["qr_string", "qr", "emv", "qr_payload", "link_pembayaran"];
    const INFO_LINK_KEYS: [&str; 3] = ["payment_url", "link", "deeplink"];
    const INFO_QR_KEYS: [&str; 3] = ["qr_code", "qr", "emv"];

    let mut payment_link = None;
    let mut qr_string = None;

    if let Some(data) = root.get("data") {
        payment_link = non_empty(lookup_direct(data, &LINK_KEYS));
        qr_string = non_empty(lookup_direct(data, &QR_KEYS));
        if let Some(info) = data.get("payment_info") {
            qr_string = qr_string.or_else(|| non_empty(lookup_direct(info, &INFO_QR_KEYS)));
            payment_link =
                payment_link.or_else(|| non_empty(lookup_direct(info, &INFO_LINK_KEYS)));
        }
    }
    payment_link = payment_link.or_else(|| non_empty(lookup_direct(root, &LINK_KEYS)));
    qr_string = qr_string.or_else(|| non_empty(lookup_direct(root, &QR_KEYS)));

    PaymentArtifacts {
        payment_link,
        qr_string,
    }
}

/// Human-readable reason a settlement was rejected, for the audit note and
/// the failure notification.
pub fn failure_reason(root: &Value, fields: &ProviderFields) -> String {
    fields
        .message
        .clone()
        .or_else(|| fields.description.clone())
        .or_else(|| non_empty(root.get("error").and_then(scalar_to_string)))
        .or_else(|| non_empty(root.get("message").and_then(scalar_to_string)))
        .unwrap_or_else(|| "tidak ada pesan dari provider".to_string())
}
