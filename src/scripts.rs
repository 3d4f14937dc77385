//! Custom header and footer code
//!
//! Operators can inject analytics or pixel snippets into every public
//! page. Code is sanitized once at save time and emitted verbatim at
//! render time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::{Capability, Principal};
use crate::notifications::sanitizer::is_checked;
use crate::notifications::types::{FooterCode, FooterPriority, HeaderCode, ScriptsSettings};

const HEADER_MARKER: &str = "Promotional Footer Bar - Header Code";
const FOOTER_MARKER: &str = "Promotional Footer Bar - Footer Code";

/// Elements removed, with their content, for principals without
/// `unfiltered_html`
const BLOCKED_ELEMENTS: &[&str] = &["script", "iframe", "object", "embed"];

/// The scripts form as submitted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawScriptsSettings {
    pub header_enabled: Option<Value>,
    pub header_code: Option<String>,
    pub footer_enabled: Option<Value>,
    pub footer_code: Option<String>,
    pub footer_priority: Option<Value>,
}

impl From<&ScriptsSettings> for RawScriptsSettings {
    fn from(settings: &ScriptsSettings) -> Self {
        Self {
            header_enabled: Some(Value::Bool(settings.header_code.enabled)),
            header_code: Some(settings.header_code.code.clone()),
            footer_enabled: Some(Value::Bool(settings.footer_code.enabled)),
            footer_code: Some(settings.footer_code.code.clone()),
            footer_priority: Some(Value::from(u8::from(settings.footer_code.priority))),
        }
    }
}

impl RawScriptsSettings {
    /// Build the record to store on behalf of `principal`
    pub fn sanitize(&self, principal: &Principal) -> ScriptsSettings {
        let code = |field: &Option<String>| {
            sanitize_tracking_code(field.as_deref().unwrap_or(""), principal)
        };

        ScriptsSettings {
            header_code: HeaderCode {
                enabled: is_checked(&self.header_enabled),
                code: code(&self.header_code),
            },
            footer_code: FooterCode {
                enabled: is_checked(&self.footer_enabled),
                code: code(&self.footer_code),
                priority: parse_priority(self.footer_priority.as_ref()),
            },
        }
    }
}

/// Only 5 and 15 are meaningful; anything else means 15
fn parse_priority(value: Option<&Value>) -> FooterPriority {
    let priority = match value {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    match priority {
        Some(5) => FooterPriority::BeforeNotifications,
        _ => FooterPriority::AfterNotifications,
    }
}

/// Raw for trusted principals, filtered for everyone else
pub fn sanitize_tracking_code(code: &str, principal: &Principal) -> String {
    if principal.can(Capability::UnfilteredHtml) {
        return code.to_string();
    }

    let stripped = BLOCKED_ELEMENTS
        .iter()
        .fold(code.to_string(), |acc, tag| strip_element(&acc, tag));
    strip_event_handlers(&stripped)
}

/// Remove every `<tag ...>...</tag>` occurrence, case-insensitively
///
/// An opening tag without a matching close is removed on its own.
fn strip_element(code: &str, tag: &str) -> String {
    let lower = code.to_ascii_lowercase();
    let open = format!("<{tag}");
    let close = format!("</{tag}");
    let mut out = String::with_capacity(code.len());
    let mut cursor = 0;

    while let Some(found) = lower[cursor..].find(&open) {
        let start = cursor + found;
        let after = start + open.len();
        let at_boundary = lower
            .as_bytes()
            .get(after)
            .map_or(true, |b| b.is_ascii_whitespace() || *b == b'>' || *b == b'/');
        if !at_boundary {
            out.push_str(&code[cursor..after]);
            cursor = after;
            continue;
        }

        out.push_str(&code[cursor..start]);
        let Some(open_len) = lower[after..].find('>') else {
            cursor = code.len();
            break;
        };
        let open_end = after + open_len + 1;

        cursor = match lower[open_end..].find(&close) {
            Some(offset) => {
                let close_start = open_end + offset;
                lower[close_start..]
                    .find('>')
                    .map_or(code.len(), |len| close_start + len + 1)
            }
            None => open_end,
        };
    }

    out.push_str(&code[cursor..]);
    out
}

/// Drop `on*=` attributes from every tag
fn strip_event_handlers(code: &str) -> String {
    let bytes = code.as_bytes();
    let mut out = String::with_capacity(code.len());
    let mut last = 0;
    let mut i = 0;
    let mut in_tag = false;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let b = bytes[i];
        if in_tag {
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
            } else if b == b'"' || b == b'\'' {
                quote = Some(b);
            } else if b == b'>' {
                in_tag = false;
            } else if b.is_ascii_whitespace() {
                if let Some(end) = event_attribute_end(bytes, i) {
                    out.push_str(&code[last..i]);
                    last = end;
                    i = end;
                    continue;
                }
            }
        } else if b == b'<' && bytes.get(i + 1).is_some_and(|c| c.is_ascii_alphabetic()) {
            in_tag = true;
        }
        i += 1;
    }

    out.push_str(&code[last..]);
    out
}

/// End offset of an `on<name>=<value>` attribute preceded by whitespace at
/// `start`, or `None` if there is no such attribute there
fn event_attribute_end(bytes: &[u8], start: usize) -> Option<usize> {
    let skip_ws = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut i = skip_ws(start);
    if !(bytes.get(i)?.eq_ignore_ascii_case(&b'o') && bytes.get(i + 1)?.eq_ignore_ascii_case(&b'n')) {
        return None;
    }
    i += 2;
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'-') {
        i += 1;
    }
    if i == name_start {
        return None;
    }

    i = skip_ws(i);
    if *bytes.get(i)? != b'=' {
        return None;
    }
    i = skip_ws(i + 1);

    match bytes.get(i) {
        Some(&q) if q == b'"' || q == b'\'' => Some(
            bytes[i + 1..]
                .iter()
                .position(|&c| c == q)
                .map_or(bytes.len(), |len| i + 1 + len + 1),
        ),
        Some(_) => {
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                i += 1;
            }
            Some(i)
        }
        None => Some(i),
    }
}

fn wrap(marker: &str, code: &str) -> String {
    format!("\n<!-- {marker} -->\n{code}\n<!-- / {marker} -->\n")
}

/// Header snippet for public pages, `None` when disabled or empty
pub fn inject_header_code(settings: &ScriptsSettings) -> Option<String> {
    let header = &settings.header_code;
    (header.enabled && !header.code.is_empty()).then(|| wrap(HEADER_MARKER, &header.code))
}

/// Footer snippet for public pages, `None` when disabled or empty
pub fn inject_footer_code(settings: &ScriptsSettings) -> Option<String> {
    let footer = &settings.footer_code;
    (footer.enabled && !footer.code.is_empty()).then(|| wrap(FOOTER_MARKER, &footer.code))
}
