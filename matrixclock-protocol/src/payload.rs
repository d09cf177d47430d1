//! Inbound payload interpretation
//!
//! Publishers send plain decimal text. Payloads are parsed permissively:
//! leading whitespace and an optional sign are accepted, parsing stops at
//! the first character that cannot continue the number, and a payload
//! without any digits yields zero. Malformed input is never an error and
//! never leaves the previous value in place.

/// Parse a decimal floating point payload, defaulting to `0.0`
///
/// `"21.5"` → 21.5, `" -3"` → -3.0, `"12abc"` → 12.0, `""` / `"abc"` → 0.0
pub fn parse_f32_or_default(payload: &[u8]) -> f32 {
    let Some(text) = numeric_prefix(payload, true) else {
        return 0.0;
    };
    text.parse::<f32>().unwrap_or(0.0)
}

/// Parse a decimal integer payload, defaulting to `0`
///
/// Values outside the `i32` range saturate. A fractional part is ignored
/// (`"7.9"` → 7).
pub fn parse_i32_or_default(payload: &[u8]) -> i32 {
    let Some(text) = numeric_prefix(payload, false) else {
        return 0;
    };
    match text.parse::<i32>() {
        Ok(value) => value,
        Err(_) if text.starts_with('-') => i32::MIN,
        Err(_) => i32::MAX,
    }
}

/// Textual on/off payload convention used by a topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadSwitch {
    /// Exactly `"On"` switches on (the cooling topic)
    OnWord,
    /// Exactly `"1"` switches on (the heating topic)
    One,
    /// Any of `"1"`, `"On"`, `"true"` switches on (debug text)
    Lenient,
}

/// Check whether a payload switches a feature on
///
/// Everything that is not an exact match for the convention's "on" word
/// means off.
pub fn is_switch_on(payload: &[u8], switch: PayloadSwitch) -> bool {
    match switch {
        PayloadSwitch::OnWord => payload == b"On",
        PayloadSwitch::One => payload == b"1",
        PayloadSwitch::Lenient => matches!(payload, b"1" | b"On" | b"true"),
    }
}

/// Extract the leading numeric portion of a payload
///
/// Returns `None` when no digit is found.
fn numeric_prefix(payload: &[u8], allow_fraction: bool) -> Option<&str> {
    let start = payload
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(payload.len());
    let bytes = &payload[start..];

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let mut digits = 0;
    let mut seen_point = false;
    while let Some(&b) = bytes.get(end) {
        if b.is_ascii_digit() {
            digits += 1;
        } else if b == b'.' && allow_fraction && !seen_point {
            seen_point = true;
        } else {
            break;
        }
        end += 1;
    }

    if digits == 0 {
        return None;
    }

    // Only ASCII sign, digits and '.' were accepted above
    let text = core::str::from_utf8(&bytes[..end]).ok()?;
    Some(text.strip_suffix('.').unwrap_or(text))
}
