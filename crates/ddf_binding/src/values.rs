//! Typed value parsers.
//!
//! Every parser takes the value text exactly as the file driver handed it
//! over (macro-substituted, quotes removed). Parsers that have a documented
//! lax-mode fallback take the [`Diagnostics`] so they can apply the
//! strict/lax policy; the others fail outright.

use ddf_foundation::{Diagnostics, Error, Result, TIC_RATE, names_match};

/// Stored for `MAXT`: "wait forever".
pub const TIME_MAX: i32 = i32::MAX;

/// Reserved colour meaning "no colour given".
pub const RGB_NO_VALUE: u32 = 0x00_FF_FF;

/// Slopes are clamped to this many degrees either side of flat.
pub const SLOPE_LIMIT_DEGREES: f32 = 89.5;

/// Maximum length of a lump (resource) name.
pub const LUMP_NAME_LEN: usize = 8;

/// Length of the longest numeric prefix of `text` in the given radix.
fn digit_run(text: &str, radix: u32) -> usize {
    text.bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count()
}

/// Parses an integer with `strtol(text, NULL, 0)` semantics.
///
/// Leading whitespace and a sign are accepted, `0x` selects hex and a
/// leading `0` selects octal. Trailing junk after the digits is ignored.
/// Results beyond the `i32` range saturate.
///
/// # Errors
///
/// Returns `NotNumeric` if the text starts with a letter or has no digits.
pub fn parse_numeric(text: &str) -> Result<i32> {
    let s = text.trim_start();
    if s.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return Err(Error::not_numeric(text));
    }

    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let hex = s
        .get(..2)
        .is_some_and(|p| p.eq_ignore_ascii_case("0x"))
        && digit_run(&s[2..], 16) > 0;
    let (radix, digits) = if hex {
        (16, &s[2..])
    } else if s.starts_with('0') {
        (8, s)
    } else {
        (10, s)
    };

    let len = digit_run(digits, radix);
    if len == 0 {
        return Err(Error::not_numeric(text));
    }

    let mut value: i64 = 0;
    for b in digits[..len].bytes() {
        let d = i64::from(char::from(b).to_digit(radix).unwrap_or(0));
        value = value.saturating_mul(i64::from(radix)).saturating_add(d);
    }
    if negative {
        value = -value;
    }
    Ok(i32::try_from(value).unwrap_or(if negative { i32::MIN } else { i32::MAX }))
}

/// Length of the longest prefix of `s` that reads as a float.
fn float_prefix(s: &str) -> usize {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'-' | b'+')) {
        i += 1;
    }
    let int_digits = digit_run(&s[i..], 10);
    i += int_digits;
    let mut frac_digits = 0;
    if b.get(i) == Some(&b'.') {
        frac_digits = digit_run(&s[i + 1..], 10);
        i += 1 + frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return 0;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(b.get(j), Some(b'-' | b'+')) {
            j += 1;
        }
        let exp = digit_run(&s[j..], 10);
        if exp > 0 {
            i = j + exp;
        }
    }
    i
}

/// Reads a plain float, ignoring trailing junk like `sscanf("%f")`.
fn scan_float(text: &str) -> Result<f32> {
    let s = text.trim();
    let len = float_prefix(s);
    if len == 0 {
        return Err(Error::not_numeric(text));
    }
    s[..len].parse::<f32>().map_err(|_| Error::not_numeric(text))
}

/// Parses a float.
///
/// A value containing `%` is read as a percentage instead (see
/// [`parse_percent_any`]), so `50%` and `0.5` mean the same thing.
///
/// # Errors
///
/// Returns `NotNumeric` if no number can be read.
pub fn parse_float(text: &str, diag: &mut Diagnostics) -> Result<f32> {
    if text.contains('%') {
        return parse_percent_any(text, diag);
    }
    scan_float(text)
}

/// Reads `NN%` (digits and `.` only) and returns NN / 100.
fn percent_body(text: &str) -> Result<Option<f32>> {
    let s = text.trim();
    let Some(body) = s.strip_suffix('%') else {
        return Ok(None);
    };
    let body = body.trim_end();
    if body.is_empty() || !body.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(Error::bad_value("percentage", text));
    }
    let value: f32 = body
        .parse()
        .map_err(|_| Error::bad_value("percentage", text))?;
    Ok(Some(value / 100.0))
}

/// Parses a percentage bounded to `0..=1`.
///
/// `100%` is stored as exactly 1.0. A value above `100%` is out of range:
/// fatal in strict mode and clamped in lax mode. A bare number without `%`
/// is the legacy form: it is taken as already normalized and clamped
/// silently.
///
/// # Errors
///
/// Malformed text, or an out-of-range value in strict mode.
pub fn parse_percent(text: &str, diag: &mut Diagnostics) -> Result<f32> {
    match percent_body(text)? {
        Some(value) => {
            if !(0.0..=1.0).contains(&value) {
                diag.complain(Error::out_of_range("percentage", text))?;
            }
            Ok(value.clamp(0.0, 1.0))
        }
        None => Ok(scan_float(text)?.clamp(0.0, 1.0)),
    }
}

/// Parses a percentage that may lie outside `0..=1` (e.g. `150%`).
///
/// A bare number is accepted with a warning and taken as already
/// normalized.
///
/// # Errors
///
/// Malformed text.
pub fn parse_percent_any(text: &str, diag: &mut Diagnostics) -> Result<f32> {
    if let Some(value) = percent_body(text)? {
        return Ok(value);
    }
    let value = scan_float(text)?;
    diag.warn(format!("percentage '{text}' has no '%' (read as {value})"));
    Ok(value)
}

/// Parses a duration into tics.
///
/// `MAXT` means forever ([`TIME_MAX`]), `NNT` is already in tics, anything
/// else is seconds multiplied by [`TIC_RATE`] and truncated.
///
/// # Errors
///
/// Returns `NotNumeric` if no number can be read.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn parse_time(text: &str) -> Result<i32> {
    let s = text.trim();
    if names_match(s, "MAXT") {
        return Ok(TIME_MAX);
    }
    if let Some(tics) = s.strip_suffix(['T', 't']) {
        return parse_numeric(tics);
    }
    let seconds = scan_float(s)?;
    Ok((seconds * TIC_RATE as f32) as i32)
}

/// Parses an angle in degrees into a binary angle.
///
/// The full circle maps onto the whole `u32` range; angles wrap.
///
/// # Errors
///
/// Returns `NotNumeric` if no number can be read.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_angle(text: &str) -> Result<u32> {
    let degrees = f64::from(scan_float(text)?).rem_euclid(360.0);
    Ok((degrees / 360.0 * 4_294_967_296.0) as u32)
}

/// Parses a slope given as an angle in degrees and returns its tangent.
///
/// # Errors
///
/// Returns `NotNumeric` if no number can be read.
pub fn parse_slope(text: &str) -> Result<f32> {
    let degrees = scan_float(text)?.clamp(-SLOPE_LIMIT_DEGREES, SLOPE_LIMIT_DEGREES);
    Ok(degrees.to_radians().tan())
}

/// Parses a colour: `NONE` or `#RRGGBB`.
///
/// A real colour that happens to equal [`RGB_NO_VALUE`] is nudged by one
/// bit so it still reads as a colour.
///
/// # Errors
///
/// Returns `BadValue` for anything else.
pub fn parse_rgb(text: &str) -> Result<u32> {
    let s = text.trim();
    if names_match(s, "NONE") {
        return Ok(RGB_NO_VALUE);
    }
    let hex = s
        .strip_prefix('#')
        .filter(|h| !h.is_empty() && h.len() <= 6)
        .ok_or_else(|| Error::bad_value("colour", text))?;
    let value = u32::from_str_radix(hex, 16).map_err(|_| Error::bad_value("colour", text))?;
    if value == RGB_NO_VALUE {
        return Ok(value ^ 0x00_00_01);
    }
    Ok(value)
}

/// Parses a bit set: an integer, or letters `A`-`Z` (with `A-F` ranges),
/// where each letter sets bit `letter - 'A'`.
///
/// # Errors
///
/// Returns `BadValue` for characters other than capital letters, `-` and
/// spaces, or for backwards ranges.
#[allow(clippy::cast_sign_loss)]
pub fn parse_bitset(text: &str) -> Result<u32> {
    let s = text.trim();
    if s.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+') {
        return parse_numeric(s).map(|v| v as u32);
    }

    let bad = || Error::bad_value("bit set", text);
    let mut bits = 0u32;
    let mut chars = s.chars().filter(|c| !c.is_whitespace()).peekable();
    while let Some(start) = chars.next() {
        if !start.is_ascii_uppercase() {
            return Err(bad());
        }
        let mut end = start;
        if chars.peek() == Some(&'-') {
            chars.next();
            end = chars.next().filter(char::is_ascii_uppercase).ok_or_else(bad)?;
            if end < start {
                return Err(bad());
            }
        }
        for letter in start..=end {
            bits |= 1 << (u32::from(letter) - u32::from('A'));
        }
    }
    Ok(bits)
}

/// Parses a boolean: `TRUE`/`FALSE` (any case) or `1`/`0`.
///
/// # Errors
///
/// Returns `BadValue` for anything else.
pub fn parse_boolean(text: &str) -> Result<bool> {
    let s = text.trim();
    if names_match(s, "TRUE") || s == "1" {
        Ok(true)
    } else if names_match(s, "FALSE") || s == "0" {
        Ok(false)
    } else {
        Err(Error::bad_value("boolean", text))
    }
}

/// Returns the text as an owned string.
#[must_use]
pub fn parse_string(text: &str) -> String {
    text.to_string()
}

/// Parses a lump name of at most [`LUMP_NAME_LEN`] characters.
///
/// A longer name is out of range: fatal in strict mode, truncated in lax
/// mode.
///
/// # Errors
///
/// An overlong name in strict mode.
pub fn parse_lump_name(text: &str, diag: &mut Diagnostics) -> Result<String> {
    let s = text.trim();
    if s.chars().count() > LUMP_NAME_LEN {
        diag.complain(Error::out_of_range("lump name", text))?;
        return Ok(s.chars().take(LUMP_NAME_LEN).collect());
    }
    Ok(s.to_string())
}

/// Splits `NAME(ARG)` into `NAME` and `ARG`.
///
/// The argument runs to the last `)`, so it may itself contain brackets.
///
/// # Errors
///
/// Returns a syntax error if the brackets are missing or unbalanced.
pub fn decode_brackets(text: &str) -> Result<(&str, &str)> {
    let open = text
        .find('(')
        .ok_or_else(|| Error::syntax(format!("missing '(' in '{text}'")))?;
    let close = text
        .rfind(')')
        .filter(|&close| close > open)
        .ok_or_else(|| Error::syntax(format!("missing ')' in '{text}'")))?;
    if !text[close + 1..].trim().is_empty() {
        return Err(Error::syntax(format!("junk after ')' in '{text}'")));
    }
    Ok((text[..open].trim(), &text[open + 1..close]))
}

/// Splits `text` on `sep`, ignoring separators inside parentheses.
#[must_use]
pub fn split_list(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c == sep && depth == 0 => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Parses `LOW:HIGH`; a single number gives an empty range `N:N`.
///
/// # Errors
///
/// Returns `NotNumeric` for a non-numeric bound.
pub fn parse_int_range(text: &str) -> Result<(i32, i32)> {
    match text.split_once(':') {
        Some((low, high)) => Ok((parse_numeric(low)?, parse_numeric(high)?)),
        None => {
            let value = parse_numeric(text)?;
            Ok((value, value))
        }
    }
}
