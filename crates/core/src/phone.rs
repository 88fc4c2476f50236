//! Payment phone number normalization.
//!
//! The gateway only accepts MSISDNs in international form (`2547XXXXXXXX`).
//! Customers usually type the local form (`07XXXXXXXX`).

/// Kenyan country calling code, without the `+`.
pub const COUNTRY_CODE: &str = "254";

/// Rewrite a phone number into the gateway's international form.
///
/// Whitespace and a leading `+` are dropped, then a leading `0` is replaced
/// by [`COUNTRY_CODE`]. Anything else is returned as-is.
///
/// ```
/// use crave_core::phone::normalize_msisdn;
///
/// assert_eq!(normalize_msisdn("0712345678"), "254712345678");
/// assert_eq!(normalize_msisdn("254712345678"), "254712345678");
/// ```
pub fn normalize_msisdn(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = compact.strip_prefix('+').unwrap_or(&compact);
    match digits.strip_prefix('0') {
        Some(rest) => format!("{COUNTRY_CODE}{rest}"),
        None => digits.to_string(),
    }
}
