//! Field validation predicates, evaluated before any mutating operation.
//! Invalid input never reaches the store or the identity provider.

use chrono::{Days, NaiveDate};

/// `local@domain` shape check with a dotted domain — deliberately not full
/// RFC 5322.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && !local.contains(char::is_whitespace)
                && domain.len() >= 3
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains(char::is_whitespace)
        }
        _ => false,
    }
}

/// ASCII letters and spaces only, with at least one letter.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ')
}

/// Exactly 10 digits after stripping the leading `+91` country-code prefix
/// (with optional following space).
pub fn is_valid_phone(phone: &str) -> bool {
    let rest = phone
        .strip_prefix("+91")
        .map(|r| r.strip_prefix(' ').unwrap_or(r))
        .unwrap_or(phone);
    rest.len() == 10 && rest.bytes().all(|b| b.is_ascii_digit())
}

/// Shape check for `dd/mm/yyyy` display dates. Digits and slashes only;
/// calendar validity is the parser's concern.
pub fn is_valid_display_date(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 10
        && b.iter()
            .enumerate()
            .all(|(i, &c)| if i == 2 || i == 5 { c == b'/' } else { c.is_ascii_digit() })
}

/// Parse a `dd/mm/yyyy` string defensively: unparsable input resolves to
/// `None`, never a panic.
pub fn parse_display_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%d/%m/%Y").ok()
}

pub fn format_display_date(d: NaiveDate) -> String {
    d.format("%d/%m/%Y").to_string()
}

/// Sprint end date: creation date plus the sprint length in days. Plain
/// date arithmetic, no timezone normalization. `None` when the window runs
/// past the representable calendar.
pub fn sprint_end_date(created_at: NaiveDate, sprint_days: u32) -> Option<NaiveDate> {
    created_at.checked_add_days(Days::new(u64::from(sprint_days)))
}
