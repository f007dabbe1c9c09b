//! Credential derivation: login email and password are derived from the
//! employee record, never chosen independently. Pure functions, no I/O.

use crate::code::EmployeeCode;

/// Derive the login email from an employee name: lowercase first token,
/// then the remaining tokens lowercased and joined without separators,
/// at the given org domain.
///
/// `"Anirudh Malode"` with domain `"lazysquad.com"` becomes
/// `"anirudhmalode@lazysquad.com"`. Callers must validate the name first
/// (`validate::is_valid_name`); this function assumes ASCII letters/spaces.
pub fn derive_email(name: &str, domain: &str) -> String {
    let mut tokens = name.split_whitespace();
    let first = tokens.next().unwrap_or("").to_lowercase();
    let rest = tokens.collect::<String>().to_lowercase();
    format!("{first}{rest}@{domain}")
}

/// Which password-derivation convention is in force.
///
/// Two conventions exist in the field; which one a deployment uses is a
/// configuration choice. Switching conventions rotates every password the
/// next time an identity-touching update or login back-fill runs for the
/// employee, because rotation is driven by derived-password comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordConvention {
    /// Password is exactly the employee code, case-sensitive. The default.
    #[default]
    Code,
    /// Older convention: the name (whitespace removed) concatenated with
    /// the employee code, e.g. `"AnirudhMalodeLSEMP0001"`.
    NameCode,
}

impl PasswordConvention {
    pub fn from_kebab_case(s: &str) -> Option<Self> {
        match s {
            "code" => Some(Self::Code),
            "name-code" => Some(Self::NameCode),
            _ => None,
        }
    }

    /// Derive the password for an employee under this convention.
    pub fn derive(self, name: &str, code: &EmployeeCode) -> String {
        match self {
            Self::Code => code.as_str().to_owned(),
            Self::NameCode => {
                let joined: String = name.split_whitespace().collect();
                format!("{joined}{}", code.as_str())
            }
        }
    }
}

/// Capitalize a name per whitespace-separated token: first character
/// uppercased, the rest lowercased. Internal whitespace is preserved
/// exactly as typed (pinned behavior; see the `john   doe` test).
pub fn capitalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut at_token_start = true;
    for c in name.chars() {
        if c.is_whitespace() {
            at_token_start = true;
            out.push(c);
        } else if at_token_start {
            out.extend(c.to_uppercase());
            at_token_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Avatar initials: first character of each name token, at most 2,
/// uppercased.
pub fn avatar_text(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}
