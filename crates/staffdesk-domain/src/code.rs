//! Human-readable record identifiers: employee codes and task ids.
//!
//! Both are a fixed prefix followed by 4 zero-padded decimal digits and are
//! assigned either by the admin or auto-numbered from the maximum existing
//! numeric suffix (max + 1, never the first gap).

use std::fmt;

/// Employee code, format `LSEMP####`. Unique among active employees.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EmployeeCode(String);

impl EmployeeCode {
    pub const PREFIX: &'static str = "LSEMP";

    /// Parse a full code string, e.g. `"LSEMP0007"`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_digits(s.strip_prefix(Self::PREFIX)?)
    }

    /// Build from the digit suffix alone, e.g. `"0007"`. Exactly 4 decimal digits.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(format!("{}{digits}", Self::PREFIX)))
        } else {
            None
        }
    }

    /// Build from a sequence number, zero-padded to 4 digits. `None` once
    /// the number falls outside the 4-digit space.
    pub fn from_number(n: u32) -> Option<Self> {
        (n <= 9999).then(|| Self(format!("{}{n:04}", Self::PREFIX)))
    }

    /// Numeric suffix of the code.
    pub fn number(&self) -> u32 {
        self.0[Self::PREFIX.len()..].parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task id, format `TID-####`. Unique across all tasks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(String);

impl TaskId {
    pub const PREFIX: &'static str = "TID-";

    /// Parse a full task id string, e.g. `"TID-0042"`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::from_digits(s.strip_prefix(Self::PREFIX)?)
    }

    /// Build from the digit suffix alone. Exactly 4 decimal digits.
    pub fn from_digits(digits: &str) -> Option<Self> {
        if digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(format!("{}{digits}", Self::PREFIX)))
        } else {
            None
        }
    }

    /// Build from a sequence number, zero-padded to 4 digits. `None` once
    /// the number falls outside the 4-digit space.
    pub fn from_number(n: u32) -> Option<Self> {
        (n <= 9999).then(|| Self(format!("{}{n:04}", Self::PREFIX)))
    }

    /// Numeric suffix of the id.
    pub fn number(&self) -> u32 {
        self.0[Self::PREFIX.len()..].parse().unwrap_or(0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Next auto-assigned sequence number: max existing suffix + 1, not the
/// first gap. An empty set starts at 1.
pub fn next_number<I: IntoIterator<Item = u32>>(numbers: I) -> u32 {
    numbers.into_iter().max().unwrap_or(0) + 1
}
