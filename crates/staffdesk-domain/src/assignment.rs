//! Legacy task-assignment reconciliation.
//!
//! Older task rows carry only a free-text assignment label instead of an
//! employee reference. Resolving such a label back to an employee is an
//! approximation: an admin typo in the label can misroute a task, so
//! callers should surface the tier that produced the match.

use crate::code::EmployeeCode;

/// Canonical display label linking a task to an employee:
/// `"<code> - <name>"`, e.g. `"LSEMP0001 - Anirudh Malode"`.
pub fn assignment_label(code: &EmployeeCode, name: &str) -> String {
    format!("{} - {}", code.as_str(), name)
}

/// Which rung of the fallback chain produced a match set. Anything other
/// than `Exact` is an approximation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    NameSubstring,
    CodeSubstring,
}

/// Resolve free-text labels back to an employee, in priority order:
///
/// 1. exact match on the canonical label;
/// 2. else case-insensitive substring match on the employee name;
/// 3. else substring match on the employee code.
///
/// Returns `None` when all three tiers are empty — an employee with no
/// visible tasks, not an error. Each tier filters the full input set;
/// input order is preserved.
pub fn reconcile_by_label<'a, T>(
    items: &'a [T],
    label_of: impl Fn(&T) -> Option<&str>,
    code: &EmployeeCode,
    name: &str,
) -> Option<(Vec<&'a T>, MatchTier)> {
    let pattern = assignment_label(code, name);
    let exact: Vec<&T> = items
        .iter()
        .filter(|t| label_of(t) == Some(pattern.as_str()))
        .collect();
    if !exact.is_empty() {
        return Some((exact, MatchTier::Exact));
    }

    let name_lower = name.to_lowercase();
    let by_name: Vec<&T> = items
        .iter()
        .filter(|t| label_of(t).is_some_and(|l| l.to_lowercase().contains(&name_lower)))
        .collect();
    if !by_name.is_empty() {
        return Some((by_name, MatchTier::NameSubstring));
    }

    let by_code: Vec<&T> = items
        .iter()
        .filter(|t| label_of(t).is_some_and(|l| l.contains(code.as_str())))
        .collect();
    if by_code.is_empty() {
        None
    } else {
        Some((by_code, MatchTier::CodeSubstring))
    }
}
