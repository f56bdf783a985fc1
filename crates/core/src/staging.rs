//! TNM stage-string parsing.
//!
//! Source stage strings vary in formatting (`"T3N1M0"`, `"Stage T3, N1, M0"`,
//! `"cT4b N2 M1"`), so the scan is deliberately permissive: each category is
//! matched independently, case-insensitively, and anywhere in the string.
//! A category with no recognizable match defaults to `Unknown`.

use std::fmt;

/// Primary tumour (T) category.
///
/// `Tis` is carried explicitly because in-situ disease selects the
/// endoscopic-resection pathway; the digit scan alone cannot produce it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TnmT {
    Unknown,
    Tis,
    T0,
    T1,
    T1a,
    T1b,
    T2,
    T3,
    T4,
    T4a,
    T4b,
}

impl fmt::Display for TnmT {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TnmT::Unknown => "TX",
            TnmT::Tis => "TIS",
            TnmT::T0 => "T0",
            TnmT::T1 => "T1",
            TnmT::T1a => "T1A",
            TnmT::T1b => "T1B",
            TnmT::T2 => "T2",
            TnmT::T3 => "T3",
            TnmT::T4 => "T4",
            TnmT::T4a => "T4A",
            TnmT::T4b => "T4B",
        };
        write!(f, "{label}")
    }
}

/// Regional node (N) category. A/B suffixes are folded into the digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TnmN {
    Unknown,
    N0,
    N1,
    N2,
    N3,
}

impl TnmN {
    /// Any known node involvement (N1-N3).
    pub fn is_node_positive(self) -> bool {
        matches!(self, TnmN::N1 | TnmN::N2 | TnmN::N3)
    }
}

/// Distant metastasis (M) category, reduced to present/absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TnmM {
    Unknown,
    M0,
    M1,
}

/// One matched category token: the digits, the optional A/B suffix, and the
/// raw text as it appeared (upper-cased) for display.
struct CategoryToken {
    digits: String,
    suffix: Option<char>,
    raw: String,
}

/// Scans for the first `<letter><digits>[A|B]?` token, case-insensitively.
fn scan_category(text: &str, letter: char) -> Option<CategoryToken> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !(bytes[i] as char).eq_ignore_ascii_case(&letter) {
            i += 1;
            continue;
        }
        let digits_start = i + 1;
        let mut j = digits_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j == digits_start {
            i += 1;
            continue;
        }
        let mut suffix = None;
        let mut end = j;
        if j < bytes.len() {
            let c = (bytes[j] as char).to_ascii_uppercase();
            if c == 'A' || c == 'B' {
                suffix = Some(c);
                end = j + 1;
            }
        }
        return Some(CategoryToken {
            digits: text[digits_start..j].to_string(),
            suffix,
            raw: text[i..end].to_uppercase(),
        });
    }
    None
}

/// True when the string contains a standalone `TIS` token (any case).
///
/// A token boundary is required on both sides so that words like
/// "hepatitis" do not match; the clinical staging prefixes `c`, `p` and
/// `y` (as in `cTis`, `ypTis`) are allowed immediately before the token.
fn contains_tis(text: &str) -> bool {
    let upper = text.to_uppercase();
    let bytes = upper.as_bytes();
    let mut start = 0;
    while let Some(pos) = upper[start..].find("TIS") {
        let begin = start + pos;
        let end = begin + 3;
        let boundary_after = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        let boundary_before = begin == 0
            || !bytes[begin - 1].is_ascii_alphanumeric()
            || matches!(bytes[begin - 1], b'C' | b'P' | b'Y');
        if boundary_after && boundary_before {
            return true;
        }
        start = begin + 1;
    }
    false
}

fn parse_t(text: &str) -> TnmT {
    match scan_category(text, 'T') {
        Some(token) => match (token.digits.as_str(), token.suffix) {
            ("0", None) => TnmT::T0,
            ("1", None) => TnmT::T1,
            ("1", Some('A')) => TnmT::T1a,
            ("1", Some('B')) => TnmT::T1b,
            ("2", None) => TnmT::T2,
            ("3", None) => TnmT::T3,
            ("4", None) => TnmT::T4,
            ("4", Some('A')) => TnmT::T4a,
            ("4", Some('B')) => TnmT::T4b,
            _ => TnmT::Unknown,
        },
        None if contains_tis(text) => TnmT::Tis,
        None => TnmT::Unknown,
    }
}

fn parse_n(text: &str) -> TnmN {
    match scan_category(text, 'N') {
        Some(token) => match token.digits.as_str() {
            "0" => TnmN::N0,
            "1" => TnmN::N1,
            "2" => TnmN::N2,
            "3" => TnmN::N3,
            _ => TnmN::Unknown,
        },
        None => TnmN::Unknown,
    }
}

fn parse_m(text: &str) -> (TnmM, Option<String>) {
    match scan_category(text, 'M') {
        Some(token) => {
            let m = if token.digits.chars().all(|c| c == '0') {
                TnmM::M0
            } else if token.digits.len() == 1 {
                TnmM::M1
            } else {
                TnmM::Unknown
            };
            (m, Some(token.raw))
        }
        None => (TnmM::Unknown, None),
    }
}

/// Parses a free-form stage string into `(T, N, M)` categories plus the raw
/// M token (e.g. `"M1B"`) retained for rationale display.
///
/// Each category is independent: a match failure in one never affects the
/// others, and matching is order- and position-independent within the string.
pub fn parse_stage(text: &str) -> (TnmT, TnmN, TnmM, Option<String>) {
    let (m, m_raw) = parse_m(text);
    (parse_t(text), parse_n(text), m, m_raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_compact_tnm_string() {
        let (t, n, m, m_raw) = parse_stage("T3N1M0");
        assert_eq!(t, TnmT::T3);
        assert_eq!(n, TnmN::N1);
        assert_eq!(m, TnmM::M0);
        assert_eq!(m_raw.as_deref(), Some("M0"));
    }

    #[test]
    fn parses_formatted_and_lowercase_strings() {
        let (t, n, m, _) = parse_stage("Stage T4b, N2, M1");
        assert_eq!(t, TnmT::T4b);
        assert_eq!(n, TnmN::N2);
        assert_eq!(m, TnmM::M1);

        let (t, n, m, _) = parse_stage("ct1b n0 m0");
        assert_eq!(t, TnmT::T1b);
        assert_eq!(n, TnmN::N0);
        assert_eq!(m, TnmM::M0);
    }

    #[test]
    fn categories_default_to_unknown_independently() {
        let (t, n, m, m_raw) = parse_stage("T2");
        assert_eq!(t, TnmT::T2);
        assert_eq!(n, TnmN::Unknown);
        assert_eq!(m, TnmM::Unknown);
        assert_eq!(m_raw, None);

        let (t, n, m, _) = parse_stage("");
        assert_eq!(t, TnmT::Unknown);
        assert_eq!(n, TnmN::Unknown);
        assert_eq!(m, TnmM::Unknown);
    }

    #[test]
    fn recognizes_in_situ_disease() {
        let (t, _, _, _) = parse_stage("Tis N0 M0");
        assert_eq!(t, TnmT::Tis);
        // "tis" inside a longer word is not a stage token.
        let (t, _, _, _) = parse_stage("hepatitis history");
        assert_eq!(t, TnmT::Unknown);
    }

    #[test]
    fn suffix_folding_and_unmapped_digits() {
        let (_, n, _, _) = parse_stage("T2N1AM0");
        assert_eq!(n, TnmN::N1);

        let (t, _, _, _) = parse_stage("T7N0M0");
        assert_eq!(t, TnmT::Unknown);

        let (_, _, m, m_raw) = parse_stage("T3N1M1B");
        assert_eq!(m, TnmM::M1);
        assert_eq!(m_raw.as_deref(), Some("M1B"));
    }

    #[test]
    fn first_match_wins_within_a_category() {
        let (t, _, _, _) = parse_stage("T2 (previously T3)");
        assert_eq!(t, TnmT::T2);
    }
}
