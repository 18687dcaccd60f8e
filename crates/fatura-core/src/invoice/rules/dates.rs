//! Issue date extraction for Portuguese invoices.
//!
//! Dates are returned as `YYYYMMDD` strings. OCR output rarely carries a
//! clean label/value layout, so extraction runs three passes: dates right
//! after an issue-date label, then the earliest date not preceded by a due
//! date marker, then the first date of any grammar.

use regex::{Captures, Regex};

use super::patterns::{
    DATE_DASH, DATE_DOT, DATE_ISO_DASH, DATE_ISO_SLASH, DATE_PT_MONTH, DATE_SLASH,
    DUE_DATE_MARKER, ISSUE_DATE_LABELS,
};
use super::{ExtractionMatch, FieldExtractor};

/// Characters scanned after an issue date label.
const LABEL_WINDOW: usize = 30;

/// Characters before a date checked for due date markers.
const DUE_CONTEXT_WINDOW: usize = 50;

const MIN_YEAR: u32 = 2020;
const MAX_YEAR: u32 = 2030;

/// Surface forms a date takes on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGrammar {
    /// `30 - set - 2025`, `30-set-25`
    PortugueseMonth,
    /// `2025-02-10`
    IsoDash,
    /// `2025/02/10`
    IsoSlash,
    /// `10/02/2025` or `2/16/2025`
    Slash,
    /// `10-02-2025`
    Dash,
    /// `10.02.2025`
    Dot,
}

impl DateGrammar {
    /// Every grammar in the order it is tried.
    pub const ALL: [DateGrammar; 6] = [
        DateGrammar::PortugueseMonth,
        DateGrammar::IsoDash,
        DateGrammar::IsoSlash,
        DateGrammar::Slash,
        DateGrammar::Dash,
        DateGrammar::Dot,
    ];

    fn regex(&self) -> &'static Regex {
        match self {
            DateGrammar::PortugueseMonth => &*DATE_PT_MONTH,
            DateGrammar::IsoDash => &*DATE_ISO_DASH,
            DateGrammar::IsoSlash => &*DATE_ISO_SLASH,
            DateGrammar::Slash => &*DATE_SLASH,
            DateGrammar::Dash => &*DATE_DASH,
            DateGrammar::Dot => &*DATE_DOT,
        }
    }

    /// Turn a match into `YYYYMMDD`, or reject it.
    pub fn normalize(&self, caps: &Captures<'_>) -> Option<String> {
        let (year, month, day) = match self {
            DateGrammar::PortugueseMonth => {
                let day = number(caps, 1)?;
                let month = portuguese_month_to_number(&caps[2])?;
                let year = number(caps, 3)?;
                let year = if year < 100 { 2000 + year } else { year };
                (year, month, day)
            }
            DateGrammar::IsoDash | DateGrammar::IsoSlash => {
                (number(caps, 1)?, number(caps, 2)?, number(caps, 3)?)
            }
            DateGrammar::Slash => {
                let first = number(caps, 1)?;
                let second = number(caps, 2)?;
                let year = number(caps, 3)?;
                let (day, month) = if second > 12 && first <= 12 {
                    (second, first)
                } else {
                    // Day-first unless only the month-first reading is possible
                    (first, second)
                };
                (year, month, day)
            }
            DateGrammar::Dash | DateGrammar::Dot => {
                (number(caps, 3)?, number(caps, 2)?, number(caps, 1)?)
            }
        };

        is_plausible(year, month, day).then(|| format!("{year:04}{month:02}{day:02}"))
    }
}

/// Issue date extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// First normalizable date within `LABEL_WINDOW` characters of an issue label.
    fn labelled(&self, text: &str) -> Option<ExtractionMatch<String>> {
        for label in ISSUE_DATE_LABELS.iter() {
            let Some(found) = label.find(text) else {
                continue;
            };
            let start = found.end();
            let window = &text[start..char_window_end(text, start, LABEL_WINDOW)];

            for grammar in DateGrammar::ALL {
                if let Some(caps) = grammar.regex().captures(window) {
                    if let Some(date) = grammar.normalize(&caps) {
                        let whole = &caps[0];
                        let offset = start + caps.get(0).map_or(0, |m| m.start());
                        return Some(
                            ExtractionMatch::new(date, 0.95, whole)
                                .with_position(offset, offset + whole.len()),
                        );
                    }
                }
            }
        }
        None
    }

    /// Earliest valid date that is not preceded by a due date marker.
    fn earliest_not_due(&self, text: &str) -> Option<ExtractionMatch<String>> {
        self.extract_all(text)
            .into_iter()
            .filter(|candidate| {
                let start = candidate.position.map_or(0, |(s, _)| s);
                let context = &text[char_window_start(text, start, DUE_CONTEXT_WINDOW)..start];
                !DUE_DATE_MARKER.is_match(context)
            })
            .min_by(|a, b| a.value.cmp(&b.value))
            .map(|mut candidate| {
                candidate.confidence = 0.8;
                candidate
            })
    }

    /// First match of the first grammar that matches at all.
    fn fallback(&self, text: &str) -> Option<ExtractionMatch<String>> {
        let (grammar, caps) = DateGrammar::ALL
            .iter()
            .find_map(|grammar| grammar.regex().captures(text).map(|caps| (grammar, caps)))?;
        let date = grammar.normalize(&caps)?;
        Some(ExtractionMatch::new(date, 0.5, &caps[0]))
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let text = text.to_lowercase();
        self.labelled(&text)
            .or_else(|| self.earliest_not_due(&text))
            .or_else(|| self.fallback(&text))
    }

    /// Every valid date, grammar by grammar, without label or due filtering.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for grammar in DateGrammar::ALL {
            for caps in grammar.regex().captures_iter(text) {
                if let (Some(date), Some(whole)) = (grammar.normalize(&caps), caps.get(0)) {
                    results.push(
                        ExtractionMatch::new(date, 0.9, whole.as_str())
                            .with_position(whole.start(), whole.end()),
                    );
                }
            }
        }

        results
    }
}

/// Extract the issue date from OCR text as `YYYYMMDD`.
pub fn extract_date(text: &str) -> Option<String> {
    DateExtractor::new().extract(text).map(|found| found.value)
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

fn portuguese_month_to_number(month: &str) -> Option<u32> {
    let number = match month {
        "jan" => 1,
        "fev" => 2,
        "mar" => 3,
        "abr" => 4,
        "mai" => 5,
        "jun" => 6,
        "jul" => 7,
        "ago" => 8,
        "set" => 9,
        "out" => 10,
        "nov" => 11,
        "dez" => 12,
        _ => return None,
    };
    Some(number)
}

/// Range check applied to every candidate. February always allows the 29th.
fn is_plausible(year: u32, month: u32, day: u32) -> bool {
    const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    (MIN_YEAR..=MAX_YEAR).contains(&year)
        && (1..=12).contains(&month)
        && day >= 1
        && day <= DAYS_IN_MONTH[(month - 1) as usize]
}

/// Byte offset `chars` characters after `start`, clamped to the end.
fn char_window_end(text: &str, start: usize, chars: usize) -> usize {
    text[start..]
        .char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| start + i)
}

/// Byte offset `chars` characters before `end`, clamped to the start.
fn char_window_start(text: &str, end: usize, chars: usize) -> usize {
    if chars == 0 {
        return end;
    }
    text[..end]
        .char_indices()
        .rev()
        .nth(chars - 1)
        .map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(text: &str) -> Option<String> {
        extract_date(text)
    }

    #[test]
    fn test_every_grammar() {
        assert_eq!(date("30 - set - 2025"), Some("20250930".to_string()));
        assert_eq!(date("15-jan-24"), Some("20240115".to_string()));
        assert_eq!(date("2025-02-10"), Some("20250210".to_string()));
        assert_eq!(date("2025/2/10"), Some("20250210".to_string()));
        assert_eq!(date("10/02/2025"), Some("20250210".to_string()));
        assert_eq!(date("10-02-2025"), Some("20250210".to_string()));
        assert_eq!(date("10.02.2025"), Some("20250210".to_string()));
    }

    #[test]
    fn test_ambiguous_slash_dates() {
        // Second value cannot be a month
        assert_eq!(date("2/16/2025"), Some("20250216".to_string()));
        // First value cannot be a month
        assert_eq!(date("16/2/2025"), Some("20250216".to_string()));
        // Both readings possible: day first
        assert_eq!(date("03/04/2025"), Some("20250403".to_string()));
    }

    #[test]
    fn test_impossible_dates_rejected() {
        assert_eq!(date("31/04/2025"), None);
        assert_eq!(date("2025-13-01"), None);
        assert_eq!(date("30.02.2025"), None);
        assert_eq!(date("00.02.2025"), None);
    }

    #[test]
    fn test_february_29_always_accepted() {
        assert_eq!(date("29.02.2025"), Some("20250229".to_string()));
    }

    #[test]
    fn test_year_out_of_range() {
        assert_eq!(date("10/02/2019"), None);
        assert_eq!(date("10/02/2031"), None);
        assert_eq!(date("1 - jan - 19"), None);
    }

    #[test]
    fn test_unknown_month_abbreviation() {
        assert_eq!(date("10 - xyz - 2025"), None);
    }

    #[test]
    fn test_priority_label_wins_over_earlier_date() {
        let text = "encomenda 01/01/2024\nData de Emissão: 15/03/2025";
        assert_eq!(date(text), Some("20250315".to_string()));
    }

    #[test]
    fn test_label_window_is_limited() {
        let text = format!("data de emissão: {} 15/03/2025", "x".repeat(40));
        // Falls through to the earliest-date pass
        assert_eq!(date(&format!("{text} 01/03/2025")), Some("20250301".to_string()));
    }

    #[test]
    fn test_label_window_counts_characters() {
        // 15 two-byte characters keep the date inside a 30 character window
        let text = format!("data de emissão: {} 15/03/2025 01/01/2025", "é".repeat(15));
        assert_eq!(date(&text), Some("20250315".to_string()));
    }

    #[test]
    fn test_due_date_excluded_from_earliest_pass() {
        let text = format!(
            "vencimento: 01/02/2025\n{}\nfatura 10/02/2025",
            "linha ".repeat(10)
        );
        assert_eq!(date(&text), Some("20250210".to_string()));
    }

    #[test]
    fn test_earliest_date_wins() {
        let text = "entregue 20/03/2025 encomenda 2025-03-01";
        assert_eq!(date(text), Some("20250301".to_string()));
    }

    #[test]
    fn test_fallback_uses_due_dates() {
        let text = "prazo de pagamento 28/02/2025";
        assert_eq!(date(text), Some("20250228".to_string()));
    }

    #[test]
    fn test_fallback_first_grammar_decides() {
        // The pt-month candidate is out of range; the slash date is a due date.
        // The fallback stops at the first grammar that matches.
        let text = "1 - jan - 2019 vencimento 10/02/2025";
        assert_eq!(date(text), None);
    }

    #[test]
    fn test_no_date() {
        assert_eq!(date("nenhuma data aqui"), None);
        assert_eq!(date(""), None);
    }

    #[test]
    fn test_case_insensitive_labels() {
        let text = "DATA DO DOCUMENTO 2025-05-06 outra 2024-01-01";
        assert_eq!(date(text), Some("20250506".to_string()));
    }

    #[test]
    fn test_extract_all_positions() {
        let extractor = DateExtractor::new();
        let all = extractor.extract_all("a 10.02.2025 b");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].position, Some((2, 12)));
        assert_eq!(all[0].source, "10.02.2025");
    }
}
