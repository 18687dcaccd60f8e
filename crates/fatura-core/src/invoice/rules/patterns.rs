//! Common regex patterns for Portuguese invoice text.
//!
//! All patterns expect lowercased input.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date grammars, in the order they are tried
    pub static ref DATE_PT_MONTH: Regex = Regex::new(
        r"(\d{1,2})\s*[-–]\s*(jan|fev|mar|abr|mai|jun|jul|ago|set|out|nov|dez)\s*[-–]?\s*(\d{2,4})"
    ).unwrap();

    pub static ref DATE_ISO_DASH: Regex = Regex::new(
        r"(\d{4})-(\d{1,2})-(\d{1,2})"
    ).unwrap();

    pub static ref DATE_ISO_SLASH: Regex = Regex::new(
        r"(\d{4})/(\d{1,2})/(\d{1,2})"
    ).unwrap();

    pub static ref DATE_SLASH: Regex = Regex::new(
        r"(\d{1,2})/(\d{1,2})/(\d{4})"
    ).unwrap();

    pub static ref DATE_DASH: Regex = Regex::new(
        r"(\d{1,2})-(\d{1,2})-(\d{4})"
    ).unwrap();

    pub static ref DATE_DOT: Regex = Regex::new(
        r"(\d{1,2})\.(\d{1,2})\.(\d{4})"
    ).unwrap();

    // Issue date labels, highest priority first
    pub static ref ISSUE_DATE_LABELS: [Regex; 4] = [
        Regex::new(r"data\s*(?:de\s*)?emiss[ãa]o\s*[:\s]*").unwrap(),
        Regex::new(r"data\s*(?:do\s*)?documento\s*[:\s]*").unwrap(),
        Regex::new(r"data\s*(?:da\s*)?fact?ura\s*[:\s]*").unwrap(),
        Regex::new(r"emitido\s*(?:em|a)?\s*[:\s]*").unwrap(),
    ];

    // Due/payment date markers
    pub static ref DUE_DATE_MARKER: Regex = Regex::new(
        r"vencimento|pagamento|prazo"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pt_month_separators() {
        assert!(DATE_PT_MONTH.is_match("30 - set - 2025"));
        assert!(DATE_PT_MONTH.is_match("30-set-25"));
        assert!(DATE_PT_MONTH.is_match("30 – set 2025"));
        assert!(!DATE_PT_MONTH.is_match("30 set 2025"));
    }

    #[test]
    fn test_issue_labels() {
        assert!(ISSUE_DATE_LABELS[0].is_match("data de emissão: "));
        assert!(ISSUE_DATE_LABELS[0].is_match("data emissao"));
        assert!(ISSUE_DATE_LABELS[2].is_match("data da factura"));
        assert!(ISSUE_DATE_LABELS[3].is_match("emitido em"));
    }
}
