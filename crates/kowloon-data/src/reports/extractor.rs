//! Metric extraction from report text.
//!
//! Each extractor understands one document layout and either finds the
//! metric or reports it absent. Turning "absent" into a zero is the
//! resolver's job, not the extractor's.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use regex::Regex;
use std::fmt::Debug;
use std::sync::LazyLock;

/// Label searched for by the default extractors.
pub const REVENUE_LABEL: &str = "Revenue";

static REVENUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&labelled_pattern(REVENUE_LABEL)).expect("revenue pattern is a valid regex")
});

fn labelled_pattern(label: &str) -> String {
    format!(r"{}[:\s]+([\d,]+)", regex::escape(label))
}

/// Extracts a single numeric metric from document text.
pub trait MetricExtractor: Debug + Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Find the metric in `text`, or `None` if this layout has no match.
    fn extract(&self, text: &str) -> Option<f64>;
}

/// Parse a number written with `,` group separators, e.g. `"1,234,567"`.
///
/// Whitespace (including non-breaking spaces) is ignored as well.
///
/// # Examples
///
/// ```
/// use kowloon_data::reports::parse_grouped_number;
///
/// assert_eq!(parse_grouped_number("1,234,567"), Some(1_234_567.0));
/// assert_eq!(parse_grouped_number(","), None);
/// ```
pub fn parse_grouped_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Plain-text layout: `<label>` followed by `:` or whitespace and a number.
///
/// Only the first occurrence of the label counts. If that occurrence does
/// not parse, later ones are not tried.
#[derive(Debug, Clone)]
pub struct LabelledValueExtractor {
    label: String,
    pattern: Regex,
}

impl LabelledValueExtractor {
    /// Extractor for an arbitrary label.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting pattern exceeds the regex size limit.
    pub fn new(label: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.to_string(),
            pattern: Regex::new(&labelled_pattern(label))?,
        })
    }

    /// Extractor for the `Revenue` label.
    pub fn revenue() -> Self {
        Self {
            label: REVENUE_LABEL.to_string(),
            pattern: REVENUE_PATTERN.clone(),
        }
    }

    /// Label this extractor looks for.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for LabelledValueExtractor {
    fn default() -> Self {
        Self::revenue()
    }
}

impl MetricExtractor for LabelledValueExtractor {
    fn name(&self) -> &str {
        "labelled_text"
    }

    fn extract(&self, text: &str) -> Option<f64> {
        let caps = self.pattern.captures(text)?;
        parse_grouped_number(caps.get(1)?.as_str())
    }
}

/// Taxonomy concepts that report top-line revenue under another name.
const REVENUE_CONCEPTS: &[&str] = &[
    "RevenueFromContractsWithCustomers",
    "RevenueFromContractWithCustomerExcludingAssessedTax",
    "RevenueFromContractWithCustomerIncludingAssessedTax",
];

/// Inline XBRL layout: the first `ix:nonFraction` fact for one of the
/// accepted concepts.
///
/// The concept is compared on its local name, with the taxonomy prefix
/// (`ifrs-full:`, `us-gaap:`) removed. It must equal the label or its
/// plural exactly, so `DeferredRevenue` and `CostOfRevenue` never match
/// `Revenue`. The revenue extractor also accepts the contract-revenue
/// concepts of IFRS 15 and US GAAP.
///
/// `scale` multiplies the value by a power of ten and `sign="-"` negates
/// it. A `format` mentioning `comma-decimal` is read as `1.234,5`.
#[derive(Debug, Clone)]
pub struct InlineXbrlExtractor {
    concepts: Vec<String>,
}

impl InlineXbrlExtractor {
    /// Extractor for facts named `label` or `label` + `s`.
    pub fn new(label: &str) -> Self {
        let mut concepts = vec![label.to_string(), format!("{label}s")];
        if label == REVENUE_LABEL {
            concepts.extend(REVENUE_CONCEPTS.iter().map(|c| (*c).to_string()));
        }
        Self { concepts }
    }

    /// Concept local names this extractor accepts.
    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }

    fn accepts(&self, name: &str) -> bool {
        let local = name.rsplit(':').next().unwrap_or(name).trim();
        self.concepts.iter().any(|c| c == local)
    }
}

impl Default for InlineXbrlExtractor {
    fn default() -> Self {
        Self::new(REVENUE_LABEL)
    }
}

/// Attributes of a matching fact that affect its value.
#[derive(Debug, Default)]
struct FactFormat {
    scale: i32,
    negative: bool,
    comma_decimal: bool,
}

impl FactFormat {
    fn apply(&self, text: &str) -> Option<f64> {
        let text = text.trim().trim_start_matches('(').trim_end_matches(')');
        let value = if self.comma_decimal {
            let swapped: String = text
                .chars()
                .filter(|c| *c != '.' && !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            swapped.parse::<f64>().ok()?
        } else {
            parse_grouped_number(text)?
        };

        let scaled = value * 10f64.powi(self.scale);
        Some(if self.negative { -scaled } else { scaled })
    }
}

impl InlineXbrlExtractor {
    fn matching_fact(&self, start: &BytesStart<'_>) -> Option<FactFormat> {
        if start.local_name().as_ref() != b"nonFraction" {
            return None;
        }

        let mut matched = false;
        let mut format = FactFormat::default();
        for attr in start.attributes().flatten() {
            let value = String::from_utf8_lossy(&attr.value);
            match attr.key.local_name().as_ref() {
                b"name" => matched = self.accepts(&value),
                b"scale" => format.scale = value.trim().parse().unwrap_or(0),
                b"sign" => format.negative = value.trim() == "-",
                b"format" => format.comma_decimal = value.contains("comma-decimal"),
                _ => {}
            }
        }

        matched.then_some(format)
    }
}

impl MetricExtractor for InlineXbrlExtractor {
    fn name(&self) -> &str {
        "inline_xbrl"
    }

    fn extract(&self, text: &str) -> Option<f64> {
        if !text.contains("nonFraction") {
            return None;
        }

        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;

        let mut buf = Vec::new();
        let mut current: Option<(FactFormat, String)> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Eof) | Err(_) => return None,
                Ok(Event::Start(start)) => {
                    if current.is_none() {
                        current = self.matching_fact(&start).map(|f| (f, String::new()));
                    }
                }
                Ok(Event::Text(t)) => {
                    if let Some((_, value)) = current.as_mut() {
                        value.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                Ok(Event::End(end)) => {
                    if end.local_name().as_ref() == b"nonFraction" {
                        if let Some((format, value)) = current.take() {
                            return format.apply(&value);
                        }
                    }
                }
                Ok(_) => {}
            }
            buf.clear();
        }
    }
}

/// Tries each extractor in order and returns the first value found.
#[derive(Debug, Default)]
pub struct ExtractorChain {
    extractors: Vec<Box<dyn MetricExtractor>>,
}

impl ExtractorChain {
    /// Empty chain; extracts nothing until extractors are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// The default revenue chain: inline XBRL facts, then labelled text.
    pub fn revenue() -> Self {
        Self::new()
            .with(InlineXbrlExtractor::default())
            .with(LabelledValueExtractor::revenue())
    }

    /// Revenue-style chain for a custom label.
    ///
    /// # Errors
    ///
    /// Returns an error if the label cannot be compiled into a pattern.
    pub fn for_label(label: &str) -> Result<Self, regex::Error> {
        Ok(Self::new()
            .with(InlineXbrlExtractor::new(label))
            .with(LabelledValueExtractor::new(label)?))
    }

    /// Append an extractor.
    pub fn with(mut self, extractor: impl MetricExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Number of extractors in the chain.
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether the chain has no extractors.
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl MetricExtractor for ExtractorChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn extract(&self, text: &str) -> Option<f64> {
        self.extractors.iter().find_map(|e| e.extract(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Revenue: 1,234,567", Some(1_234_567.0))]
    #[case("Total Revenue 42", Some(42.0))]
    #[case("Revenue:\n  9,870 HKD", Some(9_870.0))]
    #[case("Revenue:: 5", Some(5.0))]
    #[case("revenue: 100", None)]
    #[case("Turnover: 100", None)]
    #[case("", None)]
    fn test_labelled_revenue(#[case] text: &str, #[case] expected: Option<f64>) {
        assert_eq!(LabelledValueExtractor::revenue().extract(text), expected);
    }

    #[test]
    fn test_labelled_takes_first_match() {
        let text = "Revenue: 100\nRevenue: 200";
        assert_eq!(LabelledValueExtractor::revenue().extract(text), Some(100.0));
    }

    #[test]
    fn test_labelled_first_match_unparseable_is_absent() {
        let text = "Revenue: , then Revenue: 200";
        assert_eq!(LabelledValueExtractor::revenue().extract(text), None);
    }

    #[test]
    fn test_custom_label_is_escaped() {
        let extractor = LabelledValueExtractor::new("Net (loss)").unwrap();
        assert_eq!(extractor.label(), "Net (loss)");
        assert_eq!(extractor.extract("Net (loss): 3,000"), Some(3_000.0));
    }

    #[test]
    fn test_inline_xbrl_fact() {
        let html = r#"<html><body>
            <p>Operating costs <ix:nonFraction name="ifrs-full:OperatingExpense" scale="0">77</ix:nonFraction></p>
            <p>Revenue <ix:nonFraction name="ifrs-full:Revenue" scale="6" decimals="-6">1,250</ix:nonFraction></p>
            </body></html>"#;
        let value = InlineXbrlExtractor::default().extract(html).unwrap();
        assert_relative_eq!(value, 1_250_000_000.0);
    }

    #[test]
    fn test_inline_xbrl_comma_decimal_and_sign() {
        let html = r#"<div><ix:nonFraction name="ifrs-full:Revenue" format="ixt:num-comma-decimal" sign="-">1.234,5</ix:nonFraction></div>"#;
        let value = InlineXbrlExtractor::default().extract(html).unwrap();
        assert_relative_eq!(value, -1234.5);
    }

    #[test]
    fn test_inline_xbrl_nested_markup() {
        let html = r#"<td><ix:nonFraction name="us-gaap:Revenues"><span>3,000</span></ix:nonFraction></td>"#;
        assert_eq!(InlineXbrlExtractor::default().extract(html), Some(3_000.0));
    }

    #[test]
    fn test_inline_xbrl_skips_revenue_lookalikes() {
        let html = r#"<table>
            <tr><td><ix:nonFraction name="ifrs-full:DeferredRevenue">5</ix:nonFraction></td></tr>
            <tr><td><ix:nonFraction name="us-gaap:CostOfRevenue">7</ix:nonFraction></td></tr>
            <tr><td><ix:nonFraction name="us-gaap:ContractWithCustomerLiabilityRevenueRecognized">9</ix:nonFraction></td></tr>
            <tr><td><ix:nonFraction name="ifrs-full:Revenue">1,000</ix:nonFraction></td></tr>
            </table>"#;
        assert_eq!(InlineXbrlExtractor::default().extract(html), Some(1_000.0));
        assert_eq!(ExtractorChain::revenue().extract(html), Some(1_000.0));
    }

    #[rstest]
    #[case("ifrs-full:Revenue", true)]
    #[case("us-gaap:Revenues", true)]
    #[case("ifrs-full:RevenueFromContractsWithCustomers", true)]
    #[case("us-gaap:RevenueFromContractWithCustomerExcludingAssessedTax", true)]
    #[case("Revenue", true)]
    #[case("ifrs-full:DeferredRevenue", false)]
    #[case("us-gaap:CostOfRevenue", false)]
    #[case("ifrs-full:RevenueGrowth", false)]
    fn test_inline_xbrl_concept_names(#[case] name: &str, #[case] accepted: bool) {
        assert_eq!(InlineXbrlExtractor::default().accepts(name), accepted);
    }

    #[test]
    fn test_inline_xbrl_custom_label_has_no_revenue_aliases() {
        let extractor = InlineXbrlExtractor::new("Turnover");
        assert_eq!(extractor.concepts(), ["Turnover", "Turnovers"]);
        assert!(!extractor.accepts("ifrs-full:RevenueFromContractsWithCustomers"));
    }

    #[test]
    fn test_inline_xbrl_ignores_plain_text() {
        assert_eq!(InlineXbrlExtractor::default().extract("Revenue: 10"), None);
    }

    #[test]
    fn test_chain_falls_through() {
        let chain = ExtractorChain::revenue();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.extract("Revenue: 1,234,567"), Some(1_234_567.0));
        assert_eq!(chain.extract("nothing here"), None);
    }

    #[test]
    fn test_empty_chain_extracts_nothing() {
        let chain = ExtractorChain::new();
        assert!(chain.is_empty());
        assert_eq!(chain.extract("Revenue: 1"), None);
    }

    #[rstest]
    #[case("1,234,567", Some(1_234_567.0))]
    #[case("12", Some(12.0))]
    #[case("1\u{a0}000", Some(1_000.0))]
    #[case(",,", None)]
    #[case("", None)]
    fn test_parse_grouped_number(#[case] raw: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_grouped_number(raw), expected);
    }
}
