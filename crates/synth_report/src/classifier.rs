//! Free-text label classification.
//!
//! Room and space labels are typed by hand ("Office  101", "OFFICE-kitchen",
//! "corridor 2nd floor") and map onto a small set of regulatory categories.
//! Rules are tested in declared priority order; the first rule with any
//! matching substring wins. A label that matches nothing is reported as
//! [`Classification::Unclassified`]; choosing a fallback is the caller's job.

use serde::{Deserialize, Serialize};

/// One rule group: any of `patterns` maps a label to `result`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRule<C> {
    /// Substrings to look for (matched after normalisation)
    pub patterns: Vec<String>,
    /// Category assigned when any pattern matches
    pub result: C,
}

impl<C> ClassificationRule<C> {
    /// Create a rule group.
    pub fn new<I, S>(patterns: I, result: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            result,
        }
    }
}

/// Outcome of classifying one label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Classification<C> {
    /// First matching rule's category
    Classified(C),
    /// No rule matched
    Unclassified,
}

impl<C> Classification<C> {
    /// The category, if any.
    pub fn category(&self) -> Option<&C> {
        match self {
            Self::Classified(c) => Some(c),
            Self::Unclassified => None,
        }
    }

    /// Returns true if no rule matched.
    pub fn is_unclassified(&self) -> bool {
        matches!(self, Self::Unclassified)
    }
}

/// Lowercase and collapse runs of whitespace into single spaces.
///
/// # Example
///
/// ```
/// use synth_report::classifier::normalize_label;
///
/// assert_eq!(normalize_label("  Office\t 101 "), "office 101");
/// ```
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ordered rule set applied to labels.
///
/// # Example
///
/// ```
/// use synth_report::classifier::{Classification, ClassificationRule, Classifier};
///
/// let classifier = Classifier::new(vec![
///     ClassificationRule::new(["kitchen"], "catering"),
///     ClassificationRule::new(["office", "cabinet"], "office"),
/// ]);
///
/// assert_eq!(classifier.classify("Office KITCHEN"), Classification::Classified("catering"));
/// assert_eq!(classifier.classify("Cabinet 12"), Classification::Classified("office"));
/// assert!(classifier.classify("boiler room").is_unclassified());
/// ```
#[derive(Debug, Clone)]
pub struct Classifier<C> {
    rules: Vec<ClassificationRule<C>>,
}

impl<C: Clone> Classifier<C> {
    /// Build a classifier; patterns are normalised and empty ones dropped.
    pub fn new(rules: Vec<ClassificationRule<C>>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| ClassificationRule {
                patterns: rule
                    .patterns
                    .iter()
                    .map(|p| normalize_label(p))
                    .filter(|p| !p.is_empty())
                    .collect(),
                result: rule.result,
            })
            .collect();
        Self { rules }
    }

    /// Number of rule groups.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Classify a label.
    pub fn classify(&self, label: &str) -> Classification<C> {
        let normalized = normalize_label(label);
        self.rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| normalized.contains(p.as_str())))
            .map_or(Classification::Unclassified, |rule| {
                Classification::Classified(rule.result.clone())
            })
    }
}
