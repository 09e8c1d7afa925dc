//! One evaluator per rule operator. Each takes an already-resolved, non-null value.

use super::field::FieldValue;

const EPSILON: f64 = 1e-9;

/// Comparison target after compilation; text is stored trimmed and lowercased.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Expected {
    Number(f64),
    Text(String),
    Flag(bool),
}

/// Operator with its validated operand.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Check {
    Equals(Expected),
    GreaterThan(f64),
    LessThan(f64),
    GreaterEqual(f64),
    LessEqual(f64),
    Between(f64, f64),
    In(Vec<Expected>),
    NotIn(Vec<Expected>),
    Contains(String),
}

impl Check {
    pub(crate) fn evaluate(&self, actual: FieldValue<'_>) -> bool {
        match self {
            Check::Equals(expected) => equals(actual, expected),
            Check::GreaterThan(bound) => number(actual).is_some_and(|n| greater_than(n, *bound)),
            Check::LessThan(bound) => number(actual).is_some_and(|n| less_than(n, *bound)),
            Check::GreaterEqual(bound) => {
                number(actual).is_some_and(|n| greater_equal(n, *bound))
            }
            Check::LessEqual(bound) => number(actual).is_some_and(|n| less_equal(n, *bound)),
            Check::Between(low, high) => number(actual).is_some_and(|n| between(n, *low, *high)),
            Check::In(options) => is_in(actual, options),
            Check::NotIn(options) => !is_in(actual, options),
            Check::Contains(needle) => contains(actual, needle),
        }
    }
}

pub(crate) fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn number(actual: FieldValue<'_>) -> Option<f64> {
    match actual {
        FieldValue::Number(n) => Some(n),
        _ => None,
    }
}

pub(crate) fn equals(actual: FieldValue<'_>, expected: &Expected) -> bool {
    match (actual, expected) {
        (FieldValue::Number(n), Expected::Number(target)) => (n - target).abs() < EPSILON,
        (FieldValue::Text(text), Expected::Text(target)) => normalize(text) == *target,
        (FieldValue::Flag(flag), Expected::Flag(target)) => flag == *target,
        _ => false,
    }
}

pub(crate) fn greater_than(actual: f64, bound: f64) -> bool {
    actual > bound
}

pub(crate) fn less_than(actual: f64, bound: f64) -> bool {
    actual < bound
}

pub(crate) fn greater_equal(actual: f64, bound: f64) -> bool {
    actual >= bound
}

pub(crate) fn less_equal(actual: f64, bound: f64) -> bool {
    actual <= bound
}

/// Inclusive on both ends.
pub(crate) fn between(actual: f64, low: f64, high: f64) -> bool {
    actual >= low && actual <= high
}

/// Scalar membership, or any overlap when the property value is a list.
pub(crate) fn is_in(actual: FieldValue<'_>, options: &[Expected]) -> bool {
    match actual {
        FieldValue::List(items) => items
            .iter()
            .any(|item| options.iter().any(|option| equals(FieldValue::Text(item), option))),
        scalar => options.iter().any(|option| equals(scalar, option)),
    }
}

/// Substring for text, membership for lists.
pub(crate) fn contains(actual: FieldValue<'_>, needle: &str) -> bool {
    match actual {
        FieldValue::Text(text) => normalize(text).contains(needle),
        FieldValue::List(items) => items.iter().any(|item| normalize(item) == needle),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Expected {
        Expected::Text(normalize(value))
    }

    #[test]
    fn equals_matches_by_type() {
        assert!(equals(FieldValue::Number(3.0), &Expected::Number(3.0)));
        assert!(equals(FieldValue::Text(" Phoenix "), &text("phoenix")));
        assert!(equals(FieldValue::Flag(true), &Expected::Flag(true)));
        assert!(!equals(FieldValue::Number(3.0), &text("3")));
    }

    #[test]
    fn ordering_operators_respect_strictness() {
        assert!(greater_than(4.0, 3.0));
        assert!(!greater_than(3.0, 3.0));
        assert!(less_than(2.0, 3.0));
        assert!(!less_than(3.0, 3.0));
        assert!(greater_equal(3.0, 3.0));
        assert!(less_equal(3.0, 3.0));
    }

    #[test]
    fn between_is_inclusive() {
        assert!(between(100.0, 100.0, 200.0));
        assert!(between(200.0, 100.0, 200.0));
        assert!(!between(200.01, 100.0, 200.0));
    }

    #[test]
    fn in_and_not_in_cover_scalars_and_lists() {
        let options = vec![text("pool"), text("garage")];
        let features = vec!["Garage".to_string(), "Basement".to_string()];
        let none = vec!["Basement".to_string()];

        assert!(is_in(FieldValue::List(&features), &options));
        assert!(!is_in(FieldValue::List(&none), &options));
        assert!(Check::NotIn(options.clone()).evaluate(FieldValue::List(&none)));
        assert!(Check::In(vec![text("NV"), text("AZ")]).evaluate(FieldValue::Text("nv")));
        assert!(!Check::In(Vec::new()).evaluate(FieldValue::Text("nv")));
        assert!(Check::NotIn(Vec::new()).evaluate(FieldValue::Text("nv")));
    }

    #[test]
    fn contains_handles_text_and_lists() {
        let features = vec!["Swimming Pool".to_string()];
        assert!(contains(FieldValue::Text("Single Family Residence"), "family"));
        assert!(contains(FieldValue::List(&features), "swimming pool"));
        assert!(!contains(FieldValue::List(&features), "pool"));
        assert!(!contains(FieldValue::Number(2.0), "2"));
    }

    #[test]
    fn numeric_checks_reject_non_numeric_values() {
        assert!(!Check::GreaterEqual(3.0).evaluate(FieldValue::Text("4")));
        assert!(Check::Between(1.0, 5.0).evaluate(FieldValue::Number(5.0)));
    }
}
