use super::normalizer::keys_equal;
use super::range::InclusiveRange;

/// Reads a categorical attribute (size, quality, colour) off a rule.
pub type KeyExtractor<R> = fn(&R) -> &str;

/// Reads the numeric band a rule applies to.
pub type RangeExtractor<R> = fn(&R) -> &InclusiveRange;

/// Outcome of a table lookup.
#[derive(Debug, PartialEq)]
pub enum Lookup<'r, R> {
    Matched(&'r R),
    /// At least one rule carries the requested attributes, none covers the value.
    OutOfRange,
    /// No rule carries the requested attributes.
    NotAvailable,
}

impl<'r, R> Lookup<'r, R> {
    pub fn matched(&self) -> Option<&'r R> {
        match self {
            Lookup::Matched(rule) => Some(*rule),
            _ => None,
        }
    }
}

/// Range-rule matcher shared by every product type.
///
/// Categorical keys are compared after trimming, whitespace collapsing and
/// lowercasing. The first rule in table order wins when ranges overlap.
pub struct RangeMatcher<'s, R> {
    keys: Vec<(KeyExtractor<R>, &'s str)>,
    range: RangeExtractor<R>,
}

impl<'s, R> RangeMatcher<'s, R> {
    pub fn new(range: RangeExtractor<R>) -> Self {
        Self {
            keys: Vec::new(),
            range,
        }
    }

    pub fn key(mut self, extractor: KeyExtractor<R>, wanted: &'s str) -> Self {
        self.keys.push((extractor, wanted));
        self
    }

    pub fn accepts_keys(&self, rule: &R) -> bool {
        self.keys
            .iter()
            .all(|(extract, wanted)| keys_equal(extract(rule), wanted))
    }

    pub fn find<'r>(&self, rules: &'r [R], value: u32) -> Lookup<'r, R> {
        let mut categorical_hit = false;

        for rule in rules {
            if !self.accepts_keys(rule) {
                continue;
            }
            categorical_hit = true;
            if (self.range)(rule).contains(value) {
                return Lookup::Matched(rule);
            }
        }

        if categorical_hit {
            Lookup::OutOfRange
        } else {
            Lookup::NotAvailable
        }
    }
}
