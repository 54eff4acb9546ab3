//! Sink-side configuration flags (§6), modelled as a plain struct with
//! a builder rather than a layered config-file loader — this parser
//! has no persistent configuration surface beyond the one-shot flags
//! the callback bank exposes.

use rustc_hash::FxHashSet;

/// The flags `XCSP3CoreCallbacksBase`'s constructor sets on itself,
/// carried here instead so the dispatcher (not the sink) owns the
/// decision of which callback overload to fire.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// If true, `buildConstraintIntension(id, expr: String)` fires
    /// instead of the tree-typed overload.
    pub intension_using_string: bool,
    /// Recognise `x <R> k`, `x <R> y + k`, `x in/notin [min,max]`,
    /// `z = x * y` and fire the dedicated primitive callbacks.
    pub recognize_special_intension_cases: bool,
    /// Recognise `atLeast`/`atMost`/`exactly`/`among`/`exactlyVariable`
    /// shapes of `<count>`.
    pub recognize_special_count_cases: bool,
    /// Recognise `allEqual`/`notAllEqual`/`allDifferent` shapes of
    /// `<nValues>`.
    pub recognize_nvalues_cases: bool,
    /// Merge duplicate-variable coefficients, drop zero coefficients,
    /// and omit the coefficient vector when every coefficient is one.
    pub normalize_sum: bool,
    /// Constraint classes (`<... class="symmetryBreaking">`) to drop
    /// silently rather than report to the callback bank.
    pub discarded_classes: FxHashSet<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            intension_using_string: false,
            recognize_special_intension_cases: true,
            recognize_special_count_cases: true,
            recognize_nvalues_cases: true,
            normalize_sum: true,
            discarded_classes: FxHashSet::default(),
        }
    }
}

impl ParserConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_intension_using_string(mut self, value: bool) -> Self {
        self.intension_using_string = value;
        self
    }

    #[must_use]
    pub fn with_recognize_special_intension_cases(mut self, value: bool) -> Self {
        self.recognize_special_intension_cases = value;
        self
    }

    #[must_use]
    pub fn with_recognize_special_count_cases(mut self, value: bool) -> Self {
        self.recognize_special_count_cases = value;
        self
    }

    #[must_use]
    pub fn with_recognize_nvalues_cases(mut self, value: bool) -> Self {
        self.recognize_nvalues_cases = value;
        self
    }

    #[must_use]
    pub fn with_normalize_sum(mut self, value: bool) -> Self {
        self.normalize_sum = value;
        self
    }

    #[must_use]
    pub fn discard_class(mut self, class: impl Into<String>) -> Self {
        self.discarded_classes.insert(class.into());
        self
    }

    /// True if `classes` (the constraint's space-joined class string)
    /// names at least one discarded class.
    #[must_use]
    pub fn is_discarded(&self, classes: &[String]) -> bool {
        classes.iter().any(|c| self.discarded_classes.contains(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discard_class_filters_by_membership() {
        let config = ParserConfig::new().discard_class("symmetryBreaking");
        assert!(config.is_discarded(&["symmetryBreaking".to_string()]));
        assert!(!config.is_discarded(&["clues".to_string()]));
    }
}
