//! Templates for `<group>` and `<slide>` meta-constraints: a single
//! constraint shape parameterised by `%0`, `%1`, ... placeholders, plus
//! the argument vectors (group) or windowed base list (slide) that
//! `xcsp3_unfold` instantiates it against.
//!
//! The template itself is an ordinary, already-parsed
//! [`crate::constraint::ConstraintKind`] — its `%k` placeholders are
//! just variables and expression leaves named the same way the parser
//! names every other reference, recognised by [`placeholder_index`].
//! This is the same trick the original C++ implementation uses
//! (`XConstraintGroup` stores a template built from genuine
//! `XVariable*`/`Node*` objects and substitutes pointers in place); it
//! means the unfolder never has to parse text, only substitute names
//! and clone subtrees.

use crate::constraint::ConstraintKind;
use crate::name::Name;

/// Parses a `%k` placeholder token, returning its index. Matches
/// strings of the exact form `%` followed by one or more digits.
#[must_use]
pub fn placeholder_index(s: &str) -> Option<u32> {
    let digits = s.strip_prefix('%')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// A `<group>` meta-constraint: one template applied once per row of
/// `arguments`.
#[derive(Debug, Clone)]
pub struct GroupTemplate {
    pub id: String,
    pub classes: Vec<String>,
    pub template: ConstraintKind,
    pub arguments: Vec<Vec<Name>>,
}

/// Whether a `<slide>`'s windows wrap around the end of its base list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideMode {
    NonCircular,
    Circular,
}

/// A `<slide>` meta-constraint: one template applied to each window of
/// width `window_len`, stepped by `offset`, sliding over `list` (and
/// optionally `list2` in lockstep, for two-list slides).
#[derive(Debug, Clone)]
pub struct SlideTemplate {
    pub id: String,
    pub classes: Vec<String>,
    pub template: ConstraintKind,
    pub list: Vec<Name>,
    pub list2: Option<Vec<Name>>,
    pub window_len: usize,
    pub offset: usize,
    pub mode: SlideMode,
}

impl SlideTemplate {
    /// The argument rows this slide instantiates its template against,
    /// in order: each row is one window of `list` concatenated with
    /// the matching window of `list2`, if present. Non-circular slides
    /// stop once a full window no longer fits; circular slides wrap
    /// indices modulo the list length.
    #[must_use]
    pub fn argument_rows(&self) -> Vec<Vec<Name>> {
        let windows1 = windows_of(&self.list, self.window_len, self.offset, self.mode);
        match &self.list2 {
            None => windows1,
            Some(list2) => {
                let windows2 = windows_of(list2, self.window_len, self.offset, self.mode);
                windows1
                    .into_iter()
                    .zip(windows2)
                    .map(|(mut a, b)| {
                        a.extend(b);
                        a
                    })
                    .collect()
            }
        }
    }
}

fn windows_of(list: &[Name], window_len: usize, offset: usize, mode: SlideMode) -> Vec<Vec<Name>> {
    let n = list.len();
    if n == 0 || window_len == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();
    let step = offset.max(1);
    match mode {
        SlideMode::NonCircular => {
            let mut start = 0usize;
            while start + window_len <= n {
                out.push(list[start..start + window_len].to_vec());
                start += step;
            }
        }
        SlideMode::Circular => {
            // Always produces exactly `n` instantiations regardless of
            // `offset`: the i-th window starts at `i * offset`, wrapped
            // modulo the list length, for every `i` in `0..n`.
            for i in 0..n {
                let start = i * step;
                let window: Vec<Name> = (0..window_len).map(|k| list[(start + k) % n]).collect();
                out.push(window);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::NameInterner;

    #[test]
    fn placeholder_index_parses_percent_digits() {
        assert_eq!(placeholder_index("%0"), Some(0));
        assert_eq!(placeholder_index("%12"), Some(12));
        assert_eq!(placeholder_index("x"), None);
        assert_eq!(placeholder_index("%"), None);
        assert_eq!(placeholder_index("%a"), None);
    }

    #[test]
    fn non_circular_windows_stop_short_of_wraparound() {
        let mut interner = NameInterner::new();
        let list: Vec<Name> = (0..5).map(|i| interner.intern(&format!("x{i}"))).collect();
        assert_eq!(windows_of(&list, 2, 1, SlideMode::NonCircular).len(), 4);
    }

    #[test]
    fn circular_windows_wrap_around() {
        let mut interner = NameInterner::new();
        let list: Vec<Name> = (0..4).map(|i| interner.intern(&format!("x{i}"))).collect();
        assert_eq!(windows_of(&list, 2, 1, SlideMode::Circular).len(), 4);
    }

    #[test]
    fn circular_windows_with_offset_still_cover_every_start() {
        let mut interner = NameInterner::new();
        let list: Vec<Name> = (0..6).map(|i| interner.intern(&format!("x{i}"))).collect();
        let windows = windows_of(&list, 2, 2, SlideMode::Circular);
        assert_eq!(windows.len(), 6);
        assert_eq!(windows[0], vec![list[0], list[1]]);
        assert_eq!(windows[1], vec![list[2], list[3]]);
        assert_eq!(windows[5], vec![list[4], list[5]]);
    }
}
