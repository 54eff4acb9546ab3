//! Compact-notation scanner (§4.3): expands the textual shortcuts
//! XCSP3 allows inside element text — value/variable sequences,
//! interval shorthand, array-slice shorthand, tuple literals and the
//! `*` wildcard — into concrete operand lists. Grounded on
//! `XCSP3CoreParser.cc`'s `decode`/`split` helpers, rewritten as a
//! small hand-rolled scanner over character classes rather than a
//! regex cascade, in the same spirit as the teacher workspace's own
//! lexers tokenising by character-class transition.

use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::TupleValue;

fn syntax_error(position: usize, fragment: &str) -> ParseError {
    ParseError::CompactSyntaxError {
        position,
        fragment: fragment.to_string(),
    }
}

/// One whitespace-delimited token of raw element text, with its byte
/// offset (for error reporting).
fn tokens(text: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0usize;
    text.split_whitespace().map(move |tok| {
        // `split_whitespace` discards the original offsets; recover them
        // by searching forward from the last consumed position.
        let start = offset + text[offset..].find(tok).unwrap_or(0);
        offset = start + tok.len();
        (start, tok)
    })
}

/// Parses a single `v`, `-v`, or `v..w` token into one or two integers
/// (`[v]` or `[v, v+1, ..., w]`).
fn expand_int_token(position: usize, tok: &str) -> Result<Vec<i64>> {
    if let Some((lo, hi)) = split_range(tok) {
        let lo: i64 = lo.parse().map_err(|_| syntax_error(position, tok))?;
        let hi: i64 = hi.parse().map_err(|_| syntax_error(position, tok))?;
        if lo > hi {
            return Err(syntax_error(position, tok));
        }
        Ok((lo..=hi).collect())
    } else {
        let v: i64 = tok.parse().map_err(|_| syntax_error(position, tok))?;
        Ok(vec![v])
    }
}

/// Splits `"v..w"` into `("v", "w")`, being careful not to mistake a
/// leading `-` for part of the `..` separator.
fn split_range(tok: &str) -> Option<(&str, &str)> {
    let idx = tok.find("..")?;
    let (lo, rest) = tok.split_at(idx);
    let hi = &rest[2..];
    if lo.is_empty() || hi.is_empty() {
        return None;
    }
    Some((lo, hi))
}

/// Expands a whitespace-separated sequence of integers and `v..w`
/// ranges, e.g. domain text `"1 3..5 9"` → `[1, 3, 4, 5, 9]`.
pub fn scan_int_sequence(text: &str) -> Result<Vec<i64>> {
    let mut out = Vec::new();
    for (position, tok) in tokens(text) {
        out.extend(expand_int_token(position, tok)?);
    }
    Ok(out)
}

/// Expands `"1 3..5"` the same way [`scan_int_sequence`] does, but
/// also recognises `*` as [`xcsp3_ir::STAR`]'s [`TupleValue::Star`].
fn expand_tuple_value(position: usize, tok: &str) -> Result<Vec<TupleValue>> {
    if tok == "*" {
        return Ok(vec![TupleValue::Star]);
    }
    expand_int_token(position, tok).map(|vs| vs.into_iter().map(TupleValue::Value).collect())
}

/// Parses an extension constraint's tuple text. Parenthesised groups
/// `(a,b,c)(d,e,f)` are read literally as rows; a bare, paren-free
/// sequence is read as a column of 1-tuples (the unary-scope shorthand
/// XCSP3 permits when the scope has exactly one variable).
pub fn scan_tuples(text: &str, arity: usize) -> Result<Vec<Vec<TupleValue>>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !trimmed.contains('(') {
        let mut rows = Vec::new();
        for (position, tok) in tokens(trimmed) {
            for v in expand_tuple_value(position, tok)? {
                rows.push(vec![v]);
            }
        }
        if arity != 1 {
            for row in &rows {
                if row.len() != arity {
                    return Err(syntax_error(0, trimmed));
                }
            }
        }
        return Ok(rows);
    }

    let mut rows = Vec::new();
    let bytes = trimmed.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                let close = trimmed[i..]
                    .find(')')
                    .map(|rel| i + rel)
                    .ok_or_else(|| syntax_error(i, trimmed))?;
                let inner = &trimmed[i + 1..close];
                let mut row = Vec::new();
                for (offset, field) in inner.split(',').enumerate() {
                    let field = field.trim();
                    if field.is_empty() {
                        return Err(syntax_error(i + offset, inner));
                    }
                    let mut values = expand_tuple_value(i, field)?;
                    if values.len() != 1 {
                        return Err(syntax_error(i, field));
                    }
                    row.push(values.remove(0));
                }
                if row.len() != arity {
                    return Err(syntax_error(i, inner));
                }
                rows.push(row);
                i = close + 1;
            }
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            _ => return Err(syntax_error(i, &trimmed[i..])),
        }
    }
    Ok(rows)
}

/// One bracket group of a compact array reference: `[]` (full
/// extent), `[i]` (a fixed index), or `[i..j]` (a sub-range).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimensionSpec {
    Full,
    Index(usize),
    Range(usize, usize),
}

/// A parsed compact array reference, e.g. `x[1][2..4][]`.
#[derive(Debug, Clone)]
pub struct CellRef {
    pub base: String,
    pub dims: Vec<DimensionSpec>,
}

/// Parses one compact variable token (`x`, `x[2]`, `x[1..3][]`) into
/// its base name and per-dimension specifiers. A token with no
/// brackets at all is a scalar reference with an empty `dims`.
pub fn parse_cell_ref(position: usize, tok: &str) -> Result<CellRef> {
    let Some(bracket) = tok.find('[') else {
        return Ok(CellRef {
            base: tok.to_string(),
            dims: Vec::new(),
        });
    };
    let base = tok[..bracket].to_string();
    let mut dims = Vec::new();
    let rest = &tok[bracket..];
    let bytes = rest.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'[' {
            return Err(syntax_error(position, tok));
        }
        let close = rest[i..]
            .find(']')
            .map(|rel| i + rel)
            .ok_or_else(|| syntax_error(position, tok))?;
        let inner = rest[i + 1..close].trim();
        dims.push(parse_dimension_spec(position, tok, inner)?);
        i = close + 1;
    }
    Ok(CellRef { base, dims })
}

fn parse_dimension_spec(position: usize, tok: &str, inner: &str) -> Result<DimensionSpec> {
    if inner.is_empty() {
        return Ok(DimensionSpec::Full);
    }
    if let Some(idx) = inner.find("..") {
        let (lo, hi) = (inner[..idx].trim(), inner[idx + 2..].trim());
        return Ok(DimensionSpec::Range(
            lo.parse().map_err(|_| syntax_error(position, tok))?,
            hi.parse().map_err(|_| syntax_error(position, tok))?,
        ));
    }
    Ok(DimensionSpec::Index(inner.parse().map_err(|_| syntax_error(position, tok))?))
}

/// Expands one [`CellRef`] against an array's declared `dims`, in
/// row-major iteration order, yielding every concrete `base[i][j]…`
/// name the reference denotes. A bare scalar reference (`dims.is_empty()`)
/// with no declared array dims yields just `base` itself.
#[must_use]
pub fn expand_cell_ref(cell: &CellRef, array_dims: &[usize]) -> Vec<String> {
    if cell.dims.is_empty() {
        return vec![cell.base.clone()];
    }
    let mut axes: Vec<Vec<usize>> = Vec::with_capacity(cell.dims.len());
    for (axis, spec) in cell.dims.iter().enumerate() {
        let extent = array_dims.get(axis).copied().unwrap_or(0);
        axes.push(match spec {
            DimensionSpec::Full => (0..extent).collect(),
            DimensionSpec::Index(i) => vec![*i],
            DimensionSpec::Range(lo, hi) => (*lo..=*hi).collect(),
        });
    }
    let mut combos: Vec<Vec<usize>> = vec![Vec::new()];
    for axis in &axes {
        let mut next = Vec::with_capacity(combos.len() * axis.len());
        for combo in &combos {
            for &idx in axis {
                let mut extended = combo.clone();
                extended.push(idx);
                next.push(extended);
            }
        }
        combos = next;
    }
    combos
        .into_iter()
        .map(|indices| format_cell_name(&cell.base, &indices))
        .collect()
}

/// Formats an array cell's name consistently with how declaration-time
/// cell naming works (`base[i][j]…`).
#[must_use]
pub fn format_cell_name(base: &str, indices: &[usize]) -> String {
    let mut name = base.to_string();
    for idx in indices {
        name.push('[');
        name.push_str(&idx.to_string());
        name.push(']');
    }
    name
}

/// Expands a whitespace-separated sequence of compact variable
/// references (`"x[] y[1..2][0] z"`) into a flat list of concrete
/// names, in left-to-right, then row-major order. `array_dims` looks
/// up a previously-declared array's dimensions by base name; returns
/// `None` for a plain scalar variable.
pub fn scan_name_list(text: &str, array_dims: &dyn Fn(&str) -> Option<Vec<usize>>) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for (position, tok) in tokens(text) {
        let cell = parse_cell_ref(position, tok)?;
        match array_dims(&cell.base) {
            Some(dims) => out.extend(expand_cell_ref(&cell, &dims)),
            None if cell.dims.is_empty() => out.push(cell.base),
            None => return Err(syntax_error(position, tok)),
        }
    }
    Ok(out)
}

/// Parses a `<matrix>`-style row sequence of variable references,
/// `(x0,x1)(x2,x3)`, into one flat name list per row. Each row's
/// comma-separated fields are individually expanded the same way a
/// bare `<list>` token is (array slices included).
pub fn scan_name_rows(text: &str, array_dims: &dyn Fn(&str) -> Option<Vec<usize>>) -> Result<Vec<Vec<String>>> {
    let trimmed = text.trim();
    let mut rows = Vec::new();
    let mut i = 0usize;
    let bytes = trimmed.as_bytes();
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                let close = trimmed[i..]
                    .find(')')
                    .map(|rel| i + rel)
                    .ok_or_else(|| syntax_error(i, trimmed))?;
                let inner = trimmed[i + 1..close].replace(',', " ");
                rows.push(scan_name_list(&inner, array_dims)?);
                i = close + 1;
            }
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            _ => return Err(syntax_error(i, &trimmed[i..])),
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_sequence_expands_ranges() {
        assert_eq!(scan_int_sequence("1 3..5 9").unwrap(), vec![1, 3, 4, 5, 9]);
    }

    #[test]
    fn int_sequence_rejects_descending_range() {
        assert!(scan_int_sequence("5..1").is_err());
    }

    #[test]
    fn tuple_scan_reads_parenthesised_rows_with_star() {
        let rows = scan_tuples("(1,*,3)(4,5,*)", 3).unwrap();
        assert_eq!(
            rows,
            vec![
                vec![TupleValue::Value(1), TupleValue::Star, TupleValue::Value(3)],
                vec![TupleValue::Value(4), TupleValue::Value(5), TupleValue::Star],
            ]
        );
    }

    #[test]
    fn tuple_scan_reads_unary_scope_as_single_column() {
        let rows = scan_tuples("1 2 3", 1).unwrap();
        assert_eq!(
            rows,
            vec![vec![TupleValue::Value(1)], vec![TupleValue::Value(2)], vec![TupleValue::Value(3)]]
        );
    }

    #[test]
    fn cell_ref_parses_mixed_dimension_specs() {
        let cell = parse_cell_ref(0, "x[1][2..3][]").unwrap();
        assert_eq!(cell.base, "x");
        assert_eq!(
            cell.dims,
            vec![DimensionSpec::Index(1), DimensionSpec::Range(2, 3), DimensionSpec::Full]
        );
    }

    #[test]
    fn cell_ref_expands_against_array_dims_in_row_major_order() {
        let cell = parse_cell_ref(0, "x[0..1][]").unwrap();
        let names = expand_cell_ref(&cell, &[2, 2]);
        assert_eq!(names, vec!["x[0][0]", "x[0][1]", "x[1][0]", "x[1][1]"]);
    }

    #[test]
    fn name_rows_split_parenthesised_groups() {
        let dims = |_: &str| None;
        let rows = scan_name_rows("(x0,x1)(x2,x3)", &dims).unwrap();
        assert_eq!(rows, vec![vec!["x0".to_string(), "x1".to_string()], vec!["x2".to_string(), "x3".to_string()]]);
    }

    #[test]
    fn name_list_expands_array_slices_and_scalars() {
        let dims = |base: &str| if base == "x" { Some(vec![2]) } else { None };
        let names = scan_name_list("x[] y", &dims).unwrap();
        assert_eq!(names, vec!["x[0]", "x[1]", "y"]);
    }
}
