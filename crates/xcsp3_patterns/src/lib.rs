//! Structural pattern matching over canonicalised expression trees.
//!
//! `Pattern` and [`matches`] are the Rust shape of `Node::areSimilar()`
//! in the original `XCSP3TreeNode.cc`: a pattern tree built with a
//! wildcard operator (`FAKEOP` there, [`Pattern::Any`] here) that
//! records whatever subtree it lines up against, plus typed leaf
//! wildcards for capturing a bare variable or a bare constant. The
//! dispatcher (`xcsp3_parse`) uses this to recognise the "primitive"
//! constraint shapes XCSP3 allows compact notation for — `x <= 5`,
//! `x = y`, `z = x * y`, and so on — without hardcoding a parser for
//! each one.

use rustc_hash::FxHashMap;
use xcsp3_ir::{ExprArena, ExprId, ExprKind, Name};

/// A pattern to match a canonical expression tree against.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches any single variable leaf, capturing it under `slot`.
    AnyVar(u8),
    /// Matches any integer constant leaf, capturing it under `slot`.
    AnyConst(u8),
    /// Matches an exact integer constant.
    Const(i64),
    /// Matches any subtree at all, capturing it whole under `slot`.
    /// The `FAKEOP` wildcard in the original.
    Any(u8),
    /// Matches a specific binary operator shape.
    Binary(BinaryOp, Box<Pattern>, Box<Pattern>),
    /// Matches an n-ary operator of exactly this arity (order
    /// matters: patterns are matched against already-canonicalised,
    /// already-sorted trees).
    Nary(NaryOp, Vec<Pattern>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Lt,
    Le,
    Ge,
    Gt,
    Sub,
    Div,
    Mod,
    Pow,
    Dist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaryOp {
    Add,
    Mul,
    Eq,
    Ne,
}

/// What a successful match bound its capture slots to.
#[derive(Debug, Clone, Default)]
pub struct Captures {
    vars: FxHashMap<u8, Name>,
    consts: FxHashMap<u8, i64>,
    subtrees: FxHashMap<u8, ExprId>,
}

impl Captures {
    #[must_use]
    pub fn var(&self, slot: u8) -> Option<Name> {
        self.vars.get(&slot).copied()
    }

    #[must_use]
    pub fn const_value(&self, slot: u8) -> Option<i64> {
        self.consts.get(&slot).copied()
    }

    #[must_use]
    pub fn subtree(&self, slot: u8) -> Option<ExprId> {
        self.subtrees.get(&slot).copied()
    }
}

/// Attempts to match `pattern` against the subtree rooted at `id`,
/// returning the captures on success.
#[must_use]
pub fn matches(arena: &ExprArena, pattern: &Pattern, id: ExprId) -> Option<Captures> {
    let mut captures = Captures::default();
    if match_into(arena, pattern, id, &mut captures) {
        Some(captures)
    } else {
        None
    }
}

fn match_into(arena: &ExprArena, pattern: &Pattern, id: ExprId, out: &mut Captures) -> bool {
    match pattern {
        Pattern::Any(slot) => {
            out.subtrees.insert(*slot, id);
            true
        }
        Pattern::AnyVar(slot) => match arena.get(id) {
            ExprKind::Var(name) => {
                out.vars.insert(*slot, name);
                true
            }
            _ => false,
        },
        Pattern::AnyConst(slot) => match arena.get(id) {
            ExprKind::Long(v) => {
                out.consts.insert(*slot, v);
                true
            }
            _ => false,
        },
        Pattern::Const(expected) => matches!(arena.get(id), ExprKind::Long(v) if v == *expected),
        Pattern::Binary(op, lhs, rhs) => match (op, arena.get(id)) {
            (BinaryOp::Lt, ExprKind::Lt(a, b))
            | (BinaryOp::Le, ExprKind::Le(a, b))
            | (BinaryOp::Ge, ExprKind::Ge(a, b))
            | (BinaryOp::Gt, ExprKind::Gt(a, b))
            | (BinaryOp::Sub, ExprKind::Sub(a, b))
            | (BinaryOp::Div, ExprKind::Div(a, b))
            | (BinaryOp::Mod, ExprKind::Mod(a, b))
            | (BinaryOp::Pow, ExprKind::Pow(a, b))
            | (BinaryOp::Dist, ExprKind::Dist(a, b)) => {
                match_into(arena, lhs, a, out) && match_into(arena, rhs, b, out)
            }
            _ => false,
        },
        Pattern::Nary(op, subpatterns) => {
            let list = match (op, arena.get(id)) {
                (NaryOp::Add, ExprKind::Add(l))
                | (NaryOp::Mul, ExprKind::Mul(l))
                | (NaryOp::Eq, ExprKind::Eq(l))
                | (NaryOp::Ne, ExprKind::Ne(l)) => l,
                _ => return false,
            };
            let children = arena.list(list);
            if children.len() != subpatterns.len() {
                return false;
            }
            children
                .iter()
                .zip(subpatterns)
                .all(|(&c, p)| match_into(arena, p, c, out))
        }
    }
}

/// The shape a canonicalised intension tree was recognised as, per
/// the `buildConstraintPrimitive` overload set in
/// `XCSP3CoreCallbacksBase.h`: a unary relation against a constant, a
/// binary relation between two variables possibly offset by a
/// constant, or a ternary product/in-range relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Primitive {
    /// `x <R> k`
    VarRelConst(Name, RelOp, i64),
    /// `x <R> y + k` (k == 0 for a bare `x <R> y`)
    VarRelVarOffset(Name, RelOp, Name, i64),
    /// `z == x * y`
    EqProduct(Name, Name, Name),
    /// `x in [min,max]` (`in_flag = true`) or `x notin [min,max]`
    /// (`in_flag = false`).
    InRange(Name, bool, i64, i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Le,
    Ge,
    Gt,
    Eq,
    Ne,
}

/// Tries every primitive shape in turn against a canonicalised
/// intension tree, returning the first that fits.
#[must_use]
pub fn recognize_primitive(arena: &ExprArena, tree: ExprId) -> Option<Primitive> {
    let found = recognize_rel_const(arena, tree)
        .or_else(|| recognize_rel_var_offset(arena, tree))
        .or_else(|| recognize_eq_product(arena, tree))
        .or_else(|| recognize_in_range(arena, tree));
    match &found {
        Some(shape) => tracing::trace!(?shape, "recognised primitive constraint shape"),
        None => tracing::trace!("no primitive shape matched, falling back to general intension"),
    }
    found
}

fn rel_op_of(kind: ExprKind) -> Option<(RelOp, ExprId, ExprId)> {
    match kind {
        ExprKind::Lt(a, b) => Some((RelOp::Lt, a, b)),
        ExprKind::Le(a, b) => Some((RelOp::Le, a, b)),
        ExprKind::Ge(a, b) => Some((RelOp::Ge, a, b)),
        ExprKind::Gt(a, b) => Some((RelOp::Gt, a, b)),
        _ => None,
    }
}

/// `a <op> b` read as `b <flip(op)> a`: flips the arithmetic direction
/// of a relational operator, used when canonicalisation (rule 3 of
/// §4.2.3) has put the constant or offset-variable operand on the left.
/// `eq`/`ne` are unaffected — equality reads the same from either side.
fn flip_rel(op: RelOp) -> RelOp {
    match op {
        RelOp::Lt => RelOp::Gt,
        RelOp::Gt => RelOp::Lt,
        RelOp::Le => RelOp::Ge,
        RelOp::Ge => RelOp::Le,
        RelOp::Eq => RelOp::Eq,
        RelOp::Ne => RelOp::Ne,
    }
}

fn recognize_rel_const(arena: &ExprArena, tree: ExprId) -> Option<Primitive> {
    let (op, a, b) = rel_op_of(arena.get(tree)).or_else(|| match arena.get(tree) {
        ExprKind::Eq(l) => {
            let c = arena.list(l);
            (c.len() == 2).then(|| (RelOp::Eq, c[0], c[1]))
        }
        ExprKind::Ne(l) => {
            let c = arena.list(l);
            (c.len() == 2).then(|| (RelOp::Ne, c[0], c[1]))
        }
        _ => None,
    })?;
    if let (ExprKind::Var(name), ExprKind::Long(k)) = (arena.get(a), arena.get(b)) {
        return Some(Primitive::VarRelConst(name, op, k));
    }
    if let (ExprKind::Long(k), ExprKind::Var(name)) = (arena.get(a), arena.get(b)) {
        return Some(Primitive::VarRelConst(name, flip_rel(op), k));
    }
    None
}

/// A variable, or a variable plus a constant offset (`add(y, k)`),
/// read either way round.
fn as_var_or_offset(arena: &ExprArena, id: ExprId) -> Option<(Name, i64)> {
    match arena.get(id) {
        ExprKind::Var(y) => Some((y, 0)),
        ExprKind::Add(l) => {
            let c = arena.list(l);
            if c.len() == 2 {
                if let (ExprKind::Var(y), ExprKind::Long(k)) = (arena.get(c[0]), arena.get(c[1])) {
                    return Some((y, k));
                }
            }
            None
        }
        _ => None,
    }
}

fn recognize_rel_var_offset(arena: &ExprArena, tree: ExprId) -> Option<Primitive> {
    let (op, a, b) = rel_op_of(arena.get(tree)).or_else(|| match arena.get(tree) {
        ExprKind::Eq(l) => {
            let c = arena.list(l);
            (c.len() == 2).then(|| (RelOp::Eq, c[0], c[1]))
        }
        ExprKind::Ne(l) => {
            let c = arena.list(l);
            (c.len() == 2).then(|| (RelOp::Ne, c[0], c[1]))
        }
        _ => None,
    })?;
    if let ExprKind::Var(x) = arena.get(a) {
        if let Some((y, k)) = as_var_or_offset(arena, b) {
            return Some(Primitive::VarRelVarOffset(x, op, y, k));
        }
    }
    if let ExprKind::Var(x) = arena.get(b) {
        if let Some((y, k)) = as_var_or_offset(arena, a) {
            return Some(Primitive::VarRelVarOffset(x, flip_rel(op), y, k));
        }
    }
    None
}

fn recognize_eq_product(arena: &ExprArena, tree: ExprId) -> Option<Primitive> {
    if let ExprKind::Eq(l) = arena.get(tree) {
        let c = arena.list(l);
        if c.len() == 2 {
            let (p, q) = (c[0], c[1]);
            if let (ExprKind::Mul(ml), ExprKind::Var(z)) = (arena.get(p), arena.get(q)) {
                let mc = arena.list(ml);
                if mc.len() == 2 {
                    if let (ExprKind::Var(x), ExprKind::Var(y)) = (arena.get(mc[0]), arena.get(mc[1])) {
                        return Some(Primitive::EqProduct(x, y, z));
                    }
                }
            }
        }
    }
    None
}

/// `in(x, set(c1,…,cn))` / `notin(…)` with `n >= 2`, recognised only
/// when the set's (already sorted, by canonicalisation's symmetric-child
/// ordering) constants form a contiguous interval `[c1, cn]` — a
/// non-contiguous set falls through to the general intension callback,
/// matching the original's "only if the set is an interval" condition.
fn recognize_in_range(arena: &ExprArena, tree: ExprId) -> Option<Primitive> {
    let (in_flag, x, set_list) = match arena.get(tree) {
        ExprKind::In(a, b) => (true, a, b),
        ExprKind::NotIn(a, b) => (false, a, b),
        _ => return None,
    };
    let ExprKind::Var(x) = arena.get(x) else {
        return None;
    };
    let ExprKind::Set(l) = arena.get(set_list) else {
        return None;
    };
    let children = arena.list(l);
    if children.len() < 2 {
        return None;
    }
    let mut values = Vec::with_capacity(children.len());
    for &c in children {
        let ExprKind::Long(v) = arena.get(c) else {
            return None;
        };
        values.push(v);
    }
    let is_contiguous = values.windows(2).all(|w| w[1] == w[0] + 1);
    if !is_contiguous {
        return None;
    }
    Some(Primitive::InRange(x, in_flag, values[0], values[values.len() - 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsp3_ir::NameInterner;

    #[test]
    fn recognises_var_le_const() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let k = arena.insert(ExprKind::Long(5));
        let tree = arena.insert(ExprKind::Le(x, k));
        assert_eq!(
            recognize_primitive(&arena, tree),
            Some(Primitive::VarRelConst(names.intern("x"), RelOp::Le, 5))
        );
    }

    #[test]
    fn recognises_product_equality() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let y = arena.insert(ExprKind::Var(names.intern("y")));
        let z = arena.insert(ExprKind::Var(names.intern("z")));
        let list = arena.push_list(&[x, y]);
        let mul = arena.insert(ExprKind::Mul(list));
        let eq_list = arena.push_list(&[mul, z]);
        let tree = arena.insert(ExprKind::Eq(eq_list));
        assert_eq!(
            recognize_primitive(&arena, tree),
            Some(Primitive::EqProduct(
                names.intern("x"),
                names.intern("y"),
                names.intern("z")
            ))
        );
    }

    #[test]
    fn recognises_in_range() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let values = [3, 4, 5].map(|v| arena.insert(ExprKind::Long(v)));
        let set = arena.insert(ExprKind::Set(arena.push_list(&values)));
        let tree = arena.insert(ExprKind::In(x, set));
        assert_eq!(
            recognize_primitive(&arena, tree),
            Some(Primitive::InRange(names.intern("x"), true, 3, 5))
        );
    }

    #[test]
    fn recognises_notin_range() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let values = [3, 4, 5].map(|v| arena.insert(ExprKind::Long(v)));
        let set = arena.insert(ExprKind::Set(arena.push_list(&values)));
        let tree = arena.insert(ExprKind::NotIn(x, set));
        assert_eq!(
            recognize_primitive(&arena, tree),
            Some(Primitive::InRange(names.intern("x"), false, 3, 5))
        );
    }

    #[test]
    fn recognises_const_le_var_as_flipped_ge() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let k = arena.insert(ExprKind::Long(4));
        let tree = arena.insert(ExprKind::Le(k, x));
        assert_eq!(
            recognize_primitive(&arena, tree),
            Some(Primitive::VarRelConst(names.intern("x"), RelOp::Ge, 4))
        );
    }

    #[test]
    fn recognises_var_offset_on_the_left() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let y = arena.insert(ExprKind::Var(names.intern("y")));
        let k = arena.insert(ExprKind::Long(2));
        let offset = arena.insert(ExprKind::Add(arena.push_list(&[y, k])));
        let tree = arena.insert(ExprKind::Le(offset, x));
        assert_eq!(
            recognize_primitive(&arena, tree),
            Some(Primitive::VarRelVarOffset(names.intern("x"), RelOp::Ge, names.intern("y"), 2))
        );
    }

    #[test]
    fn non_contiguous_set_is_not_recognised_as_in_range() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let values = [3, 4, 7].map(|v| arena.insert(ExprKind::Long(v)));
        let set = arena.insert(ExprKind::Set(arena.push_list(&values)));
        let tree = arena.insert(ExprKind::In(x, set));
        assert_eq!(recognize_primitive(&arena, tree), None);
    }

    #[test]
    fn generic_pattern_matcher_captures_wildcards() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let k = arena.insert(ExprKind::Long(7));
        let tree = arena.insert(ExprKind::Le(x, k));
        let pattern = Pattern::Binary(
            BinaryOp::Le,
            Box::new(Pattern::AnyVar(0)),
            Box::new(Pattern::AnyConst(1)),
        );
        let captures = matches(&arena, &pattern, tree).expect("pattern should match");
        assert_eq!(captures.var(0), Some(names.intern("x")));
        assert_eq!(captures.const_value(1), Some(7));
    }
}
