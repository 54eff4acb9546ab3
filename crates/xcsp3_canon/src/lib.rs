//! Canonicalisation of XCSP3 intension expression trees.
//!
//! `canonize` rewrites a parsed expression tree into the normal form
//! the pattern matcher (`xcsp3_patterns`) and the primitive-constraint
//! recogniser in the dispatcher expect, following
//! `NodeOperator::canonize()` in the original `XCSP3TreeNode.cc`
//! rule-for-rule: recursively canonicalise children, sort symmetric
//! operands into a total order, fold relational operators into their
//! smallest representation, and flatten associative chains.

mod compare;

pub use compare::children_of;
use compare::compare_nodes;
use xcsp3_ir::{ExprArena, ExprId, ExprKind, Name};

/// Canonicalises the subtree rooted at `id` in place, returning the
/// (possibly different) id of the canonical root. Idempotent: calling
/// this again on the result is a no-op.
pub fn canonize(arena: &mut ExprArena, resolve: &dyn Fn(Name) -> String, id: ExprId) -> ExprId {
    let mut current = id;
    // The rewrite rules interact (sorting enables constant folding,
    // folding enables unary-collapse, collapse can expose another
    // sub-to-add rewrite). Iterate to a fixpoint rather than assume a
    // single bottom-up pass suffices, same as the original's
    // "rewriteInto" dance; a handful of passes always converges for
    // the tree depths an XCSP3 instance produces.
    for pass in 0..8 {
        let next = canonize_pass(arena, resolve, current);
        if next == current {
            tracing::trace!(pass, "canonicalisation reached a fixpoint");
            break;
        }
        current = next;
    }
    current
}

fn canonize_pass(arena: &mut ExprArena, resolve: &dyn Fn(Name) -> String, id: ExprId) -> ExprId {
    let kind = arena.get(id);
    let kind = canonize_children(arena, resolve, kind);
    let id = arena.insert(kind);

    let kind = arena.get(id);
    let kind = abs_of_sub_to_dist(arena, kind);
    let kind = invert_not_of_relational(arena, kind);
    let id = arena.insert(kind);

    let kind = arena.get(id);
    let kind = sub_to_add(arena, kind);
    let id = arena.insert(kind);

    let kind = arena.get(id);
    let kind = invert_non_symmetric_relational(kind);
    let id = arena.insert(kind);

    let kind = arena.get(id);
    let kind = sort_symmetric(arena, resolve, kind);
    let kind = flatten_associative(arena, kind);
    let id = arena.insert(kind);

    let kind = arena.get(id);
    let kind = collapse_unary_wrapper(arena, kind);
    let id = arena.insert(kind);

    let kind = arena.get(id);
    let kind = fold_constants(arena, kind);
    let kind = normalize_lt_gt(arena, kind);
    let kind = absorb_additive_constant(arena, kind);
    let kind = fold_eq_of_mul(arena, kind);
    arena.insert(kind)
}

fn canonize_children(arena: &mut ExprArena, resolve: &dyn Fn(Name) -> String, kind: ExprKind) -> ExprKind {
    let c1 = |arena: &mut ExprArena, x: ExprId| canonize_pass(arena, resolve, x);
    match kind {
        ExprKind::Neg(a) => ExprKind::Neg(c1(arena, a)),
        ExprKind::Abs(a) => ExprKind::Abs(c1(arena, a)),
        ExprKind::Sqr(a) => ExprKind::Sqr(c1(arena, a)),
        ExprKind::Not(a) => ExprKind::Not(c1(arena, a)),
        ExprKind::Sqrt(a) => ExprKind::Sqrt(c1(arena, a)),
        ExprKind::Exp(a) => ExprKind::Exp(c1(arena, a)),
        ExprKind::Ln(a) => ExprKind::Ln(c1(arena, a)),
        ExprKind::Sin(a) => ExprKind::Sin(c1(arena, a)),
        ExprKind::Cos(a) => ExprKind::Cos(c1(arena, a)),
        ExprKind::Tan(a) => ExprKind::Tan(c1(arena, a)),
        ExprKind::Asin(a) => ExprKind::Asin(c1(arena, a)),
        ExprKind::Acos(a) => ExprKind::Acos(c1(arena, a)),
        ExprKind::Atan(a) => ExprKind::Atan(c1(arena, a)),
        ExprKind::Sinh(a) => ExprKind::Sinh(c1(arena, a)),
        ExprKind::Cosh(a) => ExprKind::Cosh(c1(arena, a)),
        ExprKind::Tanh(a) => ExprKind::Tanh(c1(arena, a)),
        ExprKind::Card(a) => ExprKind::Card(c1(arena, a)),
        ExprKind::Hull(a) => ExprKind::Hull(c1(arena, a)),
        ExprKind::Convex(a) => ExprKind::Convex(c1(arena, a)),
        ExprKind::Lt(a, b) => ExprKind::Lt(c1(arena, a), c1(arena, b)),
        ExprKind::Le(a, b) => ExprKind::Le(c1(arena, a), c1(arena, b)),
        ExprKind::Ge(a, b) => ExprKind::Ge(c1(arena, a), c1(arena, b)),
        ExprKind::Gt(a, b) => ExprKind::Gt(c1(arena, a), c1(arena, b)),
        ExprKind::Sub(a, b) => ExprKind::Sub(c1(arena, a), c1(arena, b)),
        ExprKind::Div(a, b) => ExprKind::Div(c1(arena, a), c1(arena, b)),
        ExprKind::Mod(a, b) => ExprKind::Mod(c1(arena, a), c1(arena, b)),
        ExprKind::Pow(a, b) => ExprKind::Pow(c1(arena, a), c1(arena, b)),
        ExprKind::Dist(a, b) => ExprKind::Dist(c1(arena, a), c1(arena, b)),
        ExprKind::FDiv(a, b) => ExprKind::FDiv(c1(arena, a), c1(arena, b)),
        ExprKind::FMod(a, b) => ExprKind::FMod(c1(arena, a), c1(arena, b)),
        ExprKind::NRoot(a, b) => ExprKind::NRoot(c1(arena, a), c1(arena, b)),
        ExprKind::Log(a, b) => ExprKind::Log(c1(arena, a), c1(arena, b)),
        ExprKind::Imp(a, b) => ExprKind::Imp(c1(arena, a), c1(arena, b)),
        ExprKind::In(a, b) => ExprKind::In(c1(arena, a), c1(arena, b)),
        ExprKind::NotIn(a, b) => ExprKind::NotIn(c1(arena, a), c1(arena, b)),
        ExprKind::Subset(a, b) => ExprKind::Subset(c1(arena, a), c1(arena, b)),
        ExprKind::Subseq(a, b) => ExprKind::Subseq(c1(arena, a), c1(arena, b)),
        ExprKind::Supseq(a, b) => ExprKind::Supseq(c1(arena, a), c1(arena, b)),
        ExprKind::Supset(a, b) => ExprKind::Supset(c1(arena, a), c1(arena, b)),
        ExprKind::Diff(a, b) => ExprKind::Diff(c1(arena, a), c1(arena, b)),
        ExprKind::Sdiff(a, b) => ExprKind::Sdiff(c1(arena, a), c1(arena, b)),
        ExprKind::If(a, b, c) => ExprKind::If(c1(arena, a), c1(arena, b), c1(arena, c)),
        ExprKind::Add(l) => rebuild_list(arena, l, ExprKind::Add, resolve),
        ExprKind::Mul(l) => rebuild_list(arena, l, ExprKind::Mul, resolve),
        ExprKind::Min(l) => rebuild_list(arena, l, ExprKind::Min, resolve),
        ExprKind::Max(l) => rebuild_list(arena, l, ExprKind::Max, resolve),
        ExprKind::Eq(l) => rebuild_list(arena, l, ExprKind::Eq, resolve),
        ExprKind::Ne(l) => rebuild_list(arena, l, ExprKind::Ne, resolve),
        ExprKind::And(l) => rebuild_list(arena, l, ExprKind::And, resolve),
        ExprKind::Or(l) => rebuild_list(arena, l, ExprKind::Or, resolve),
        ExprKind::Xor(l) => rebuild_list(arena, l, ExprKind::Xor, resolve),
        ExprKind::Iff(l) => rebuild_list(arena, l, ExprKind::Iff, resolve),
        ExprKind::Set(l) => rebuild_list(arena, l, ExprKind::Set, resolve),
        ExprKind::Union(l) => rebuild_list(arena, l, ExprKind::Union, resolve),
        ExprKind::Inter(l) => rebuild_list(arena, l, ExprKind::Inter, resolve),
        ExprKind::Djoint(l) => rebuild_list(arena, l, ExprKind::Djoint, resolve),
        ExprKind::FakeOp(l) => rebuild_list(arena, l, ExprKind::FakeOp, resolve),
        leaf @ (ExprKind::Var(_)
        | ExprKind::Long(_)
        | ExprKind::Decimal(..)
        | ExprKind::Symbol(_)
        | ExprKind::Param(_)) => leaf,
    }
}

fn rebuild_list(
    arena: &mut ExprArena,
    list: xcsp3_ir::ExprListId,
    ctor: fn(xcsp3_ir::ExprListId) -> ExprKind,
    resolve: &dyn Fn(Name) -> String,
) -> ExprKind {
    let children: Vec<ExprId> = arena
        .list(list)
        .iter()
        .map(|&c| canonize_pass(arena, resolve, c))
        .collect();
    ctor(arena.push_list(&children))
}

fn abs_of_sub_to_dist(arena: &ExprArena, kind: ExprKind) -> ExprKind {
    if let ExprKind::Abs(child) = kind {
        if let ExprKind::Sub(a, b) = arena.get(child) {
            return ExprKind::Dist(a, b);
        }
    }
    kind
}

fn invert_not_of_relational(arena: &ExprArena, kind: ExprKind) -> ExprKind {
    if let ExprKind::Not(child) = kind {
        match arena.get(child) {
            ExprKind::Not(inner) => return arena.get(inner),
            ExprKind::Lt(a, b) => return ExprKind::Ge(a, b),
            ExprKind::Le(a, b) => return ExprKind::Gt(a, b),
            ExprKind::Ge(a, b) => return ExprKind::Lt(a, b),
            ExprKind::Gt(a, b) => return ExprKind::Le(a, b),
            ExprKind::In(a, b) => return ExprKind::NotIn(a, b),
            ExprKind::NotIn(a, b) => return ExprKind::In(a, b),
            ExprKind::Subset(a, b) => return ExprKind::Supseq(a, b),
            ExprKind::Supseq(a, b) => return ExprKind::Subset(a, b),
            ExprKind::Subseq(a, b) => return ExprKind::Supset(a, b),
            ExprKind::Supset(a, b) => return ExprKind::Subseq(a, b),
            _ => {}
        }
    }
    if let ExprKind::Neg(child) = kind {
        if let ExprKind::Neg(inner) = arena.get(child) {
            return arena.get(inner);
        }
    }
    kind
}

/// Relational constraints written over a subtraction read more simply
/// as an addition with a negated term: `R(sub(a,b), c)` becomes
/// `R(add(a, neg(b)), c)`, which lets the additive-constant rules
/// below recognise more shapes uniformly.
fn sub_to_add(arena: &mut ExprArena, kind: ExprKind) -> ExprKind {
    let rewrite_operand = |arena: &mut ExprArena, x: ExprId| -> ExprId {
        if let ExprKind::Sub(a, b) = arena.get(x) {
            let neg_b = arena.insert(ExprKind::Neg(b));
            let list = arena.push_list(&[a, neg_b]);
            return arena.insert(ExprKind::Add(list));
        }
        x
    };
    match kind {
        ExprKind::Lt(a, b) => ExprKind::Lt(rewrite_operand(arena, a), rewrite_operand(arena, b)),
        ExprKind::Le(a, b) => ExprKind::Le(rewrite_operand(arena, a), rewrite_operand(arena, b)),
        ExprKind::Ge(a, b) => ExprKind::Ge(rewrite_operand(arena, a), rewrite_operand(arena, b)),
        ExprKind::Gt(a, b) => ExprKind::Gt(rewrite_operand(arena, a), rewrite_operand(arena, b)),
        other => other,
    }
}

/// Rule 3: a non-symmetric relational operator has two equivalent
/// phrasings (`lt(y,x)` and `gt(x,y)` both say `x` is bigger); unify
/// them by swapping children and inverting the operator to its
/// arithmetic inverse whenever that inverse is the canonically smaller
/// operator. `NodeOperator::canonize` decides this by comparing
/// `arithmeticInversion(type)`'s position in the `Expr` enum against
/// `type`'s own: `gt`'s inverse `lt` always sorts earlier, and `ge`'s
/// inverse `le` always sorts earlier, so this rule always fires for
/// `gt`/`ge` and never for `lt`/`le` — the net effect is that only
/// `lt`/`le` ever survive canonicalisation.
fn invert_non_symmetric_relational(kind: ExprKind) -> ExprKind {
    if !kind.is_non_symmetric_relational() {
        return kind;
    }
    match (kind, kind.arithmetic_invert()) {
        (ExprKind::Gt(a, b), ExprKind::Lt(..)) => ExprKind::Lt(b, a),
        (ExprKind::Ge(a, b), ExprKind::Le(..)) => ExprKind::Le(b, a),
        _ => kind,
    }
}

fn sort_symmetric(arena: &mut ExprArena, resolve: &dyn Fn(Name) -> String, kind: ExprKind) -> ExprKind {
    if !kind.is_symmetric() {
        return kind;
    }
    let list = match kind {
        ExprKind::Add(l)
        | ExprKind::Mul(l)
        | ExprKind::Min(l)
        | ExprKind::Max(l)
        | ExprKind::Ne(l)
        | ExprKind::Eq(l)
        | ExprKind::Set(l)
        | ExprKind::And(l)
        | ExprKind::Or(l)
        | ExprKind::Xor(l)
        | ExprKind::Iff(l)
        | ExprKind::Union(l)
        | ExprKind::Inter(l)
        | ExprKind::Djoint(l) => l,
        _ => return kind,
    };
    let mut children = arena.list(list).to_vec();
    children.sort_by(|&a, &b| compare_nodes(arena, resolve, a, b));
    let sorted = arena.push_list(&children);
    rewrap(kind, sorted)
}

fn rewrap(kind: ExprKind, list: xcsp3_ir::ExprListId) -> ExprKind {
    match kind {
        ExprKind::Add(_) => ExprKind::Add(list),
        ExprKind::Mul(_) => ExprKind::Mul(list),
        ExprKind::Min(_) => ExprKind::Min(list),
        ExprKind::Max(_) => ExprKind::Max(list),
        ExprKind::Ne(_) => ExprKind::Ne(list),
        ExprKind::Eq(_) => ExprKind::Eq(list),
        ExprKind::Set(_) => ExprKind::Set(list),
        ExprKind::And(_) => ExprKind::And(list),
        ExprKind::Or(_) => ExprKind::Or(list),
        ExprKind::Xor(_) => ExprKind::Xor(list),
        ExprKind::Iff(_) => ExprKind::Iff(list),
        ExprKind::Union(_) => ExprKind::Union(list),
        ExprKind::Inter(_) => ExprKind::Inter(list),
        ExprKind::Djoint(_) => ExprKind::Djoint(list),
        other => other,
    }
}

/// `add(add(a,b),c)` becomes `add(a,b,c)`; same for the other
/// associative symmetric operators, but not `eq`/`dist`/`djoint`,
/// which are symmetric without being associative in a way that
/// flattening would preserve meaning.
fn flatten_associative(arena: &mut ExprArena, kind: ExprKind) -> ExprKind {
    let (list, ctor): (xcsp3_ir::ExprListId, fn(xcsp3_ir::ExprListId) -> ExprKind) = match kind {
        ExprKind::Add(l) => (l, ExprKind::Add),
        ExprKind::Mul(l) => (l, ExprKind::Mul),
        ExprKind::Min(l) => (l, ExprKind::Min),
        ExprKind::Max(l) => (l, ExprKind::Max),
        ExprKind::And(l) => (l, ExprKind::And),
        ExprKind::Or(l) => (l, ExprKind::Or),
        _ => return kind,
    };
    let same_op = |k: ExprKind| std::mem::discriminant(&k) == std::mem::discriminant(&kind);
    let children = arena.list(list).to_vec();
    if !children.iter().any(|&c| same_op(arena.get(c))) {
        return kind;
    }
    let mut flat = Vec::with_capacity(children.len());
    for c in children {
        if same_op(arena.get(c)) {
            if let Some(inner) = inner_list(arena.get(c)) {
                flat.extend_from_slice(arena.list(inner));
                continue;
            }
        }
        flat.push(c);
    }
    ctor(arena.push_list(&flat))
}

fn inner_list(kind: ExprKind) -> Option<xcsp3_ir::ExprListId> {
    match kind {
        ExprKind::Add(l) | ExprKind::Mul(l) | ExprKind::Min(l) | ExprKind::Max(l)
        | ExprKind::And(l) | ExprKind::Or(l) => Some(l),
        _ => None,
    }
}

/// A single-child symmetric n-ary node (`add(x)`, `and(x)`, ...)
/// degenerates to its child.
fn collapse_unary_wrapper(arena: &ExprArena, kind: ExprKind) -> ExprKind {
    let list = match kind {
        ExprKind::Add(l)
        | ExprKind::Mul(l)
        | ExprKind::Min(l)
        | ExprKind::Max(l)
        | ExprKind::Eq(l)
        | ExprKind::And(l)
        | ExprKind::Or(l)
        | ExprKind::Xor(l)
        | ExprKind::Iff(l) => l,
        _ => return kind,
    };
    let children = arena.list(list);
    if children.len() == 1 {
        return arena.get(children[0]);
    }
    kind
}

fn as_long(arena: &ExprArena, id: ExprId) -> Option<i64> {
    match arena.get(id) {
        ExprKind::Long(v) => Some(v),
        _ => None,
    }
}

/// Folds an `add`/`mul` whose children are all integer constants into
/// a single `Long`.
fn fold_constants(arena: &mut ExprArena, kind: ExprKind) -> ExprKind {
    match kind {
        ExprKind::Add(l) => {
            let children = arena.list(l).to_vec();
            if let Some(values) = children.iter().map(|&c| as_long(arena, c)).collect::<Option<Vec<_>>>() {
                return ExprKind::Long(values.into_iter().sum());
            }
            kind
        }
        ExprKind::Mul(l) => {
            let children = arena.list(l).to_vec();
            if let Some(values) = children.iter().map(|&c| as_long(arena, c)).collect::<Option<Vec<_>>>() {
                return ExprKind::Long(values.into_iter().product());
            }
            kind
        }
        _ => kind,
    }
}

/// `lt(x,k)` -> `le(x,k-1)`; `lt(k,x)` -> `le(k+1,x)`; symmetrically
/// `gt(x,k)` -> `ge(x,k+1)` and `gt(k,x)` -> `ge(k-1,x)`. Only fires
/// when one side is a constant — `lt`/`gt` between two variables is
/// left alone (rule 3, `invert_non_symmetric_relational`, already
/// picked a single canonical phrasing for that case).
fn normalize_lt_gt(arena: &mut ExprArena, kind: ExprKind) -> ExprKind {
    match kind {
        ExprKind::Lt(a, b) => {
            if let Some(k) = as_long(arena, b) {
                let new_b = arena.insert(ExprKind::Long(k - 1));
                return ExprKind::Le(a, new_b);
            }
            if let Some(k) = as_long(arena, a) {
                let new_a = arena.insert(ExprKind::Long(k + 1));
                return ExprKind::Le(new_a, b);
            }
            kind
        }
        ExprKind::Gt(a, b) => {
            if let Some(k) = as_long(arena, b) {
                let new_b = arena.insert(ExprKind::Long(k + 1));
                return ExprKind::Ge(a, new_b);
            }
            if let Some(k) = as_long(arena, a) {
                let new_a = arena.insert(ExprKind::Long(k - 1));
                return ExprKind::Ge(new_a, b);
            }
            kind
        }
        other => other,
    }
}

/// `R(add(x, c1), c2)` becomes `R(x, c2 - c1)` when the left side is a
/// two-term sum with exactly one constant term; keeps sums out of the
/// primitive-recognition shapes the dispatcher matches against.
fn absorb_additive_constant(arena: &mut ExprArena, kind: ExprKind) -> ExprKind {
    let simplify = |arena: &mut ExprArena, a: ExprId, b: ExprId| -> Option<(ExprId, ExprId)> {
        if let ExprKind::Add(l) = arena.get(a) {
            let children = arena.list(l).to_vec();
            if children.len() == 2 {
                let (x, c) = (children[0], children[1]);
                if let (None, Some(c1)) = (as_long(arena, x), as_long(arena, c)) {
                    if let Some(c2) = as_long(arena, b) {
                        let new_b = arena.insert(ExprKind::Long(c2 - c1));
                        return Some((x, new_b));
                    }
                }
            }
        }
        None
    };
    match kind {
        ExprKind::Le(a, b) => simplify(arena, a, b).map_or(kind, |(x, y)| ExprKind::Le(x, y)),
        ExprKind::Ge(a, b) => simplify(arena, a, b).map_or(kind, |(x, y)| ExprKind::Ge(x, y)),
        other => other,
    }
}

/// `eq(mul(x,c), k)` becomes `eq(x, k/c)` when `k` is divisible by
/// `c`, and the constant `0` (unsatisfiable) otherwise.
fn fold_eq_of_mul(arena: &mut ExprArena, kind: ExprKind) -> ExprKind {
    if let ExprKind::Eq(l) = kind {
        let children = arena.list(l).to_vec();
        if children.len() == 2 {
            let (p, q) = (children[0], children[1]);
            if let Some((x, c, k)) = mul_const_and_const(arena, p, q) {
                if c != 0 && k % c == 0 {
                    let new_x = x;
                    let new_k = arena.insert(ExprKind::Long(k / c));
                    let list = arena.push_list(&[new_x, new_k]);
                    return ExprKind::Eq(list);
                }
                return ExprKind::Long(0);
            }
        }
    }
    kind
}

fn mul_const_and_const(arena: &ExprArena, p: ExprId, q: ExprId) -> Option<(ExprId, i64, i64)> {
    if let (ExprKind::Mul(l), Some(k)) = (arena.get(p), as_long(arena, q)) {
        let children = arena.list(l).to_vec();
        if children.len() == 2 {
            if let Some(c) = as_long(arena, children[1]) {
                return Some((children[0], c, k));
            }
            if let Some(c) = as_long(arena, children[0]) {
                return Some((children[1], c, k));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xcsp3_ir::NameInterner;

    fn setup() -> (ExprArena, NameInterner) {
        (ExprArena::new(), NameInterner::new())
    }

    #[test]
    fn canonicalisation_is_idempotent() {
        let (mut arena, mut names) = setup();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let k = arena.insert(ExprKind::Long(5));
        let tree = arena.insert(ExprKind::Lt(x, k));
        let resolve = |n: Name| names.resolve(n).to_string();
        let once = canonize(&mut arena, &resolve, tree);
        let twice = canonize(&mut arena, &resolve, once);
        assert_eq!(once, twice);
    }

    #[test]
    fn lt_becomes_le() {
        let (mut arena, mut names) = setup();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let k = arena.insert(ExprKind::Long(5));
        let tree = arena.insert(ExprKind::Lt(x, k));
        let resolve = |n: Name| names.resolve(n).to_string();
        let canon = canonize(&mut arena, &resolve, tree);
        match arena.get(canon) {
            ExprKind::Le(_, b) => assert_eq!(arena.get(b), ExprKind::Long(4)),
            other => panic!("expected Le, got {other:?}"),
        }
    }

    #[test]
    fn var_vs_var_lt_gt_phrasings_unify() {
        let (mut arena, mut names) = setup();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let y = arena.insert(ExprKind::Var(names.intern("y")));
        let resolve = |n: Name| names.resolve(n).to_string();

        let gt_xy = arena.insert(ExprKind::Gt(x, y));
        let canon_gt = canonize(&mut arena, &resolve, gt_xy);

        let lt_yx = arena.insert(ExprKind::Lt(y, x));
        let canon_lt = canonize(&mut arena, &resolve, lt_yx);

        assert_eq!(canon_gt, canon_lt);
        match arena.get(canon_gt) {
            ExprKind::Lt(a, b) => {
                assert_eq!(arena.get(a), ExprKind::Var(names.intern("y")));
                assert_eq!(arena.get(b), ExprKind::Var(names.intern("x")));
            }
            other => panic!("expected Lt, got {other:?}"),
        }
    }

    #[test]
    fn ge_becomes_le_with_swapped_operands() {
        let (mut arena, mut names) = setup();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let y = arena.insert(ExprKind::Var(names.intern("y")));
        let tree = arena.insert(ExprKind::Ge(x, y));
        let resolve = |n: Name| names.resolve(n).to_string();
        let canon = canonize(&mut arena, &resolve, tree);
        match arena.get(canon) {
            ExprKind::Le(a, b) => {
                assert_eq!(arena.get(a), ExprKind::Var(names.intern("y")));
                assert_eq!(arena.get(b), ExprKind::Var(names.intern("x")));
            }
            other => panic!("expected Le, got {other:?}"),
        }
    }

    #[test]
    fn abs_of_sub_becomes_dist() {
        let (mut arena, mut names) = setup();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let y = arena.insert(ExprKind::Var(names.intern("y")));
        let sub = arena.insert(ExprKind::Sub(x, y));
        let tree = arena.insert(ExprKind::Abs(sub));
        let resolve = |n: Name| names.resolve(n).to_string();
        let canon = canonize(&mut arena, &resolve, tree);
        assert!(matches!(arena.get(canon), ExprKind::Dist(..)));
    }

    #[test]
    fn symmetric_children_are_sorted_by_name() {
        let (mut arena, mut names) = setup();
        let y = arena.insert(ExprKind::Var(names.intern("y")));
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        let list = arena.push_list(&[y, x]);
        let tree = arena.insert(ExprKind::Add(list));
        let resolve = |n: Name| names.resolve(n).to_string();
        let canon = canonize(&mut arena, &resolve, tree);
        if let ExprKind::Add(l) = arena.get(canon) {
            let children = arena.list(l);
            assert_eq!(arena.get(children[0]), ExprKind::Var(names.intern("x")));
        } else {
            panic!("expected Add");
        }
    }
}
