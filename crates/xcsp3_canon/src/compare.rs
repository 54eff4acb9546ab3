//! Total order over expression nodes used to sort the children of
//! symmetric operators into a canonical order. Mirrors `compareNodes`/
//! `equalNodes` in the original `XCSP3TreeNode.cc`: constants compare
//! by value, variables compare by name, operators compare by arity and
//! then recursively by their (already-sorted) children.

use std::cmp::Ordering;
use xcsp3_ir::{ExprArena, ExprId, ExprKind, Name};

/// Node categories, ordered the way the original's `Expr` enum orders
/// them (`VAR` < `LONG` < `DECIMAL`): leaves before operators,
/// variables before constants.
fn rank(kind: ExprKind) -> u8 {
    match kind {
        ExprKind::Var(_) => 0,
        ExprKind::Symbol(_) => 1,
        ExprKind::Param(_) => 2,
        ExprKind::Long(_) => 3,
        ExprKind::Decimal(..) => 4,
        _ => 5,
    }
}

/// Compares two nodes for canonical sort order. `resolve` maps a
/// [`Name`] back to its source string so variable ordering matches
/// lexical identifier order, independent of interning order.
pub fn compare_nodes(
    arena: &ExprArena,
    resolve: &dyn Fn(Name) -> String,
    a: ExprId,
    b: ExprId,
) -> Ordering {
    let ka = arena.get(a);
    let kb = arena.get(b);
    let (ra, rb) = (rank(ka), rank(kb));
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (ka, kb) {
        (ExprKind::Long(x), ExprKind::Long(y)) => x.cmp(&y),
        (ExprKind::Decimal(xi, xf), ExprKind::Decimal(yi, yf)) => (xi, xf).cmp(&(yi, yf)),
        (ExprKind::Var(x), ExprKind::Var(y)) | (ExprKind::Symbol(x), ExprKind::Symbol(y)) => {
            resolve(x).cmp(&resolve(y))
        }
        (ExprKind::Param(x), ExprKind::Param(y)) => x.cmp(&y),
        _ => compare_operators(arena, resolve, a, b),
    }
}

/// Every immediate child of `id`, in the order the node itself stores
/// them. Leaves return an empty vector.
#[must_use]
pub fn children_of(arena: &ExprArena, id: ExprId) -> Vec<ExprId> {
    match arena.get(id) {
        ExprKind::Neg(c)
        | ExprKind::Abs(c)
        | ExprKind::Sqr(c)
        | ExprKind::Not(c)
        | ExprKind::Sqrt(c)
        | ExprKind::Exp(c)
        | ExprKind::Ln(c)
        | ExprKind::Sin(c)
        | ExprKind::Cos(c)
        | ExprKind::Tan(c)
        | ExprKind::Asin(c)
        | ExprKind::Acos(c)
        | ExprKind::Atan(c)
        | ExprKind::Sinh(c)
        | ExprKind::Cosh(c)
        | ExprKind::Tanh(c)
        | ExprKind::Card(c)
        | ExprKind::Hull(c)
        | ExprKind::Convex(c) => vec![c],
        ExprKind::Lt(a, b)
        | ExprKind::Le(a, b)
        | ExprKind::Ge(a, b)
        | ExprKind::Gt(a, b)
        | ExprKind::Sub(a, b)
        | ExprKind::Div(a, b)
        | ExprKind::Mod(a, b)
        | ExprKind::Pow(a, b)
        | ExprKind::Dist(a, b)
        | ExprKind::FDiv(a, b)
        | ExprKind::FMod(a, b)
        | ExprKind::NRoot(a, b)
        | ExprKind::Log(a, b)
        | ExprKind::Imp(a, b)
        | ExprKind::In(a, b)
        | ExprKind::NotIn(a, b)
        | ExprKind::Subset(a, b)
        | ExprKind::Subseq(a, b)
        | ExprKind::Supseq(a, b)
        | ExprKind::Supset(a, b)
        | ExprKind::Diff(a, b)
        | ExprKind::Sdiff(a, b) => vec![a, b],
        ExprKind::If(a, b, c) => vec![a, b, c],
        ExprKind::Add(l)
        | ExprKind::Mul(l)
        | ExprKind::Min(l)
        | ExprKind::Max(l)
        | ExprKind::Eq(l)
        | ExprKind::Ne(l)
        | ExprKind::And(l)
        | ExprKind::Or(l)
        | ExprKind::Xor(l)
        | ExprKind::Iff(l)
        | ExprKind::Set(l)
        | ExprKind::Union(l)
        | ExprKind::Inter(l)
        | ExprKind::Djoint(l)
        | ExprKind::FakeOp(l) => arena.list(l).to_vec(),
        ExprKind::Var(_)
        | ExprKind::Long(_)
        | ExprKind::Decimal(..)
        | ExprKind::Symbol(_)
        | ExprKind::Param(_) => Vec::new(),
    }
}

/// A stable small key distinguishing operator kinds of equal arity;
/// only used to break ties, so any injective mapping will do.
fn operator_tag(kind: ExprKind) -> u32 {
    let label = format!("{kind:?}");
    let name = label.split(['(', ' ']).next().unwrap_or(&label);
    name.bytes()
        .fold(0u32, |acc, b| acc.wrapping_mul(131).wrapping_add(u32::from(b)))
}

fn compare_operators(
    arena: &ExprArena,
    resolve: &dyn Fn(Name) -> String,
    a: ExprId,
    b: ExprId,
) -> Ordering {
    let ca = children_of(arena, a);
    let cb = children_of(arena, b);
    if ca.len() != cb.len() {
        return ca.len().cmp(&cb.len());
    }
    let ta = operator_tag(arena.get(a));
    let tb = operator_tag(arena.get(b));
    if ta != tb {
        return ta.cmp(&tb);
    }
    for (&x, &y) in ca.iter().zip(cb.iter()) {
        let ord = compare_nodes(arena, resolve, x, y);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
