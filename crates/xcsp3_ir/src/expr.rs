//! The expression tree node kinds, mirroring the `Expr` enum and the
//! `Node`/`NodeUnary`/`NodeBinary`/`NodeNAry` hierarchy of the original
//! `XCSP3TreeNode.h`.

use crate::arena::{ExprId, ExprListId};
use crate::name::Name;

/// `STAR`, the "don't care" sentinel used by extension constraints and
/// by short tuples, promoted to `i64` for the wider evaluation width.
pub const STAR: i64 = i32::MAX as i64;

/// A single node in an expression arena.
///
/// Leaves carry their payload inline; every other node stores
/// [`ExprId`] indices into the owning [`crate::arena::ExprArena`] rather
/// than boxing children, so the whole tree lives in one contiguous
/// allocation per instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    // --- leaves -----------------------------------------------------
    Var(Name),
    Long(i64),
    Decimal(i64, i64), // integral and fractional parts, kept exact
    Symbol(Name),
    /// A group/slide template placeholder, `%k`.
    Param(u32),

    // --- unary --------------------------------------------------------
    Neg(ExprId),
    Abs(ExprId),
    Sqr(ExprId),
    Not(ExprId),
    Sqrt(ExprId),
    Exp(ExprId),
    Ln(ExprId),
    Sin(ExprId),
    Cos(ExprId),
    Tan(ExprId),
    Asin(ExprId),
    Acos(ExprId),
    Atan(ExprId),
    Sinh(ExprId),
    Cosh(ExprId),
    Tanh(ExprId),
    Card(ExprId),
    Hull(ExprId),
    Convex(ExprId),

    // --- binary, non-symmetric relational (can be swapped+inverted) --
    Lt(ExprId, ExprId),
    Le(ExprId, ExprId),
    Ge(ExprId, ExprId),
    Gt(ExprId, ExprId),

    // --- binary, arithmetic ------------------------------------------
    Sub(ExprId, ExprId),
    Div(ExprId, ExprId),
    Mod(ExprId, ExprId),
    Pow(ExprId, ExprId),
    Dist(ExprId, ExprId),
    FDiv(ExprId, ExprId),
    FMod(ExprId, ExprId),
    NRoot(ExprId, ExprId),
    Log(ExprId, ExprId),

    // --- binary, logical/set-relational -------------------------------
    Imp(ExprId, ExprId),
    In(ExprId, ExprId),
    NotIn(ExprId, ExprId),
    Subset(ExprId, ExprId),
    Subseq(ExprId, ExprId),
    Supseq(ExprId, ExprId),
    Supset(ExprId, ExprId),
    Diff(ExprId, ExprId),
    Sdiff(ExprId, ExprId),

    // --- ternary -------------------------------------------------------
    If(ExprId, ExprId, ExprId),

    // --- n-ary, symmetric ----------------------------------------------
    Add(ExprListId),
    Mul(ExprListId),
    Min(ExprListId),
    Max(ExprListId),
    Eq(ExprListId),
    Ne(ExprListId),
    And(ExprListId),
    Or(ExprListId),
    Xor(ExprListId),
    Iff(ExprListId),
    Set(ExprListId),
    Union(ExprListId),
    Inter(ExprListId),
    Djoint(ExprListId),

    /// A wildcard operator used only inside pattern trees (§4.2.4);
    /// never appears in a parsed or canonicalised instance tree.
    FakeOp(ExprListId),
}

impl ExprKind {
    /// True for the operators `canonize()` is allowed to reorder its
    /// children of, matching `isSymmetricOperator` in the original.
    #[must_use]
    pub fn is_symmetric(self) -> bool {
        matches!(
            self,
            ExprKind::Add(_)
                | ExprKind::Mul(_)
                | ExprKind::Min(_)
                | ExprKind::Max(_)
                | ExprKind::Dist(..)
                | ExprKind::Ne(_)
                | ExprKind::Eq(_)
                | ExprKind::Set(_)
                | ExprKind::And(_)
                | ExprKind::Or(_)
                | ExprKind::Xor(_)
                | ExprKind::Iff(_)
                | ExprKind::Union(_)
                | ExprKind::Inter(_)
                | ExprKind::Djoint(_)
        )
    }

    /// True for `<`, `<=`, `>=`, `>`: swapping operands requires
    /// inverting the operator, matching `isNonSymmetricRelationalOperator`.
    #[must_use]
    pub fn is_non_symmetric_relational(self) -> bool {
        matches!(
            self,
            ExprKind::Lt(..) | ExprKind::Le(..) | ExprKind::Ge(..) | ExprKind::Gt(..)
        )
    }

    /// `<` <-> `>`, `<=` <-> `>=`; every other operator is returned
    /// unchanged. Mirrors `arithmeticInversion`.
    #[must_use]
    pub fn arithmetic_invert(self) -> Self {
        match self {
            ExprKind::Lt(a, b) => ExprKind::Gt(a, b),
            ExprKind::Gt(a, b) => ExprKind::Lt(a, b),
            ExprKind::Le(a, b) => ExprKind::Ge(a, b),
            ExprKind::Ge(a, b) => ExprKind::Le(a, b),
            other => other,
        }
    }
}
