//! Bottom-up evaluation of canonicalised expression trees.
//!
//! Mirrors the per-node `evaluate()` bodies in the original
//! `XCSP3TreeNode.h`: every node reduces to a single `i64`, booleans
//! are `0`/`1`, and a handful of Open Questions the distilled
//! specification left unresolved are settled here exactly the way the
//! original's C++ bodies settle them (see `SPEC_FULL.md` and
//! `DESIGN.md`).

use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{ExprArena, ExprId, ExprKind, Name};

fn b(v: bool) -> i64 {
    i64::from(v)
}

/// Evaluates the subtree rooted at `id` against a variable binding.
/// `binding` is consulted once per `Var` leaf encountered; it is the
/// caller's job to supply every variable the tree actually mentions.
pub fn evaluate(arena: &ExprArena, binding: &dyn Fn(Name) -> Option<i64>, id: ExprId) -> Result<i64> {
    let go = |id: ExprId| evaluate(arena, binding, id);
    match arena.get(id) {
        ExprKind::Var(name) => binding(name).ok_or_else(|| ParseError::UnknownVariable {
            name: format!("{name:?}"),
        }),
        ExprKind::Long(v) => Ok(v),
        ExprKind::Decimal(int_part, frac_part) => Ok(int_part * 10i64.pow(decimal_digits(frac_part)) + frac_part),
        ExprKind::Symbol(_) => Err(ParseError::ExpressionSyntaxError {
            message: "a symbolic constant cannot be numerically evaluated".to_string(),
        }),
        ExprKind::Param(index) => Err(ParseError::UnresolvedParameter { index }),

        ExprKind::Neg(a) => Ok(-go(a)?),
        ExprKind::Abs(a) => Ok(go(a)?.abs()),
        ExprKind::Sqr(a) => {
            let v = go(a)?;
            Ok(v * v)
        }
        ExprKind::Not(a) => Ok(b(go(a)? == 0)),
        ExprKind::Sqrt(a) => Ok((go(a)? as f64).sqrt() as i64),
        ExprKind::Exp(a) => Ok((go(a)? as f64).exp() as i64),
        ExprKind::Ln(a) => Ok((go(a)? as f64).ln() as i64),
        ExprKind::Sin(a) => Ok((go(a)? as f64).sin() as i64),
        ExprKind::Cos(a) => Ok((go(a)? as f64).cos() as i64),
        ExprKind::Tan(a) => Ok((go(a)? as f64).tan() as i64),
        ExprKind::Asin(a) => Ok((go(a)? as f64).asin() as i64),
        ExprKind::Acos(a) => Ok((go(a)? as f64).acos() as i64),
        ExprKind::Atan(a) => Ok((go(a)? as f64).atan() as i64),
        ExprKind::Sinh(a) => Ok((go(a)? as f64).sinh() as i64),
        ExprKind::Cosh(a) => Ok((go(a)? as f64).cosh() as i64),
        ExprKind::Tanh(a) => Ok((go(a)? as f64).tanh() as i64),
        ExprKind::Card(a) | ExprKind::Hull(a) | ExprKind::Convex(a) => go(a),

        ExprKind::Lt(a, b_) => Ok(b(go(a)? < go(b_)?)),
        ExprKind::Le(a, b_) => Ok(b(go(a)? <= go(b_)?)),
        ExprKind::Ge(a, b_) => Ok(b(go(a)? >= go(b_)?)),
        ExprKind::Gt(a, b_) => Ok(b(go(a)? > go(b_)?)),
        ExprKind::Sub(a, b_) => Ok(go(a)? - go(b_)?),
        ExprKind::Div(a, b_) => {
            let (x, y) = (go(a)?, go(b_)?);
            checked_div(x, y)
        }
        ExprKind::Mod(a, b_) => {
            let (x, y) = (go(a)?, go(b_)?);
            checked_rem(x, y)
        }
        ExprKind::Pow(a, b_) => {
            let (x, y) = (go(a)?, go(b_)?);
            Ok(i64::try_from((x as f64).powf(y as f64) as i128).unwrap_or(i64::MAX))
        }
        ExprKind::Dist(a, b_) => Ok((go(a)? - go(b_)?).abs()),
        ExprKind::FDiv(a, b_) => {
            let (x, y) = (go(a)? as f64, go(b_)? as f64);
            Ok((x / y) as i64)
        }
        ExprKind::FMod(a, b_) => {
            let (x, y) = (go(a)? as f64, go(b_)? as f64);
            Ok((x % y) as i64)
        }
        ExprKind::NRoot(a, b_) => {
            let (x, n) = (go(a)? as f64, go(b_)? as f64);
            Ok(x.powf(1.0 / n) as i64)
        }
        ExprKind::Log(a, b_) => {
            let (x, base) = (go(a)? as f64, go(b_)? as f64);
            Ok((x.ln() / base.ln()) as i64)
        }
        ExprKind::Imp(a, b_) => Ok(b(go(a)? == 0 || go(b_)? != 0)),
        ExprKind::In(..) | ExprKind::NotIn(..) => Err(ParseError::ExpressionSyntaxError {
            message: "set membership requires a set-aware evaluator, not scalar evaluate()"
                .to_string(),
        }),
        ExprKind::Subset(..) | ExprKind::Subseq(..) | ExprKind::Supseq(..) | ExprKind::Supset(..) => {
            Err(ParseError::ExpressionSyntaxError {
                message: "set relations are not scalar-evaluable".to_string(),
            })
        }
        ExprKind::Diff(..) | ExprKind::Sdiff(..) => Err(ParseError::ExpressionSyntaxError {
            message: "set operators are not scalar-evaluable".to_string(),
        }),

        // Zero condition -> the third (else) child; any non-zero
        // condition -> the second (then) child. Taken directly from
        // `NodeIf::evaluate()`, not "only 1 is true".
        ExprKind::If(cond, then, else_) => {
            if go(cond)? == 0 {
                go(else_)
            } else {
                go(then)
            }
        }

        ExprKind::Add(l) => arena.list(l).iter().try_fold(0i64, |acc, &c| Ok(acc + go(c)?)),
        ExprKind::Mul(l) => arena.list(l).iter().try_fold(1i64, |acc, &c| Ok(acc * go(c)?)),
        ExprKind::Min(l) => fold_nonempty(arena, binding, l, i64::min),
        ExprKind::Max(l) => fold_nonempty(arena, binding, l, i64::max),
        ExprKind::Eq(l) => all_equal(arena, binding, l),
        ExprKind::Ne(l) => all_equal(arena, binding, l).map(|eq| b(eq == 0)),
        ExprKind::And(l) => arena
            .list(l)
            .iter()
            .try_fold(true, |acc, &c| Ok(acc && go(c)? != 0))
            .map(b),
        ExprKind::Or(l) => arena
            .list(l)
            .iter()
            .try_fold(false, |acc, &c| Ok(acc || go(c)? != 0))
            .map(b),
        ExprKind::Xor(l) => arena
            .list(l)
            .iter()
            .try_fold(false, |acc, &c| Ok(acc ^ (go(c)? != 0)))
            .map(b),
        ExprKind::Iff(l) => {
            let values: Result<Vec<bool>> = arena.list(l).iter().map(|&c| go(c).map(|v| v != 0)).collect();
            let values = values?;
            Ok(b(values.windows(2).all(|w| w[0] == w[1])))
        }
        ExprKind::Set(_) | ExprKind::Union(_) | ExprKind::Inter(_) | ExprKind::Djoint(_) => {
            Err(ParseError::ExpressionSyntaxError {
                message: "set-valued expressions are not scalar-evaluable".to_string(),
            })
        }
        ExprKind::FakeOp(_) => Err(ParseError::ExpressionSyntaxError {
            message: "FAKEOP is a pattern-matching wildcard, not an evaluable node".to_string(),
        }),
    }
}

fn decimal_digits(mut frac: i64) -> u32 {
    if frac == 0 {
        return 0;
    }
    let mut digits = 0;
    while frac != 0 {
        frac /= 10;
        digits += 1;
    }
    digits
}

/// Truncating division, matching C++'s native `/` on integers (the
/// Open Question resolution: truncate toward zero, not floor).
fn checked_div(x: i64, y: i64) -> Result<i64> {
    if y == 0 {
        return Err(ParseError::ExpressionSyntaxError {
            message: "division by zero".to_string(),
        });
    }
    Ok(x / y)
}

/// Truncating remainder, matching C++'s native `%` (sign follows the
/// dividend).
fn checked_rem(x: i64, y: i64) -> Result<i64> {
    if y == 0 {
        return Err(ParseError::ExpressionSyntaxError {
            message: "modulo by zero".to_string(),
        });
    }
    Ok(x % y)
}

fn fold_nonempty(
    arena: &ExprArena,
    binding: &dyn Fn(Name) -> Option<i64>,
    list: xcsp3_ir::ExprListId,
    combine: fn(i64, i64) -> i64,
) -> Result<i64> {
    let children = arena.list(list);
    let mut iter = children.iter();
    let first = *iter.next().ok_or_else(|| ParseError::ExpressionSyntaxError {
        message: "min/max requires at least one operand".to_string(),
    })?;
    iter.try_fold(evaluate(arena, binding, first)?, |acc, &c| {
        Ok(combine(acc, evaluate(arena, binding, c)?))
    })
}

fn all_equal(arena: &ExprArena, binding: &dyn Fn(Name) -> Option<i64>, list: xcsp3_ir::ExprListId) -> Result<i64> {
    let children = arena.list(list);
    let values: Result<Vec<i64>> = children.iter().map(|&c| evaluate(arena, binding, c)).collect();
    let values = values?;
    Ok(b(values.windows(2).all(|w| w[0] == w[1])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsp3_ir::NameInterner;

    #[test]
    fn if_zero_condition_takes_else_branch() {
        let mut arena = ExprArena::new();
        let cond = arena.insert(ExprKind::Long(0));
        let then = arena.insert(ExprKind::Long(11));
        let else_ = arena.insert(ExprKind::Long(22));
        let tree = arena.insert(ExprKind::If(cond, then, else_));
        let result = evaluate(&arena, &|_| None, tree).unwrap();
        assert_eq!(result, 22);
    }

    #[test]
    fn if_nonzero_condition_takes_then_branch() {
        let mut arena = ExprArena::new();
        let cond = arena.insert(ExprKind::Long(-3));
        let then = arena.insert(ExprKind::Long(11));
        let else_ = arena.insert(ExprKind::Long(22));
        let tree = arena.insert(ExprKind::If(cond, then, else_));
        let result = evaluate(&arena, &|_| None, tree).unwrap();
        assert_eq!(result, 11);
    }

    #[test]
    fn division_truncates_toward_zero() {
        let mut arena = ExprArena::new();
        let a = arena.insert(ExprKind::Long(-7));
        let c = arena.insert(ExprKind::Long(2));
        let tree = arena.insert(ExprKind::Div(a, c));
        assert_eq!(evaluate(&arena, &|_| None, tree).unwrap(), -3);
    }

    #[test]
    fn unbound_variable_is_an_error() {
        let mut arena = ExprArena::new();
        let mut names = NameInterner::new();
        let x = arena.insert(ExprKind::Var(names.intern("x")));
        assert!(evaluate(&arena, &|_| None, x).is_err());
    }
}
