//! Group and slide meta-constraint unfolding.
//!
//! A `<group>` or `<slide>` element names one constraint template and
//! a set of argument rows (or, for `<slide>`, a base list to window
//! over); unfolding produces one concrete [`ConstraintKind`] per row,
//! each with every `%k` placeholder replaced by that row's k-th
//! argument. This mirrors `XConstraintGroup::unfoldParameters` in the
//! original, substituting directly over the already-parsed template
//! rather than re-parsing text per instantiation.

use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{
    placeholder_index, Condition, ConstraintKind, ExprArena, ExprId, ExprKind, GroupTemplate,
    Name, NameInterner, Objective, Operand, SlideTemplate,
};

/// Instantiates every row of a `<group>`'s argument table against its
/// template, returning one constraint per row in row order (§5's
/// ordering guarantee: unfolded constraints appear in argument-row
/// order, matching document order).
pub fn unfold_group(
    names: &NameInterner,
    arena: &mut ExprArena,
    group: &GroupTemplate,
) -> Result<Vec<ConstraintKind>> {
    group
        .arguments
        .iter()
        .enumerate()
        .map(|(row, args)| {
            tracing::trace!(group = %group.id, row, "instantiating group template");
            substitute_constraint(names, arena, &group.template, args)
        })
        .collect()
}

/// Instantiates every window a `<slide>` produces against its
/// template, in window order.
pub fn unfold_slide(
    names: &NameInterner,
    arena: &mut ExprArena,
    slide: &SlideTemplate,
) -> Result<Vec<ConstraintKind>> {
    slide
        .argument_rows()
        .iter()
        .enumerate()
        .map(|(window, args)| {
            tracing::trace!(slide = %slide.id, window, "instantiating slide template");
            substitute_constraint(names, arena, &slide.template, args)
        })
        .collect()
}

fn substitute_name(names: &NameInterner, args: &[Name], name: Name) -> Result<Name> {
    match placeholder_index(names.resolve(name)) {
        Some(index) => args
            .get(index as usize)
            .copied()
            .ok_or(ParseError::UnresolvedParameter { index }),
        None => Ok(name),
    }
}

fn substitute_names(names: &NameInterner, args: &[Name], list: &[Name]) -> Result<Vec<Name>> {
    list.iter().map(|&n| substitute_name(names, args, n)).collect()
}

fn substitute_name_lists(names: &NameInterner, args: &[Name], lists: &[Vec<Name>]) -> Result<Vec<Vec<Name>>> {
    lists.iter().map(|l| substitute_names(names, args, l)).collect()
}

fn substitute_operand(names: &NameInterner, args: &[Name], operand: &Operand) -> Result<Operand> {
    Ok(match operand {
        Operand::Variable(n) => Operand::Variable(substitute_name(names, args, *n)?),
        other => other.clone(),
    })
}

fn substitute_condition(names: &NameInterner, args: &[Name], cond: &Condition) -> Result<Condition> {
    Ok(Condition {
        order: cond.order,
        operand: substitute_operand(names, args, &cond.operand)?,
    })
}

/// Rebuilds an expression subtree with every `Param(k)` leaf replaced
/// by `args[k]` — a variable reference, or an integer constant when
/// the argument row's k-th token is itself a numeral (e.g. a group
/// template mixing `%0` as a variable slot and `%1` as a fixed bound).
pub fn substitute_expr(names: &NameInterner, arena: &mut ExprArena, args: &[Name], id: ExprId) -> Result<ExprId> {
    let kind = arena.get(id);
    let rebuilt = match kind {
        ExprKind::Param(index) => {
            let name = args
                .get(index as usize)
                .copied()
                .ok_or(ParseError::UnresolvedParameter { index })?;
            match names.resolve(name).parse::<i64>() {
                Ok(v) => ExprKind::Long(v),
                Err(_) => ExprKind::Var(name),
            }
        }
        ExprKind::Var(_)
        | ExprKind::Long(_)
        | ExprKind::Decimal(..)
        | ExprKind::Symbol(_) => kind,

        ExprKind::Neg(a) => ExprKind::Neg(substitute_expr(names, arena, args, a)?),
        ExprKind::Abs(a) => ExprKind::Abs(substitute_expr(names, arena, args, a)?),
        ExprKind::Sqr(a) => ExprKind::Sqr(substitute_expr(names, arena, args, a)?),
        ExprKind::Not(a) => ExprKind::Not(substitute_expr(names, arena, args, a)?),
        ExprKind::Sqrt(a) => ExprKind::Sqrt(substitute_expr(names, arena, args, a)?),
        ExprKind::Exp(a) => ExprKind::Exp(substitute_expr(names, arena, args, a)?),
        ExprKind::Ln(a) => ExprKind::Ln(substitute_expr(names, arena, args, a)?),
        ExprKind::Sin(a) => ExprKind::Sin(substitute_expr(names, arena, args, a)?),
        ExprKind::Cos(a) => ExprKind::Cos(substitute_expr(names, arena, args, a)?),
        ExprKind::Tan(a) => ExprKind::Tan(substitute_expr(names, arena, args, a)?),
        ExprKind::Asin(a) => ExprKind::Asin(substitute_expr(names, arena, args, a)?),
        ExprKind::Acos(a) => ExprKind::Acos(substitute_expr(names, arena, args, a)?),
        ExprKind::Atan(a) => ExprKind::Atan(substitute_expr(names, arena, args, a)?),
        ExprKind::Sinh(a) => ExprKind::Sinh(substitute_expr(names, arena, args, a)?),
        ExprKind::Cosh(a) => ExprKind::Cosh(substitute_expr(names, arena, args, a)?),
        ExprKind::Tanh(a) => ExprKind::Tanh(substitute_expr(names, arena, args, a)?),
        ExprKind::Card(a) => ExprKind::Card(substitute_expr(names, arena, args, a)?),
        ExprKind::Hull(a) => ExprKind::Hull(substitute_expr(names, arena, args, a)?),
        ExprKind::Convex(a) => ExprKind::Convex(substitute_expr(names, arena, args, a)?),

        ExprKind::Lt(a, b) => ExprKind::Lt(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Le(a, b) => ExprKind::Le(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Ge(a, b) => ExprKind::Ge(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Gt(a, b) => ExprKind::Gt(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Sub(a, b) => ExprKind::Sub(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Div(a, b) => ExprKind::Div(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Mod(a, b) => ExprKind::Mod(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Pow(a, b) => ExprKind::Pow(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Dist(a, b) => ExprKind::Dist(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::FDiv(a, b) => ExprKind::FDiv(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::FMod(a, b) => ExprKind::FMod(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::NRoot(a, b) => ExprKind::NRoot(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Log(a, b) => ExprKind::Log(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Imp(a, b) => ExprKind::Imp(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::In(a, b) => ExprKind::In(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::NotIn(a, b) => ExprKind::NotIn(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Subset(a, b) => ExprKind::Subset(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Subseq(a, b) => ExprKind::Subseq(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Supseq(a, b) => ExprKind::Supseq(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Supset(a, b) => ExprKind::Supset(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Diff(a, b) => ExprKind::Diff(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),
        ExprKind::Sdiff(a, b) => ExprKind::Sdiff(substitute_expr(names, arena, args, a)?, substitute_expr(names, arena, args, b)?),

        ExprKind::If(a, b, c) => ExprKind::If(
            substitute_expr(names, arena, args, a)?,
            substitute_expr(names, arena, args, b)?,
            substitute_expr(names, arena, args, c)?,
        ),

        ExprKind::Add(l) => substitute_list(names, arena, args, l, ExprKind::Add)?,
        ExprKind::Mul(l) => substitute_list(names, arena, args, l, ExprKind::Mul)?,
        ExprKind::Min(l) => substitute_list(names, arena, args, l, ExprKind::Min)?,
        ExprKind::Max(l) => substitute_list(names, arena, args, l, ExprKind::Max)?,
        ExprKind::Eq(l) => substitute_list(names, arena, args, l, ExprKind::Eq)?,
        ExprKind::Ne(l) => substitute_list(names, arena, args, l, ExprKind::Ne)?,
        ExprKind::And(l) => substitute_list(names, arena, args, l, ExprKind::And)?,
        ExprKind::Or(l) => substitute_list(names, arena, args, l, ExprKind::Or)?,
        ExprKind::Xor(l) => substitute_list(names, arena, args, l, ExprKind::Xor)?,
        ExprKind::Iff(l) => substitute_list(names, arena, args, l, ExprKind::Iff)?,
        ExprKind::Set(l) => substitute_list(names, arena, args, l, ExprKind::Set)?,
        ExprKind::Union(l) => substitute_list(names, arena, args, l, ExprKind::Union)?,
        ExprKind::Inter(l) => substitute_list(names, arena, args, l, ExprKind::Inter)?,
        ExprKind::Djoint(l) => substitute_list(names, arena, args, l, ExprKind::Djoint)?,
        ExprKind::FakeOp(l) => substitute_list(names, arena, args, l, ExprKind::FakeOp)?,
    };
    Ok(arena.insert(rebuilt))
}

fn substitute_list(
    names: &NameInterner,
    arena: &mut ExprArena,
    args: &[Name],
    list: xcsp3_ir::ExprListId,
    ctor: fn(xcsp3_ir::ExprListId) -> ExprKind,
) -> Result<ExprKind> {
    let children: Vec<ExprId> = arena.list(list).to_vec();
    let mut substituted = Vec::with_capacity(children.len());
    for c in children {
        substituted.push(substitute_expr(names, arena, args, c)?);
    }
    Ok(ctor(arena.push_list(&substituted)))
}

fn substitute_constraint(
    names: &NameInterner,
    arena: &mut ExprArena,
    template: &ConstraintKind,
    args: &[Name],
) -> Result<ConstraintKind> {
    let sn = |l: &[Name]| substitute_names(names, args, l);
    let snl = |l: &[Vec<Name>]| substitute_name_lists(names, args, l);
    Ok(match template {
        ConstraintKind::True => ConstraintKind::True,
        ConstraintKind::False => ConstraintKind::False,
        ConstraintKind::Extension { list, tuples, is_support } => ConstraintKind::Extension {
            list: sn(list)?,
            tuples: tuples.clone(),
            is_support: *is_support,
        },
        ConstraintKind::Intension { tree } => ConstraintKind::Intension {
            tree: substitute_expr(names, arena, args, *tree)?,
        },
        ConstraintKind::Primitive { tree } => ConstraintKind::Primitive {
            tree: substitute_expr(names, arena, args, *tree)?,
        },
        ConstraintKind::AllDifferent { list, except } => ConstraintKind::AllDifferent {
            list: sn(list)?,
            except: except.clone(),
        },
        ConstraintKind::AllDifferentMatrix { matrix } => ConstraintKind::AllDifferentMatrix {
            matrix: snl(matrix)?,
        },
        ConstraintKind::AllDifferentList { lists } => ConstraintKind::AllDifferentList { lists: snl(lists)? },
        ConstraintKind::AllEqual { list } => ConstraintKind::AllEqual { list: sn(list)? },
        ConstraintKind::NotAllEqual { list } => ConstraintKind::NotAllEqual { list: sn(list)? },
        ConstraintKind::Ordered { list, order, lengths } => ConstraintKind::Ordered {
            list: sn(list)?,
            order: *order,
            lengths: lengths.clone(),
        },
        ConstraintKind::Lex { lists, order } => ConstraintKind::Lex {
            lists: snl(lists)?,
            order: *order,
        },
        ConstraintKind::LexMatrix { matrix, order } => ConstraintKind::LexMatrix {
            matrix: snl(matrix)?,
            order: *order,
        },
        ConstraintKind::Sum { list, coeffs, condition } => ConstraintKind::Sum {
            list: sn(list)?,
            coeffs: coeffs.clone(),
            condition: substitute_condition(names, args, condition)?,
        },
        ConstraintKind::Count { list, values, condition } => ConstraintKind::Count {
            list: sn(list)?,
            values: values.clone(),
            condition: substitute_condition(names, args, condition)?,
        },
        ConstraintKind::NValues { list, except, condition } => ConstraintKind::NValues {
            list: sn(list)?,
            except: except.clone(),
            condition: substitute_condition(names, args, condition)?,
        },
        ConstraintKind::Cardinality {
            list,
            values,
            occurs_min,
            occurs_max,
            closed,
        } => ConstraintKind::Cardinality {
            list: sn(list)?,
            values: values.clone(),
            occurs_min: occurs_min.clone(),
            occurs_max: occurs_max.clone(),
            closed: *closed,
        },
        ConstraintKind::Maximum { list, condition, start_index, rank } => ConstraintKind::Maximum {
            list: sn(list)?,
            condition: condition
                .as_ref()
                .map(|c| substitute_condition(names, args, c))
                .transpose()?,
            start_index: *start_index,
            rank: *rank,
        },
        ConstraintKind::Minimum { list, condition, start_index, rank } => ConstraintKind::Minimum {
            list: sn(list)?,
            condition: condition
                .as_ref()
                .map(|c| substitute_condition(names, args, c))
                .transpose()?,
            start_index: *start_index,
            rank: *rank,
        },
        ConstraintKind::Element {
            list,
            index,
            start_index,
            rank,
            value,
        } => ConstraintKind::Element {
            list: sn(list)?,
            index: substitute_name(names, args, *index)?,
            start_index: *start_index,
            rank: *rank,
            value: substitute_operand(names, args, value)?,
        },
        ConstraintKind::ElementMatrix {
            matrix,
            row_index,
            col_index,
            start_row_index,
            start_col_index,
            value,
        } => ConstraintKind::ElementMatrix {
            matrix: snl(matrix)?,
            row_index: substitute_name(names, args, *row_index)?,
            col_index: substitute_name(names, args, *col_index)?,
            start_row_index: *start_row_index,
            start_col_index: *start_col_index,
            value: substitute_operand(names, args, value)?,
        },
        ConstraintKind::Channel { list, start_index, list2, start_index2 } => ConstraintKind::Channel {
            list: sn(list)?,
            start_index: *start_index,
            list2: list2.as_ref().map(|l| sn(l)).transpose()?,
            start_index2: *start_index2,
        },
        ConstraintKind::NoOverlap { origins, lengths, zero_ignored } => ConstraintKind::NoOverlap {
            origins: sn(origins)?,
            lengths: sn(lengths)?,
            zero_ignored: *zero_ignored,
        },
        ConstraintKind::Stretch {
            list,
            values,
            widths_min,
            widths_max,
            patterns,
        } => ConstraintKind::Stretch {
            list: sn(list)?,
            values: values.clone(),
            widths_min: widths_min.clone(),
            widths_max: widths_max.clone(),
            patterns: patterns.clone(),
        },
        ConstraintKind::Cumulative { origins, lengths, heights, condition } => ConstraintKind::Cumulative {
            origins: sn(origins)?,
            lengths: sn(lengths)?,
            heights: sn(heights)?,
            condition: substitute_condition(names, args, condition)?,
        },
        ConstraintKind::Instantiation { list, values } => ConstraintKind::Instantiation {
            list: sn(list)?,
            values: values.clone(),
        },
        ConstraintKind::Clause { positive, negative } => ConstraintKind::Clause {
            positive: sn(positive)?,
            negative: sn(negative)?,
        },
        ConstraintKind::Circuit { list, start_index, size } => ConstraintKind::Circuit {
            list: sn(list)?,
            start_index: *start_index,
            size: *size,
        },
        ConstraintKind::Regular { list, start, finals, transitions } => ConstraintKind::Regular {
            list: sn(list)?,
            start: start.clone(),
            finals: finals.clone(),
            transitions: transitions.clone(),
        },
        ConstraintKind::Mdd { list, transitions } => ConstraintKind::Mdd {
            list: sn(list)?,
            transitions: transitions.clone(),
        },
    })
}

/// Substitutes an objective's operand list and optional tree against a
/// resolved argument row. Objectives are not templated by `<group>`/
/// `<slide>` in the format, but share the same substitution machinery
/// so a future extension (or an `original_source`-style tool built on
/// this crate) can reuse it.
pub fn substitute_objective(
    names: &NameInterner,
    arena: &mut ExprArena,
    objective: &Objective,
    args: &[Name],
) -> Result<Objective> {
    Ok(Objective {
        goal: objective.goal,
        kind: objective.kind,
        list: substitute_names(names, args, &objective.list)?,
        coeffs: objective.coeffs.clone(),
        tree: objective
            .tree
            .map(|t| substitute_expr(names, arena, args, t))
            .transpose()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsp3_ir::{ExprKind, GroupTemplate};

    #[test]
    fn group_instantiation_substitutes_placeholders_in_order() {
        let mut names = NameInterner::new();
        let mut arena = ExprArena::new();
        let p0 = names.intern("%0");
        let p1 = names.intern("%1");
        let x1 = names.intern("x1");
        let x2 = names.intern("x2");
        let x3 = names.intern("x3");
        let x4 = names.intern("x4");

        let template = ConstraintKind::AllEqual { list: vec![p0, p1] };
        let group = GroupTemplate {
            id: "g".into(),
            classes: Vec::new(),
            template,
            arguments: vec![vec![x1, x2], vec![x3, x4]],
        };

        let rows = unfold_group(&names, &mut arena, &group).unwrap();
        assert_eq!(rows.len(), 2);
        match &rows[0] {
            ConstraintKind::AllEqual { list } => assert_eq!(list, &[x1, x2]),
            other => panic!("unexpected {other:?}"),
        }
        match &rows[1] {
            ConstraintKind::AllEqual { list } => assert_eq!(list, &[x3, x4]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn expression_template_substitutes_param_leaves() {
        let mut names = NameInterner::new();
        let mut arena = ExprArena::new();
        let x = names.intern("x5");
        let k = arena.insert(ExprKind::Long(3));
        let param = arena.insert(ExprKind::Param(0));
        let tree = arena.insert(ExprKind::Le(param, k));

        let substituted = substitute_expr(&names, &mut arena, &[x], tree).unwrap();
        match arena.get(substituted) {
            ExprKind::Le(a, _) => assert_eq!(arena.get(a), ExprKind::Var(x)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn numeral_argument_substitutes_as_a_constant() {
        let mut names = NameInterner::new();
        let mut arena = ExprArena::new();
        let x = names.intern("x");
        let one = names.intern("1");
        let p0 = arena.insert(ExprKind::Param(0));
        let p1 = arena.insert(ExprKind::Param(1));
        let tree = arena.insert(ExprKind::Eq(arena.push_list(&[p0, p1])));

        let substituted = substitute_expr(&names, &mut arena, &[x, one], tree).unwrap();
        match arena.get(substituted) {
            ExprKind::Eq(list) => {
                let children = arena.list(list).to_vec();
                assert_eq!(arena.get(children[0]), ExprKind::Var(x));
                assert_eq!(arena.get(children[1]), ExprKind::Long(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn out_of_range_placeholder_is_an_error() {
        let mut names = NameInterner::new();
        let p3 = names.intern("%3");
        let x1 = names.intern("x1");
        let result = substitute_name(&names, &[x1], p3);
        assert!(result.is_err());
    }
}
