//! The manager/dispatcher (§4.4): the last stage between a finalised
//! IR [`Constraint`] and the callback bank. Grounded on
//! `XCSP3CoreCallbacksBase::recognizeSpecialIntensionCases` /
//! `recognizeSpecialCountCases` / `recognizeNValuesCases` / the sum
//! normalisation in `XCSP3Constraint::normalizeSum` — three switches
//! this module applies in turn before handing a build call to the
//! sink.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;
use xcsp3_canon::canonize;
use xcsp3_diagnostic::Result;
use xcsp3_ir::{Condition, Constraint, ConstraintKind, ExprArena, ExprId, Name, NameInterner, Operand, OrderType};
use xcsp3_patterns::{recognize_primitive, Primitive, RelOp};

use crate::callback::CallbackBank;
use crate::config::ParserConfig;

fn resolve<'a>(names: &'a NameInterner, name: Name) -> &'a str {
    names.resolve(name)
}

fn resolve_list<'a>(names: &'a NameInterner, list: &[Name]) -> Vec<&'a str> {
    list.iter().map(|&n| resolve(names, n)).collect()
}

fn resolve_lists<'a>(names: &'a NameInterner, lists: &[Vec<Name>]) -> Vec<Vec<&'a str>> {
    lists.iter().map(|l| resolve_list(names, l)).collect()
}

fn rel_op_to_order(op: RelOp) -> OrderType {
    match op {
        RelOp::Lt => OrderType::Lt,
        RelOp::Le => OrderType::Le,
        RelOp::Ge => OrderType::Ge,
        RelOp::Gt => OrderType::Gt,
        RelOp::Eq => OrderType::Eq,
        RelOp::Ne => OrderType::Ne,
    }
}

/// Dispatches one finalised constraint to `bank`, applying class
/// filtering, intension canonicalisation and primitive recognition,
/// count/nValues specialisation, and sum normalisation along the way.
/// Returns without calling `bank` at all if `constraint`'s classes
/// intersect `config`'s discard set.
pub fn dispatch_constraint(
    names: &NameInterner,
    arena: &mut ExprArena,
    config: &ParserConfig,
    bank: &mut dyn CallbackBank,
    constraint: &Constraint,
) -> Result<()> {
    if config.is_discarded(&constraint.classes) {
        tracing::trace!(id = %constraint.id, "constraint discarded by class filter");
        return Ok(());
    }
    dispatch_kind(names, arena, config, bank, &constraint.id, &constraint.kind)
}

fn dispatch_kind(
    names: &NameInterner,
    arena: &mut ExprArena,
    config: &ParserConfig,
    bank: &mut dyn CallbackBank,
    id: &str,
    kind: &ConstraintKind,
) -> Result<()> {
    match kind {
        ConstraintKind::True => bank.build_constraint_true(id),
        ConstraintKind::False => bank.build_constraint_false(id),
        ConstraintKind::Extension { list, tuples, is_support } => {
            let list = resolve_list(names, list);
            let rows: Vec<&[xcsp3_ir::TupleValue]> = tuples.iter().map(Vec::as_slice).collect();
            bank.build_constraint_extension(id, &list, &rows, *is_support);
        }
        ConstraintKind::Intension { tree } | ConstraintKind::Primitive { tree } => {
            dispatch_intension(names, arena, config, bank, id, *tree);
        }
        ConstraintKind::AllDifferent { list, except } => {
            if except.is_empty() {
                bank.build_constraint_alldifferent(id, &resolve_list(names, list));
            } else {
                bank.build_constraint_alldifferent_except(id, &resolve_list(names, list), except);
            }
        }
        ConstraintKind::AllDifferentMatrix { matrix } => {
            bank.build_constraint_alldifferent_matrix(id, &resolve_lists(names, matrix));
        }
        ConstraintKind::AllDifferentList { lists } => {
            bank.build_constraint_alldifferent_list(id, &resolve_lists(names, lists));
        }
        ConstraintKind::AllEqual { list } => bank.build_constraint_all_equal(id, &resolve_list(names, list)),
        ConstraintKind::NotAllEqual { list } => bank.build_constraint_not_all_equal(id, &resolve_list(names, list)),
        ConstraintKind::Ordered { list, order, lengths } => {
            let lengths = if lengths.is_empty() { None } else { Some(lengths.as_slice()) };
            bank.build_constraint_ordered(id, &resolve_list(names, list), *order, lengths);
        }
        ConstraintKind::Lex { lists, order } => bank.build_constraint_lex(id, &resolve_lists(names, lists), *order),
        ConstraintKind::LexMatrix { matrix, order } => {
            bank.build_constraint_lex_matrix(id, &resolve_lists(names, matrix), *order);
        }
        ConstraintKind::Sum { list, coeffs, condition } => {
            dispatch_sum(names, config, bank, id, list, coeffs, condition);
        }
        ConstraintKind::Count { list, values, condition } => {
            dispatch_count(names, config, bank, id, list, values, condition);
        }
        ConstraintKind::NValues { list, except, condition } => {
            dispatch_nvalues(names, config, bank, id, list, except, condition);
        }
        ConstraintKind::Cardinality { list, values, occurs_min, occurs_max, closed } => {
            bank.build_constraint_cardinality(id, &resolve_list(names, list), values, occurs_min, occurs_max, *closed);
        }
        ConstraintKind::Maximum { list, condition, start_index, rank } => {
            bank.build_constraint_maximum(id, &resolve_list(names, list), condition.as_ref(), *start_index, *rank);
        }
        ConstraintKind::Minimum { list, condition, start_index, rank } => {
            bank.build_constraint_minimum(id, &resolve_list(names, list), condition.as_ref(), *start_index, *rank);
        }
        ConstraintKind::Element { list, index, start_index, rank, value } => {
            let (value_var, value_const) = split_operand(names, value);
            bank.build_constraint_element(
                id,
                &resolve_list(names, list),
                resolve(names, *index),
                *start_index,
                *rank,
                value_var,
                value_const,
            );
        }
        ConstraintKind::ElementMatrix {
            matrix,
            row_index,
            col_index,
            start_row_index,
            start_col_index,
            value,
        } => {
            let (value_var, value_const) = split_operand(names, value);
            bank.build_constraint_element_matrix(
                id,
                &resolve_lists(names, matrix),
                resolve(names, *row_index),
                resolve(names, *col_index),
                *start_row_index,
                *start_col_index,
                value_var,
                value_const,
            );
        }
        ConstraintKind::Channel { list, start_index, list2, start_index2 } => {
            let list2 = list2.as_ref().map(|l| resolve_list(names, l));
            bank.build_constraint_channel(id, &resolve_list(names, list), *start_index, list2.as_deref(), *start_index2);
        }
        ConstraintKind::NoOverlap { origins, lengths, zero_ignored } => {
            bank.build_constraint_no_overlap(id, &resolve_list(names, origins), &resolve_list(names, lengths), *zero_ignored);
        }
        ConstraintKind::Stretch { list, values, widths_min, widths_max, patterns } => {
            bank.build_constraint_stretch(id, &resolve_list(names, list), values, widths_min, widths_max, patterns);
        }
        ConstraintKind::Cumulative { origins, lengths, heights, condition } => {
            bank.build_constraint_cumulative(
                id,
                &resolve_list(names, origins),
                &resolve_list(names, lengths),
                &resolve_list(names, heights),
                condition,
            );
        }
        ConstraintKind::Instantiation { list, values } => {
            bank.build_constraint_instantiation(id, &resolve_list(names, list), values);
        }
        ConstraintKind::Clause { positive, negative } => {
            bank.build_constraint_clause(id, &resolve_list(names, positive), &resolve_list(names, negative));
        }
        ConstraintKind::Circuit { list, start_index, size } => {
            bank.build_constraint_circuit(id, &resolve_list(names, list), *start_index, *size);
        }
        ConstraintKind::Regular { list, start, finals, transitions } => {
            bank.build_constraint_regular(id, &resolve_list(names, list), start, finals, transitions);
        }
        ConstraintKind::Mdd { list, transitions } => {
            bank.build_constraint_mdd(id, &resolve_list(names, list), transitions);
        }
    }
    Ok(())
}

fn split_operand<'a>(names: &'a NameInterner, operand: &Operand) -> (Option<&'a str>, Option<i64>) {
    match operand {
        Operand::Variable(n) => (Some(resolve(names, *n)), None),
        Operand::Integer(v) => (None, Some(*v)),
        Operand::Interval { min, .. } => (None, Some(*min)),
    }
}

fn dispatch_intension(
    names: &NameInterner,
    arena: &mut ExprArena,
    config: &ParserConfig,
    bank: &mut dyn CallbackBank,
    id: &str,
    tree: ExprId,
) {
    let canonical = canonize(arena, &|n| resolve(names, n).to_string(), tree);
    if config.recognize_special_intension_cases {
        if let Some(primitive) = recognize_primitive(arena, canonical) {
            match primitive {
                Primitive::VarRelConst(x, op, k) => {
                    bank.build_constraint_primitive_var_rel_const(id, rel_op_to_order(op), resolve(names, x), k);
                }
                Primitive::VarRelVarOffset(x, op, y, k) => {
                    bank.build_constraint_primitive_var_rel_var_offset(
                        id,
                        rel_op_to_order(op),
                        resolve(names, x),
                        k,
                        resolve(names, y),
                    );
                }
                Primitive::EqProduct(x, y, z) => {
                    bank.build_constraint_mult(id, resolve(names, x), resolve(names, y), resolve(names, z));
                }
                Primitive::InRange(x, in_flag, min, max) => {
                    bank.build_constraint_primitive_in_range(id, resolve(names, x), in_flag, min, max);
                }
            }
            return;
        }
    }
    let rendered = format!("{:?}", arena.get(canonical));
    if config.intension_using_string {
        bank.build_constraint_intension_string(id, &rendered);
    } else {
        bank.build_constraint_intension(id, &rendered);
    }
}

fn dispatch_count(
    names: &NameInterner,
    config: &ParserConfig,
    bank: &mut dyn CallbackBank,
    id: &str,
    list: &[Name],
    values: &[i64],
    condition: &Condition,
) {
    if config.recognize_special_count_cases && values.len() == 1 {
        let value = values[0];
        match (condition.order, &condition.operand) {
            (OrderType::Eq, Operand::Integer(k)) => {
                bank.build_constraint_exactly(id, &resolve_list(names, list), value, *k);
                return;
            }
            (OrderType::Eq, Operand::Variable(x)) => {
                bank.build_constraint_exactly_variable(id, &resolve_list(names, list), value, resolve(names, *x));
                return;
            }
            (OrderType::Ge, Operand::Integer(k)) => {
                bank.build_constraint_at_least(id, &resolve_list(names, list), value, *k);
                return;
            }
            (OrderType::Le, Operand::Integer(k)) => {
                bank.build_constraint_at_most(id, &resolve_list(names, list), value, *k);
                return;
            }
            _ => {}
        }
    }
    if config.recognize_special_count_cases && values.len() > 1 {
        if let (OrderType::Eq, Operand::Integer(k)) = (condition.order, &condition.operand) {
            bank.build_constraint_among(id, &resolve_list(names, list), values, *k);
            return;
        }
    }
    bank.build_constraint_count(id, &resolve_list(names, list), values, condition);
}

fn dispatch_nvalues(
    names: &NameInterner,
    config: &ParserConfig,
    bank: &mut dyn CallbackBank,
    id: &str,
    list: &[Name],
    except: &[i64],
    condition: &Condition,
) {
    if config.recognize_nvalues_cases && except.is_empty() {
        if let Operand::Integer(k) = condition.operand {
            match condition.order {
                OrderType::Eq if k == 1 => {
                    bank.build_constraint_all_equal(id, &resolve_list(names, list));
                    return;
                }
                OrderType::Gt if k == 1 => {
                    bank.build_constraint_not_all_equal(id, &resolve_list(names, list));
                    return;
                }
                OrderType::Eq if k == list.len() as i64 => {
                    bank.build_constraint_alldifferent(id, &resolve_list(names, list));
                    return;
                }
                _ => {}
            }
        }
    }
    bank.build_constraint_nvalues(id, &resolve_list(names, list), except, condition);
}

fn dispatch_sum(
    names: &NameInterner,
    config: &ParserConfig,
    bank: &mut dyn CallbackBank,
    id: &str,
    list: &[Name],
    coeffs: &[i64],
    condition: &Condition,
) {
    if !config.normalize_sum {
        let coeffs = if coeffs.is_empty() { None } else { Some(coeffs) };
        bank.build_constraint_sum(id, &resolve_list(names, list), coeffs, condition);
        return;
    }
    let (list, coeffs) = normalize_sum(names, list, coeffs);
    let all_ones = coeffs.iter().all(|&c| c == 1);
    let resolved: Vec<&str> = list.iter().map(|&n| resolve(names, n)).collect();
    if all_ones {
        bank.build_constraint_sum(id, &resolved, None, condition);
    } else {
        bank.build_constraint_sum(id, &resolved, Some(&coeffs), condition);
    }
}

/// Merges duplicate-variable coefficients, drops zero-coefficient
/// entries, then sorts by the variable's resolved identifier — the
/// specification's resolution to the source's insertion-order
/// sensitivity (see `DESIGN.md`).
fn normalize_sum(names: &NameInterner, list: &[Name], coeffs: &[i64]) -> (Vec<Name>, Vec<i64>) {
    let mut merged: FxHashMap<Name, i64> = FxHashMap::default();
    let mut order: Vec<Name> = Vec::new();
    for (i, &name) in list.iter().enumerate() {
        let coeff = coeffs.get(i).copied().unwrap_or(1);
        match merged.entry(name) {
            Entry::Occupied(mut e) => *e.get_mut() += coeff,
            Entry::Vacant(e) => {
                order.push(name);
                e.insert(coeff);
            }
        }
    }
    order.retain(|n| merged[n] != 0);
    order.sort_by_key(|&n| resolve(names, n).to_string());
    let coeffs = order.iter().map(|n| merged[n]).collect();
    (order, coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsp3_ir::{Condition as Cond, Operand as Op, OrderType as Ord};

    #[test]
    fn sum_normalization_merges_and_drops_zero() {
        let mut names = NameInterner::new();
        let x = names.intern("x");
        let y = names.intern("y");
        let list = vec![x, y, x];
        let coeffs = vec![1, -1, -1];
        let (names_out, coeffs_out) = normalize_sum(&names, &list, &coeffs);
        assert_eq!(names_out, vec![y]);
        assert_eq!(coeffs_out, vec![-1]);
    }

    #[test]
    fn count_with_eq_const_dispatches_exactly() {
        struct Recorder(Option<(i64, i64)>);
        impl CallbackBank for Recorder {
            fn build_constraint_exactly(&mut self, _id: &str, _list: &[&str], value: i64, k: i64) {
                self.0 = Some((value, k));
            }
        }
        let mut names = NameInterner::new();
        let x = names.intern("x");
        let config = ParserConfig::new();
        let mut sink = Recorder(None);
        let condition = Cond {
            order: Ord::Eq,
            operand: Op::Integer(2),
        };
        dispatch_count(&names, &config, &mut sink, "c1", &[x], &[5], &condition);
        assert_eq!(sink.0, Some((5, 2)));
    }
}
