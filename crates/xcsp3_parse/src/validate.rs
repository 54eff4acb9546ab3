//! Post-parse validation pass: §7's `UnknownVariableError`.
//!
//! The driver interns every identifier it encounters regardless of
//! whether it was ever declared — interning is just bookkeeping, not a
//! claim of existence. This pass runs once, after the closing
//! `</instance>` tag, and walks every resolved reference left in the
//! finished [`Instance`] checking it against the declared variables and
//! array bases. A placeholder (`%k`) is never a plain variable
//! reference by construction (it has its own `ExprKind::Param` node),
//! so it never reaches this check.

use rustc_hash::FxHashSet;
use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{ConstraintKind, ExprArena, ExprId, ExprKind, Instance, Name, NameInterner, Operand};

fn array_base(resolved: &str) -> Option<&str> {
    resolved.find('[').map(|i| &resolved[..i])
}

fn is_known(name: Name, names: &NameInterner, scalars: &FxHashSet<Name>, array_bases: &FxHashSet<String>) -> bool {
    if scalars.contains(&name) {
        return true;
    }
    let resolved = names.resolve(name);
    match array_base(resolved) {
        Some(base) => array_bases.contains(base),
        None => false,
    }
}

fn check(name: Name, names: &NameInterner, scalars: &FxHashSet<Name>, array_bases: &FxHashSet<String>) -> Result<()> {
    if is_known(name, names, scalars, array_bases) {
        Ok(())
    } else {
        Err(ParseError::UnknownVariable { name: names.resolve(name).to_string() })
    }
}

fn check_list(
    list: &[Name],
    names: &NameInterner,
    scalars: &FxHashSet<Name>,
    array_bases: &FxHashSet<String>,
) -> Result<()> {
    for &n in list {
        check(n, names, scalars, array_bases)?;
    }
    Ok(())
}

fn check_operand(
    operand: &Operand,
    names: &NameInterner,
    scalars: &FxHashSet<Name>,
    array_bases: &FxHashSet<String>,
) -> Result<()> {
    if let Operand::Variable(n) = operand {
        check(*n, names, scalars, array_bases)?;
    }
    Ok(())
}

fn check_expr(
    arena: &ExprArena,
    id: ExprId,
    names: &NameInterner,
    scalars: &FxHashSet<Name>,
    array_bases: &FxHashSet<String>,
) -> Result<()> {
    if let ExprKind::Var(n) = arena.get(id) {
        check(n, names, scalars, array_bases)?;
    }
    for child in xcsp3_canon::children_of(arena, id) {
        check_expr(arena, child, names, scalars, array_bases)?;
    }
    Ok(())
}

fn check_kind(
    kind: &ConstraintKind,
    arena: &ExprArena,
    names: &NameInterner,
    scalars: &FxHashSet<Name>,
    array_bases: &FxHashSet<String>,
) -> Result<()> {
    let list = |l: &[Name]| check_list(l, names, scalars, array_bases);
    let lists = |ls: &[Vec<Name>]| ls.iter().try_for_each(|l| list(l));
    match kind {
        ConstraintKind::True | ConstraintKind::False => Ok(()),
        ConstraintKind::Extension { list: l, .. } => list(l),
        ConstraintKind::Intension { tree } | ConstraintKind::Primitive { tree } => {
            check_expr(arena, *tree, names, scalars, array_bases)
        }
        ConstraintKind::AllDifferent { list: l, .. } | ConstraintKind::AllEqual { list: l } | ConstraintKind::NotAllEqual { list: l } => {
            list(l)
        }
        ConstraintKind::AllDifferentMatrix { matrix } | ConstraintKind::LexMatrix { matrix, .. } => lists(matrix),
        ConstraintKind::AllDifferentList { lists: ls } | ConstraintKind::Lex { lists: ls, .. } => lists(ls),
        ConstraintKind::Ordered { list: l, .. } => list(l),
        ConstraintKind::Sum { list: l, condition, .. } => {
            list(l)?;
            check_operand(&condition.operand, names, scalars, array_bases)
        }
        ConstraintKind::Count { list: l, condition, .. } => {
            list(l)?;
            check_operand(&condition.operand, names, scalars, array_bases)
        }
        ConstraintKind::NValues { list: l, condition, .. } => {
            list(l)?;
            check_operand(&condition.operand, names, scalars, array_bases)
        }
        ConstraintKind::Cardinality { list: l, .. } => list(l),
        ConstraintKind::Maximum { list: l, condition, .. } | ConstraintKind::Minimum { list: l, condition, .. } => {
            list(l)?;
            match condition {
                Some(c) => check_operand(&c.operand, names, scalars, array_bases),
                None => Ok(()),
            }
        }
        ConstraintKind::Element { list: l, index, value, .. } => {
            list(l)?;
            check(*index, names, scalars, array_bases)?;
            check_operand(value, names, scalars, array_bases)
        }
        ConstraintKind::ElementMatrix { matrix, row_index, col_index, value, .. } => {
            lists(matrix)?;
            check(*row_index, names, scalars, array_bases)?;
            check(*col_index, names, scalars, array_bases)?;
            check_operand(value, names, scalars, array_bases)
        }
        ConstraintKind::Channel { list: l, list2, .. } => {
            list(l)?;
            match list2 {
                Some(l2) => list(l2),
                None => Ok(()),
            }
        }
        ConstraintKind::NoOverlap { origins, lengths, .. } => {
            list(origins)?;
            list(lengths)
        }
        ConstraintKind::Stretch { list: l, .. } => list(l),
        ConstraintKind::Cumulative { origins, lengths, heights, condition } => {
            list(origins)?;
            list(lengths)?;
            list(heights)?;
            check_operand(&condition.operand, names, scalars, array_bases)
        }
        ConstraintKind::Instantiation { list: l, .. } => list(l),
        ConstraintKind::Clause { positive, negative } => {
            list(positive)?;
            list(negative)
        }
        ConstraintKind::Circuit { list: l, .. } => list(l),
        ConstraintKind::Regular { list: l, .. } | ConstraintKind::Mdd { list: l, .. } => list(l),
    }
}

/// Checks every variable reference left in `instance` against its
/// declared scalar variables and array bases, failing with
/// [`ParseError::UnknownVariable`] on the first undeclared one found
/// (in constraint order, then objective order).
pub fn validate_known_variables(instance: &Instance) -> Result<()> {
    let scalars: FxHashSet<Name> = instance.variables.iter().map(|v| v.name).collect();
    let array_bases: FxHashSet<String> =
        instance.arrays.iter().map(|a| instance.names.resolve(a.name).to_string()).collect();

    for constraint in &instance.constraints {
        check_kind(&constraint.kind, &instance.exprs, &instance.names, &scalars, &array_bases)?;
    }
    for objective in &instance.objectives {
        check_list(&objective.list, &instance.names, &scalars, &array_bases)?;
        if let Some(tree) = objective.tree {
            check_expr(&instance.exprs, tree, &instance.names, &scalars, &array_bases)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsp3_ir::{Condition, Constraint, InstanceType, IntegerDomain, OrderType, Variable};

    fn instance_with_sum(declared: &[&str], referenced: &[&str]) -> Instance {
        let mut instance = Instance::new(InstanceType::Csp);
        for &d in declared {
            let name = instance.names.intern(d);
            let mut domain = IntegerDomain::new();
            domain.add_interval(0, 5).unwrap();
            let domain = instance.domains.intern(domain);
            instance.variables.push(Variable { name, domain });
        }
        let list: Vec<Name> = referenced.iter().map(|r| instance.names.intern(r)).collect();
        instance.constraints.push(Constraint {
            id: "c1".to_string(),
            classes: Vec::new(),
            kind: ConstraintKind::Sum { list, coeffs: Vec::new(), condition: Condition { order: OrderType::Eq, operand: Operand::Integer(3) } },
        });
        instance
    }

    #[test]
    fn accepts_fully_declared_scope() {
        let instance = instance_with_sum(&["x", "y"], &["x", "y"]);
        assert!(validate_known_variables(&instance).is_ok());
    }

    #[test]
    fn rejects_undeclared_reference() {
        let instance = instance_with_sum(&["x"], &["x", "z"]);
        let err = validate_known_variables(&instance).unwrap_err();
        assert!(matches!(err, ParseError::UnknownVariable { name } if name == "z"));
    }

    #[test]
    fn accepts_array_cell_matching_declared_base() {
        let mut instance = Instance::new(InstanceType::Csp);
        let base = instance.names.intern("q");
        instance.arrays.push(xcsp3_ir::VariableArray::new(base, vec![3]));
        let list = vec![instance.names.intern("q[1]")];
        instance.constraints.push(Constraint {
            id: "c1".to_string(),
            classes: Vec::new(),
            kind: ConstraintKind::AllEqual { list },
        });
        assert!(validate_known_variables(&instance).is_ok());
    }
}
