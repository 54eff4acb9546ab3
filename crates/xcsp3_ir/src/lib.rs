//! Arena-indexed intermediate representation for XCSP3 instances.
//!
//! An XCSP3 instance is, from this crate's point of view, flat
//! collections: interned names, interned domains, declared
//! variables/arrays referencing both, one shared expression arena, and
//! the constraints/objectives that reference into it. No node here
//! owns a pointer to another — everything is an index into
//! `Instance`'s tables, so the whole tree can be dropped in one
//! deallocation and trivially walked without worrying about aliasing.

pub mod arena;
pub mod constraint;
pub mod domain;
pub mod expr;
pub mod group;
pub mod name;
pub mod variable;

pub use arena::{ExprArena, ExprId, ExprListId};
pub use constraint::{
    Condition, Constraint, ConstraintKind, Objective, ObjectiveGoal, ObjectiveKind, Operand,
    OrderType, Rank, Transition, TupleValue,
};
pub use domain::{DomainEntity, DomainId, DomainInterner, IntegerDomain};
pub use expr::{ExprKind, STAR};
pub use group::{placeholder_index, GroupTemplate, SlideMode, SlideTemplate};
pub use name::{Name, NameInterner};
pub use variable::{Variable, VariableArray};

/// What kind of instance this is: a satisfaction problem or an
/// optimisation problem with declared objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceType {
    Csp,
    Cop,
}

/// The fully parsed and unfolded contents of one XCSP3 document.
#[derive(Debug)]
pub struct Instance {
    pub kind: InstanceType,
    pub names: NameInterner,
    pub domains: DomainInterner,
    pub exprs: ExprArena,
    pub variables: Vec<Variable>,
    pub arrays: Vec<VariableArray>,
    pub constraints: Vec<Constraint>,
    pub objectives: Vec<Objective>,
}

impl Instance {
    #[must_use]
    pub fn new(kind: InstanceType) -> Self {
        Self {
            kind,
            names: NameInterner::new(),
            domains: DomainInterner::new(),
            exprs: ExprArena::new(),
            variables: Vec::new(),
            arrays: Vec::new(),
            constraints: Vec::new(),
            objectives: Vec::new(),
        }
    }
}
