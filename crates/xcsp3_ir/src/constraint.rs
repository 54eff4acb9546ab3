//! Constraint IR: one variant per constraint family the driver can
//! build, each carrying the fields the original `XCSP3Constraint.h`
//! class hierarchy attaches to that family.

use crate::arena::ExprId;
use crate::name::Name;

/// A relational operator, as used by `<condition>` elements and by
/// primitive/relational constraints. Mirrors `OrderType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Lt,
    Le,
    Ge,
    Gt,
    In,
    Eq,
    Ne,
}

/// What a condition's right-hand operand is. Mirrors `OperandType`.
#[derive(Debug, Clone)]
pub enum Operand {
    Integer(i64),
    Interval { min: i64, max: i64 },
    Variable(Name),
}

/// The `(operator, operand)` pair attached to `count`, `nValues`,
/// `cumulative`, and every other "global constraint with a condition"
/// family. Mirrors `XCondition`.
#[derive(Debug, Clone)]
pub struct Condition {
    pub order: OrderType,
    pub operand: Operand,
}

/// Which occurrence of a value a positional constraint refers to.
/// Mirrors `RankType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rank {
    #[default]
    Any,
    First,
    Last,
}

/// The direction of an `<objectives>` entry. Mirrors `ObjectiveGoal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveGoal {
    Minimize,
    Maximize,
}

/// The combining operator an expression-objective reduces its operand
/// list with. Mirrors `ExpressionObjective`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveKind {
    Expression,
    Sum,
    Product,
    Minimum,
    Maximum,
    NValues,
    Lex,
}

/// A single row of an extensional constraint's tuple table. `Star`
/// stands for the `XCSP3Core::STAR` sentinel ("any value").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TupleValue {
    Value(i64),
    Star,
}

/// One edge of a `<regular>`/`<mdd>` automaton: `from` on reading
/// `value` moves to `to`. Mirrors `XTransition`.
#[derive(Debug, Clone)]
pub struct Transition {
    pub from: String,
    pub value: i64,
    pub to: String,
}

/// One constraint, fully resolved (no template placeholders remain —
/// those are instantiated by `xcsp3_unfold` before a constraint reaches
/// this representation).
#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: String,
    pub classes: Vec<String>,
    pub kind: ConstraintKind,
}

/// One constraint family's data, named after `ConstraintType`.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    True,
    False,
    Extension {
        list: Vec<Name>,
        tuples: Vec<Vec<TupleValue>>,
        is_support: bool,
    },
    Intension {
        tree: ExprId,
    },
    Primitive {
        tree: ExprId,
    },
    AllDifferent {
        list: Vec<Name>,
        except: Vec<i64>,
    },
    AllDifferentMatrix {
        matrix: Vec<Vec<Name>>,
    },
    AllDifferentList {
        lists: Vec<Vec<Name>>,
    },
    AllEqual {
        list: Vec<Name>,
    },
    NotAllEqual {
        list: Vec<Name>,
    },
    Ordered {
        list: Vec<Name>,
        order: OrderType,
        lengths: Vec<i64>,
    },
    Lex {
        lists: Vec<Vec<Name>>,
        order: OrderType,
    },
    LexMatrix {
        matrix: Vec<Vec<Name>>,
        order: OrderType,
    },
    Sum {
        list: Vec<Name>,
        coeffs: Vec<i64>,
        condition: Condition,
    },
    Count {
        list: Vec<Name>,
        values: Vec<i64>,
        condition: Condition,
    },
    NValues {
        list: Vec<Name>,
        except: Vec<i64>,
        condition: Condition,
    },
    Cardinality {
        list: Vec<Name>,
        values: Vec<i64>,
        occurs_min: Vec<i64>,
        occurs_max: Vec<i64>,
        closed: bool,
    },
    Maximum {
        list: Vec<Name>,
        condition: Option<Condition>,
        start_index: i64,
        rank: Rank,
    },
    Minimum {
        list: Vec<Name>,
        condition: Option<Condition>,
        start_index: i64,
        rank: Rank,
    },
    Element {
        list: Vec<Name>,
        index: Name,
        start_index: i64,
        rank: Rank,
        value: Operand,
    },
    ElementMatrix {
        matrix: Vec<Vec<Name>>,
        row_index: Name,
        col_index: Name,
        start_row_index: i64,
        start_col_index: i64,
        value: Operand,
    },
    Channel {
        list: Vec<Name>,
        start_index: i64,
        list2: Option<Vec<Name>>,
        start_index2: i64,
    },
    NoOverlap {
        origins: Vec<Name>,
        lengths: Vec<Name>,
        zero_ignored: bool,
    },
    Stretch {
        list: Vec<Name>,
        values: Vec<i64>,
        widths_min: Vec<i64>,
        widths_max: Vec<i64>,
        patterns: Vec<(i64, i64)>,
    },
    Cumulative {
        origins: Vec<Name>,
        lengths: Vec<Name>,
        heights: Vec<Name>,
        condition: Condition,
    },
    Instantiation {
        list: Vec<Name>,
        values: Vec<i64>,
    },
    Clause {
        positive: Vec<Name>,
        negative: Vec<Name>,
    },
    Circuit {
        list: Vec<Name>,
        start_index: i64,
        size: Option<i64>,
    },
    Regular {
        list: Vec<Name>,
        start: String,
        finals: Vec<String>,
        transitions: Vec<Transition>,
    },
    Mdd {
        list: Vec<Name>,
        transitions: Vec<Transition>,
    },
}

/// One `<objectives>` entry.
#[derive(Debug, Clone)]
pub struct Objective {
    pub goal: ObjectiveGoal,
    pub kind: ObjectiveKind,
    pub list: Vec<Name>,
    pub coeffs: Vec<i64>,
    pub tree: Option<ExprId>,
}
