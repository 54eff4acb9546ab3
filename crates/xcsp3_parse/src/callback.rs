//! The callback bank: the sink interface §6 specifies, grounded on
//! `XCSP3CoreCallbacksBase.h`'s pure-virtual method set.
//!
//! The original is an abstract C++ base class with ~90 pure virtual
//! methods, many of them overloads distinguished only by whether an
//! operand is an integer constant or a variable. This trait collapses
//! those operand-category overloads into the already-typed
//! [`Operand`]/[`Condition`] enums `xcsp3_ir` carries on its
//! constraint IR, the same way a Rust `match` arm replaces a C++
//! overload set — but keeps every overload §6 calls out as a *distinct
//! constraint shape* (the primitives, the count/nValues
//! specialisations) as its own method, since those are genuinely
//! different calls a sink may want to treat differently, not mere
//! type variations.
//!
//! Every method defaults to a no-op so a sink only implements the
//! calls it actually cares about (a summariser, say, has no use for
//! `begin_annotations`), the same shape as `syn::visit::Visit` or
//! rustc's HIR visitors.

use xcsp3_ir::{Condition, InstanceType, ObjectiveGoal, ObjectiveKind, OrderType, Rank, Transition, TupleValue};

/// A resolved row of an extensional constraint's tuple table.
pub type Tuple<'a> = &'a [TupleValue];

#[allow(unused_variables)]
pub trait CallbackBank {
    // --- lifecycle ----------------------------------------------------
    fn begin_instance(&mut self, kind: InstanceType) {}
    fn end_instance(&mut self) {}
    fn begin_variables(&mut self) {}
    fn end_variables(&mut self) {}
    fn begin_variable_array(&mut self, id: &str) {}
    fn end_variable_array(&mut self) {}
    fn begin_constraints(&mut self) {}
    fn end_constraints(&mut self) {}
    fn begin_block(&mut self, classes: &[String]) {}
    fn end_block(&mut self) {}
    fn begin_group(&mut self, id: &str) {}
    fn end_group(&mut self) {}
    fn begin_slide(&mut self, id: &str, circular: bool) {}
    fn end_slide(&mut self) {}
    fn begin_objectives(&mut self) {}
    fn end_objectives(&mut self) {}
    fn begin_annotations(&mut self) {}
    fn end_annotations(&mut self) {}

    // --- variables ------------------------------------------------------
    fn build_variable_integer_range(&mut self, id: &str, min: i64, max: i64) {}
    fn build_variable_integer_enum(&mut self, id: &str, values: &[i64]) {}

    // --- trivial constraints --------------------------------------------
    fn build_constraint_true(&mut self, id: &str) {}
    fn build_constraint_false(&mut self, id: &str) {}

    // --- extension --------------------------------------------------------
    fn build_constraint_extension(
        &mut self,
        id: &str,
        list: &[&str],
        tuples: &[Tuple<'_>],
        is_support: bool,
    ) {
    }

    // --- intension, and its recognised primitives ------------------------
    fn build_constraint_intension_string(&mut self, id: &str, expr: &str) {}
    /// Fired when [`crate::config::ParserConfig::intension_using_string`]
    /// is false and the tree was not recognised as one of the
    /// primitives below; `expr_debug` is the tree's debug-printed form
    /// (the canonical typed tree itself lives in the IR the caller
    /// already has access to; sinks that need the real tree should
    /// consume the constraint IR directly rather than this callback).
    fn build_constraint_intension(&mut self, id: &str, expr_debug: &str) {}
    fn build_constraint_primitive_var_rel_const(&mut self, id: &str, op: OrderType, x: &str, k: i64) {}
    fn build_constraint_primitive_var_rel_var_offset(
        &mut self,
        id: &str,
        op: OrderType,
        x: &str,
        k: i64,
        y: &str,
    ) {
    }
    fn build_constraint_primitive_in_range(&mut self, id: &str, x: &str, in_flag: bool, min: i64, max: i64) {}
    fn build_constraint_mult(&mut self, id: &str, x: &str, y: &str, z: &str) {}

    // --- alldifferent family ----------------------------------------------
    fn build_constraint_alldifferent(&mut self, id: &str, list: &[&str]) {}
    fn build_constraint_alldifferent_except(&mut self, id: &str, list: &[&str], except: &[i64]) {}
    fn build_constraint_alldifferent_list(&mut self, id: &str, lists: &[Vec<&str>]) {}
    fn build_constraint_alldifferent_matrix(&mut self, id: &str, matrix: &[Vec<&str>]) {}
    fn build_constraint_all_equal(&mut self, id: &str, list: &[&str]) {}
    fn build_constraint_not_all_equal(&mut self, id: &str, list: &[&str]) {}

    // --- ordering -----------------------------------------------------------
    fn build_constraint_ordered(&mut self, id: &str, list: &[&str], order: OrderType, lengths: Option<&[i64]>) {}
    fn build_constraint_lex(&mut self, id: &str, lists: &[Vec<&str>], order: OrderType) {}
    fn build_constraint_lex_matrix(&mut self, id: &str, matrix: &[Vec<&str>], order: OrderType) {}

    // --- sum ------------------------------------------------------------------
    fn build_constraint_sum(&mut self, id: &str, list: &[&str], coeffs: Option<&[i64]>, condition: &Condition) {}

    // --- count, and its recognised specialisations ---------------------------
    fn build_constraint_count(&mut self, id: &str, list: &[&str], values: &[i64], condition: &Condition) {}
    fn build_constraint_at_least(&mut self, id: &str, list: &[&str], value: i64, k: i64) {}
    fn build_constraint_at_most(&mut self, id: &str, list: &[&str], value: i64, k: i64) {}
    fn build_constraint_exactly(&mut self, id: &str, list: &[&str], value: i64, k: i64) {}
    fn build_constraint_exactly_variable(&mut self, id: &str, list: &[&str], value: i64, x: &str) {}
    fn build_constraint_among(&mut self, id: &str, list: &[&str], values: &[i64], k: i64) {}

    // --- nValues, and its recognised specialisations -------------------------
    fn build_constraint_nvalues(&mut self, id: &str, list: &[&str], except: &[i64], condition: &Condition) {}

    // --- cardinality --------------------------------------------------------
    fn build_constraint_cardinality(
        &mut self,
        id: &str,
        list: &[&str],
        values: &[i64],
        occurs_min: &[i64],
        occurs_max: &[i64],
        closed: bool,
    ) {
    }

    // --- minimum / maximum ----------------------------------------------------
    fn build_constraint_minimum(
        &mut self,
        id: &str,
        list: &[&str],
        condition: Option<&Condition>,
        start_index: i64,
        rank: Rank,
    ) {
    }
    fn build_constraint_maximum(
        &mut self,
        id: &str,
        list: &[&str],
        condition: Option<&Condition>,
        start_index: i64,
        rank: Rank,
    ) {
    }

    // --- element ------------------------------------------------------------
    fn build_constraint_element(
        &mut self,
        id: &str,
        list: &[&str],
        index: &str,
        start_index: i64,
        rank: Rank,
        value_var: Option<&str>,
        value_const: Option<i64>,
    ) {
    }
    #[allow(clippy::too_many_arguments)]
    fn build_constraint_element_matrix(
        &mut self,
        id: &str,
        matrix: &[Vec<&str>],
        row_index: &str,
        col_index: &str,
        start_row_index: i64,
        start_col_index: i64,
        value_var: Option<&str>,
        value_const: Option<i64>,
    ) {
    }

    // --- channel -----------------------------------------------------------
    fn build_constraint_channel(
        &mut self,
        id: &str,
        list: &[&str],
        start_index: i64,
        list2: Option<&[&str]>,
        start_index2: i64,
    ) {
    }

    // --- scheduling ------------------------------------------------------------
    fn build_constraint_no_overlap(&mut self, id: &str, origins: &[&str], lengths: &[&str], zero_ignored: bool) {}
    fn build_constraint_stretch(
        &mut self,
        id: &str,
        list: &[&str],
        values: &[i64],
        widths_min: &[i64],
        widths_max: &[i64],
        patterns: &[(i64, i64)],
    ) {
    }
    fn build_constraint_cumulative(
        &mut self,
        id: &str,
        origins: &[&str],
        lengths: &[&str],
        heights: &[&str],
        condition: &Condition,
    ) {
    }

    // --- automata -----------------------------------------------------------
    fn build_constraint_regular(
        &mut self,
        id: &str,
        list: &[&str],
        start: &str,
        finals: &[String],
        transitions: &[Transition],
    ) {
    }
    fn build_constraint_mdd(&mut self, id: &str, list: &[&str], transitions: &[Transition]) {}

    // --- miscellaneous -------------------------------------------------------
    fn build_constraint_instantiation(&mut self, id: &str, list: &[&str], values: &[i64]) {}
    fn build_constraint_clause(&mut self, id: &str, positive: &[&str], negative: &[&str]) {}
    fn build_constraint_circuit(&mut self, id: &str, list: &[&str], start_index: i64, size: Option<i64>) {}

    // --- objectives ----------------------------------------------------------
    fn build_objective_variable(&mut self, goal: ObjectiveGoal, x: &str) {}
    fn build_objective_expression(&mut self, goal: ObjectiveGoal, expr_debug: &str) {}
    fn build_objective(
        &mut self,
        goal: ObjectiveGoal,
        kind: ObjectiveKind,
        list: &[&str],
        coeffs: Option<&[i64]>,
    ) {
    }

    // --- annotations -----------------------------------------------------------
    fn build_annotation_decision(&mut self, list: &[&str]) {}
}
