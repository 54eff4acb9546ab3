//! A minimal counting sink, grounded on `XCSP3SummaryCallbacks.h`:
//! tallies variables and constraints as they are built and remembers
//! the last objective seen, printing a one-line summary at the end.

use xcsp3_ir::{ObjectiveGoal, ObjectiveKind};
use xcsp3_parse::CallbackBank;

/// Counts variables and constraints, and records the final objective
/// (if any). `report` mirrors the original's `nbv,nbc,minmax,type`
/// summary line.
#[derive(Default)]
pub struct SummaryBank {
    nb_variables: usize,
    nb_constraints: usize,
    goal: Option<ObjectiveGoal>,
    objective: Option<&'static str>,
}

fn goal_str(goal: ObjectiveGoal) -> &'static str {
    match goal {
        ObjectiveGoal::Minimize => "minimize",
        ObjectiveGoal::Maximize => "maximize",
    }
}

fn kind_str(kind: ObjectiveKind) -> &'static str {
    match kind {
        ObjectiveKind::Expression => "expression",
        ObjectiveKind::Sum => "sum",
        ObjectiveKind::Product => "product",
        ObjectiveKind::Minimum => "minimum",
        ObjectiveKind::Maximum => "maximum",
        ObjectiveKind::NValues => "nValues",
        ObjectiveKind::Lex => "lex",
    }
}

impl SummaryBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nb_variables(&self) -> usize {
        self.nb_variables
    }

    pub fn nb_constraints(&self) -> usize {
        self.nb_constraints
    }

    /// `variables,constraints,minmax,objective` — empty fields when no
    /// objective was declared (a satisfaction instance).
    pub fn report(&self) -> String {
        format!(
            "{},{},{},{}",
            self.nb_variables,
            self.nb_constraints,
            self.goal.map(goal_str).unwrap_or(""),
            self.objective.unwrap_or(""),
        )
    }
}

impl CallbackBank for SummaryBank {
    fn build_variable_integer_range(&mut self, _id: &str, _min: i64, _max: i64) {
        self.nb_variables += 1;
    }

    fn build_variable_integer_enum(&mut self, _id: &str, _values: &[i64]) {
        self.nb_variables += 1;
    }

    fn build_constraint_true(&mut self, _id: &str) {
        self.nb_constraints += 1;
    }

    fn build_constraint_false(&mut self, _id: &str) {
        self.nb_constraints += 1;
    }

    fn build_constraint_extension(&mut self, _id: &str, _list: &[&str], _tuples: &[xcsp3_parse::Tuple<'_>], _is_support: bool) {
        self.nb_constraints += 1;
    }

    fn build_constraint_intension_string(&mut self, _id: &str, _expr: &str) {
        self.nb_constraints += 1;
    }

    fn build_constraint_intension(&mut self, _id: &str, _expr_debug: &str) {
        self.nb_constraints += 1;
    }

    fn build_constraint_primitive_var_rel_const(&mut self, _id: &str, _op: xcsp3_ir::OrderType, _x: &str, _k: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_primitive_var_rel_var_offset(
        &mut self,
        _id: &str,
        _op: xcsp3_ir::OrderType,
        _x: &str,
        _k: i64,
        _y: &str,
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_primitive_in_range(&mut self, _id: &str, _x: &str, _in_flag: bool, _min: i64, _max: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_mult(&mut self, _id: &str, _x: &str, _y: &str, _z: &str) {
        self.nb_constraints += 1;
    }

    fn build_constraint_alldifferent(&mut self, _id: &str, _list: &[&str]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_alldifferent_except(&mut self, _id: &str, _list: &[&str], _except: &[i64]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_alldifferent_list(&mut self, _id: &str, _lists: &[Vec<&str>]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_alldifferent_matrix(&mut self, _id: &str, _matrix: &[Vec<&str>]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_all_equal(&mut self, _id: &str, _list: &[&str]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_not_all_equal(&mut self, _id: &str, _list: &[&str]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_ordered(&mut self, _id: &str, _list: &[&str], _order: xcsp3_ir::OrderType, _lengths: Option<&[i64]>) {
        self.nb_constraints += 1;
    }

    fn build_constraint_lex(&mut self, _id: &str, _lists: &[Vec<&str>], _order: xcsp3_ir::OrderType) {
        self.nb_constraints += 1;
    }

    fn build_constraint_lex_matrix(&mut self, _id: &str, _matrix: &[Vec<&str>], _order: xcsp3_ir::OrderType) {
        self.nb_constraints += 1;
    }

    fn build_constraint_sum(&mut self, _id: &str, _list: &[&str], _coeffs: Option<&[i64]>, _condition: &xcsp3_ir::Condition) {
        self.nb_constraints += 1;
    }

    fn build_constraint_count(&mut self, _id: &str, _list: &[&str], _values: &[i64], _condition: &xcsp3_ir::Condition) {
        self.nb_constraints += 1;
    }

    fn build_constraint_at_least(&mut self, _id: &str, _list: &[&str], _value: i64, _k: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_at_most(&mut self, _id: &str, _list: &[&str], _value: i64, _k: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_exactly(&mut self, _id: &str, _list: &[&str], _value: i64, _k: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_exactly_variable(&mut self, _id: &str, _list: &[&str], _value: i64, _x: &str) {
        self.nb_constraints += 1;
    }

    fn build_constraint_among(&mut self, _id: &str, _list: &[&str], _values: &[i64], _k: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_nvalues(&mut self, _id: &str, _list: &[&str], _except: &[i64], _condition: &xcsp3_ir::Condition) {
        self.nb_constraints += 1;
    }

    fn build_constraint_cardinality(
        &mut self,
        _id: &str,
        _list: &[&str],
        _values: &[i64],
        _occurs_min: &[i64],
        _occurs_max: &[i64],
        _closed: bool,
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_minimum(
        &mut self,
        _id: &str,
        _list: &[&str],
        _condition: Option<&xcsp3_ir::Condition>,
        _start_index: i64,
        _rank: xcsp3_ir::Rank,
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_maximum(
        &mut self,
        _id: &str,
        _list: &[&str],
        _condition: Option<&xcsp3_ir::Condition>,
        _start_index: i64,
        _rank: xcsp3_ir::Rank,
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_element(
        &mut self,
        _id: &str,
        _list: &[&str],
        _index: &str,
        _start_index: i64,
        _rank: xcsp3_ir::Rank,
        _value_var: Option<&str>,
        _value_const: Option<i64>,
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_element_matrix(
        &mut self,
        _id: &str,
        _matrix: &[Vec<&str>],
        _row_index: &str,
        _col_index: &str,
        _start_row_index: i64,
        _start_col_index: i64,
        _value_var: Option<&str>,
        _value_const: Option<i64>,
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_channel(&mut self, _id: &str, _list: &[&str], _start_index: i64, _list2: Option<&[&str]>, _start_index2: i64) {
        self.nb_constraints += 1;
    }

    fn build_constraint_no_overlap(&mut self, _id: &str, _origins: &[&str], _lengths: &[&str], _zero_ignored: bool) {
        self.nb_constraints += 1;
    }

    fn build_constraint_stretch(
        &mut self,
        _id: &str,
        _list: &[&str],
        _values: &[i64],
        _widths_min: &[i64],
        _widths_max: &[i64],
        _patterns: &[(i64, i64)],
    ) {
        self.nb_constraints += 1;
    }

    fn build_constraint_cumulative(&mut self, _id: &str, _origins: &[&str], _lengths: &[&str], _heights: &[&str], _condition: &xcsp3_ir::Condition) {
        self.nb_constraints += 1;
    }

    fn build_constraint_regular(&mut self, _id: &str, _list: &[&str], _start: &str, _finals: &[String], _transitions: &[xcsp3_ir::Transition]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_mdd(&mut self, _id: &str, _list: &[&str], _transitions: &[xcsp3_ir::Transition]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_instantiation(&mut self, _id: &str, _list: &[&str], _values: &[i64]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_clause(&mut self, _id: &str, _positive: &[&str], _negative: &[&str]) {
        self.nb_constraints += 1;
    }

    fn build_constraint_circuit(&mut self, _id: &str, _list: &[&str], _start_index: i64, _size: Option<i64>) {
        self.nb_constraints += 1;
    }

    fn build_objective_variable(&mut self, goal: ObjectiveGoal, _x: &str) {
        self.goal = Some(goal);
        self.objective = Some("variable");
    }

    fn build_objective_expression(&mut self, goal: ObjectiveGoal, _expr_debug: &str) {
        self.goal = Some(goal);
        self.objective = Some(kind_str(ObjectiveKind::Expression));
    }

    fn build_objective(&mut self, goal: ObjectiveGoal, kind: ObjectiveKind, _list: &[&str], _coeffs: Option<&[i64]>) {
        self.goal = Some(goal);
        self.objective = Some(kind_str(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_variables_and_constraints() {
        let mut bank = SummaryBank::new();
        bank.build_variable_integer_range("x", 0, 5);
        bank.build_variable_integer_range("y", 0, 5);
        bank.build_constraint_alldifferent("c1", &["x", "y"]);
        assert_eq!(bank.nb_variables(), 2);
        assert_eq!(bank.nb_constraints(), 1);
        assert_eq!(bank.report(), "2,1,,");
    }

    #[test]
    fn records_objective() {
        let mut bank = SummaryBank::new();
        bank.build_objective(ObjectiveGoal::Minimize, ObjectiveKind::Sum, &["x", "y"], None);
        assert_eq!(bank.report(), "0,0,minimize,sum");
    }
}
