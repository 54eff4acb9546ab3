//! A verbose, human-readable sink, grounded on `XCSP3PrintCallbacks.h`:
//! every lifecycle and build event gets an indented line on stdout.
//! Long variable lists are truncated with an ellipsis, matching the
//! original's `displayList` convention.

use xcsp3_ir::{InstanceType, ObjectiveGoal, ObjectiveKind, OrderType, Rank};
use xcsp3_parse::CallbackBank;

const MAX_DISPLAYED: usize = 8;

fn display_list(list: &[&str]) -> String {
    if list.len() <= MAX_DISPLAYED {
        list.join(" ")
    } else {
        format!("{} ... ({} vars)", list[..MAX_DISPLAYED].join(" "), list.len())
    }
}

fn display_ints(values: &[i64]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(" ")
}

/// Prints an indented, human-readable trace of the parse to stdout.
pub struct PrintBank {
    indent: usize,
}

impl Default for PrintBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PrintBank {
    pub fn new() -> Self {
        Self { indent: 0 }
    }

    fn line(&self, text: impl AsRef<str>) {
        println!("{}{}", "  ".repeat(self.indent), text.as_ref());
    }
}

impl CallbackBank for PrintBank {
    fn begin_instance(&mut self, kind: InstanceType) {
        self.line(format!("Start Instance - type={kind:?}"));
        self.indent += 1;
    }

    fn end_instance(&mut self) {
        self.indent -= 1;
        self.line("End Instance");
    }

    fn begin_variables(&mut self) {
        self.line("Start Variables");
        self.indent += 1;
    }

    fn end_variables(&mut self) {
        self.indent -= 1;
        self.line("End Variables");
    }

    fn begin_variable_array(&mut self, id: &str) {
        self.line(format!("array: {id}"));
        self.indent += 1;
    }

    fn end_variable_array(&mut self) {
        self.indent -= 1;
    }

    fn begin_constraints(&mut self) {
        self.line("Start Constraints");
        self.indent += 1;
    }

    fn end_constraints(&mut self) {
        self.indent -= 1;
        self.line("End Constraints");
    }

    fn begin_block(&mut self, classes: &[String]) {
        self.line(format!("start block, classes = {}", classes.join(" ")));
        self.indent += 1;
    }

    fn end_block(&mut self) {
        self.indent -= 1;
        self.line("end block");
    }

    fn begin_group(&mut self, id: &str) {
        self.line(format!("start group of constraint {id}"));
        self.indent += 1;
    }

    fn end_group(&mut self) {
        self.indent -= 1;
        self.line("end group");
    }

    fn begin_slide(&mut self, id: &str, circular: bool) {
        self.line(format!("start slide {id} (circular={circular})"));
        self.indent += 1;
    }

    fn end_slide(&mut self) {
        self.indent -= 1;
        self.line("end slide");
    }

    fn begin_objectives(&mut self) {
        self.line("Start Objectives");
        self.indent += 1;
    }

    fn end_objectives(&mut self) {
        self.indent -= 1;
        self.line("End Objectives");
    }

    fn begin_annotations(&mut self) {
        self.line("Start Annotations");
        self.indent += 1;
    }

    fn end_annotations(&mut self) {
        self.indent -= 1;
        self.line("End Annotations");
    }

    fn build_variable_integer_range(&mut self, id: &str, min: i64, max: i64) {
        self.line(format!("var {id} : {min}..{max}"));
    }

    fn build_variable_integer_enum(&mut self, id: &str, values: &[i64]) {
        self.line(format!("var {id} : {{{}}}", display_ints(values)));
    }

    fn build_constraint_true(&mut self, id: &str) {
        self.line(format!("constraint {id} : always true"));
    }

    fn build_constraint_false(&mut self, id: &str) {
        self.line(format!("constraint {id} : always false"));
    }

    fn build_constraint_extension(&mut self, id: &str, list: &[&str], tuples: &[xcsp3_parse::Tuple<'_>], is_support: bool) {
        let kind = if is_support { "support" } else { "conflict" };
        self.line(format!("extension {id} ({kind}, {} tuples): {}", tuples.len(), display_list(list)));
    }

    fn build_constraint_intension_string(&mut self, id: &str, expr: &str) {
        self.line(format!("intension {id} : {expr}"));
    }

    fn build_constraint_intension(&mut self, id: &str, expr_debug: &str) {
        self.line(format!("intension {id} : {expr_debug}"));
    }

    fn build_constraint_primitive_var_rel_const(&mut self, id: &str, op: OrderType, x: &str, k: i64) {
        self.line(format!("primitive {id} : {x} {op:?} {k}"));
    }

    fn build_constraint_primitive_var_rel_var_offset(&mut self, id: &str, op: OrderType, x: &str, k: i64, y: &str) {
        self.line(format!("primitive {id} : {x} {op:?} {y} + {k}"));
    }

    fn build_constraint_primitive_in_range(&mut self, id: &str, x: &str, in_flag: bool, min: i64, max: i64) {
        let word = if in_flag { "in" } else { "not in" };
        self.line(format!("primitive {id} : {x} {word} [{min}..{max}]"));
    }

    fn build_constraint_mult(&mut self, id: &str, x: &str, y: &str, z: &str) {
        self.line(format!("primitive {id} : {x} = {y} * {z}"));
    }

    fn build_constraint_alldifferent(&mut self, id: &str, list: &[&str]) {
        self.line(format!("allDifferent {id} : {}", display_list(list)));
    }

    fn build_constraint_alldifferent_except(&mut self, id: &str, list: &[&str], except: &[i64]) {
        self.line(format!("allDifferent {id} : {} except {{{}}}", display_list(list), display_ints(except)));
    }

    fn build_constraint_alldifferent_list(&mut self, id: &str, lists: &[Vec<&str>]) {
        self.line(format!("allDifferentList {id} : {} lists", lists.len()));
    }

    fn build_constraint_alldifferent_matrix(&mut self, id: &str, matrix: &[Vec<&str>]) {
        self.line(format!("allDifferentMatrix {id} : {}x{}", matrix.len(), matrix.first().map_or(0, Vec::len)));
    }

    fn build_constraint_all_equal(&mut self, id: &str, list: &[&str]) {
        self.line(format!("allEqual {id} : {}", display_list(list)));
    }

    fn build_constraint_not_all_equal(&mut self, id: &str, list: &[&str]) {
        self.line(format!("notAllEqual {id} : {}", display_list(list)));
    }

    fn build_constraint_ordered(&mut self, id: &str, list: &[&str], order: OrderType, lengths: Option<&[i64]>) {
        match lengths {
            Some(l) => self.line(format!("ordered {id} ({order:?}, lengths {}) : {}", display_ints(l), display_list(list))),
            None => self.line(format!("ordered {id} ({order:?}) : {}", display_list(list))),
        }
    }

    fn build_constraint_lex(&mut self, id: &str, lists: &[Vec<&str>], order: OrderType) {
        self.line(format!("lex {id} ({order:?}) : {} lists", lists.len()));
    }

    fn build_constraint_lex_matrix(&mut self, id: &str, matrix: &[Vec<&str>], order: OrderType) {
        self.line(format!("lexMatrix {id} ({order:?}) : {}x{}", matrix.len(), matrix.first().map_or(0, Vec::len)));
    }

    fn build_constraint_sum(&mut self, id: &str, list: &[&str], coeffs: Option<&[i64]>, condition: &xcsp3_ir::Condition) {
        match coeffs {
            Some(c) => self.line(format!("sum {id} : coeffs [{}] * [{}] {:?}", display_ints(c), display_list(list), condition.order)),
            None => self.line(format!("sum {id} : [{}] {:?}", display_list(list), condition.order)),
        }
    }

    fn build_constraint_count(&mut self, id: &str, list: &[&str], values: &[i64], condition: &xcsp3_ir::Condition) {
        self.line(format!("count {id} : values {{{}}} in [{}] {:?}", display_ints(values), display_list(list), condition.order));
    }

    fn build_constraint_at_least(&mut self, id: &str, list: &[&str], value: i64, k: i64) {
        self.line(format!("atLeast {id} : {value} at least {k} times in [{}]", display_list(list)));
    }

    fn build_constraint_at_most(&mut self, id: &str, list: &[&str], value: i64, k: i64) {
        self.line(format!("atMost {id} : {value} at most {k} times in [{}]", display_list(list)));
    }

    fn build_constraint_exactly(&mut self, id: &str, list: &[&str], value: i64, k: i64) {
        self.line(format!("exactly {id} : {value} exactly {k} times in [{}]", display_list(list)));
    }

    fn build_constraint_exactly_variable(&mut self, id: &str, list: &[&str], value: i64, x: &str) {
        self.line(format!("exactly {id} : {value} exactly {x} times in [{}]", display_list(list)));
    }

    fn build_constraint_among(&mut self, id: &str, list: &[&str], values: &[i64], k: i64) {
        self.line(format!("among {id} : {{{}}} exactly {k} times in [{}]", display_ints(values), display_list(list)));
    }

    fn build_constraint_nvalues(&mut self, id: &str, list: &[&str], except: &[i64], condition: &xcsp3_ir::Condition) {
        self.line(format!(
            "nValues {id} : [{}] except {{{}}} {:?}",
            display_list(list),
            display_ints(except),
            condition.order
        ));
    }

    fn build_constraint_cardinality(&mut self, id: &str, list: &[&str], values: &[i64], occurs_min: &[i64], occurs_max: &[i64], closed: bool) {
        self.line(format!(
            "cardinality {id} (closed={closed}) : [{}] values {{{}}} min [{}] max [{}]",
            display_list(list),
            display_ints(values),
            display_ints(occurs_min),
            display_ints(occurs_max)
        ));
    }

    fn build_constraint_minimum(&mut self, id: &str, list: &[&str], condition: Option<&xcsp3_ir::Condition>, start_index: i64, rank: Rank) {
        self.line(format!(
            "minimum {id} (start={start_index}, rank={rank:?}) : [{}] {}",
            display_list(list),
            condition.map_or(String::new(), |c| format!("{:?}", c.order))
        ));
    }

    fn build_constraint_maximum(&mut self, id: &str, list: &[&str], condition: Option<&xcsp3_ir::Condition>, start_index: i64, rank: Rank) {
        self.line(format!(
            "maximum {id} (start={start_index}, rank={rank:?}) : [{}] {}",
            display_list(list),
            condition.map_or(String::new(), |c| format!("{:?}", c.order))
        ));
    }

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
        let value = value_var.map(str::to_string).or_else(|| value_const.map(|v| v.to_string())).unwrap_or_default();
        self.line(format!(
            "element {id} : [{}][{index} - {start_index}] (rank={rank:?}) = {value}",
            display_list(list)
        ));
    }

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
        let value = value_var.map(str::to_string).or_else(|| value_const.map(|v| v.to_string())).unwrap_or_default();
        self.line(format!(
            "elementMatrix {id} : {}x{} [{row_index} - {start_row_index}][{col_index} - {start_col_index}] = {value}",
            matrix.len(),
            matrix.first().map_or(0, Vec::len)
        ));
    }

    fn build_constraint_channel(&mut self, id: &str, list: &[&str], start_index: i64, list2: Option<&[&str]>, start_index2: i64) {
        match list2 {
            Some(l2) => self.line(format!(
                "channel {id} : [{}]@{start_index} <-> [{}]@{start_index2}",
                display_list(list),
                display_list(l2)
            )),
            None => self.line(format!("channel {id} : [{}]@{start_index}", display_list(list))),
        }
    }

    fn build_constraint_no_overlap(&mut self, id: &str, origins: &[&str], lengths: &[&str], zero_ignored: bool) {
        self.line(format!(
            "noOverlap {id} (zeroIgnored={zero_ignored}) : origins [{}] lengths [{}]",
            display_list(origins),
            display_list(lengths)
        ));
    }

    fn build_constraint_stretch(&mut self, id: &str, list: &[&str], values: &[i64], widths_min: &[i64], widths_max: &[i64], _patterns: &[(i64, i64)]) {
        self.line(format!(
            "stretch {id} : [{}] values {{{}}} widths [{}..{}]",
            display_list(list),
            display_ints(values),
            display_ints(widths_min),
            display_ints(widths_max)
        ));
    }

    fn build_constraint_cumulative(&mut self, id: &str, origins: &[&str], lengths: &[&str], heights: &[&str], condition: &xcsp3_ir::Condition) {
        self.line(format!(
            "cumulative {id} : origins [{}] lengths [{}] heights [{}] {:?}",
            display_list(origins),
            display_list(lengths),
            display_list(heights),
            condition.order
        ));
    }

    fn build_constraint_regular(&mut self, id: &str, list: &[&str], start: &str, finals: &[String], transitions: &[xcsp3_ir::Transition]) {
        self.line(format!(
            "regular {id} : [{}] start={start} finals={{{}}} ({} transitions)",
            display_list(list),
            finals.join(" "),
            transitions.len()
        ));
    }

    fn build_constraint_mdd(&mut self, id: &str, list: &[&str], transitions: &[xcsp3_ir::Transition]) {
        self.line(format!("mdd {id} : [{}] ({} transitions)", display_list(list), transitions.len()));
    }

    fn build_constraint_instantiation(&mut self, id: &str, list: &[&str], values: &[i64]) {
        self.line(format!("instantiation {id} : [{}] = [{}]", display_list(list), display_ints(values)));
    }

    fn build_constraint_clause(&mut self, id: &str, positive: &[&str], negative: &[&str]) {
        self.line(format!("clause {id} : [{}] | ![{}]", display_list(positive), display_list(negative)));
    }

    fn build_constraint_circuit(&mut self, id: &str, list: &[&str], start_index: i64, size: Option<i64>) {
        match size {
            Some(s) => self.line(format!("circuit {id} : [{}]@{start_index} size={s}", display_list(list))),
            None => self.line(format!("circuit {id} : [{}]@{start_index}", display_list(list))),
        }
    }

    fn build_objective_variable(&mut self, goal: ObjectiveGoal, x: &str) {
        self.line(format!("objective ({goal:?}) : {x}"));
    }

    fn build_objective_expression(&mut self, goal: ObjectiveGoal, expr_debug: &str) {
        self.line(format!("objective ({goal:?}) : {expr_debug}"));
    }

    fn build_objective(&mut self, goal: ObjectiveGoal, kind: ObjectiveKind, list: &[&str], coeffs: Option<&[i64]>) {
        match coeffs {
            Some(c) => self.line(format!("objective ({goal:?}, {kind:?}) : coeffs [{}] * [{}]", display_ints(c), display_list(list))),
            None => self.line(format!("objective ({goal:?}, {kind:?}) : [{}]", display_list(list))),
        }
    }

    fn build_annotation_decision(&mut self, list: &[&str]) {
        self.line(format!("decision : [{}]", display_list(list)));
    }
}
