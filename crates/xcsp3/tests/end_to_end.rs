//! End-to-end coverage driving complete XML documents through
//! [`xcsp3::parse_document`] and inspecting the resulting callback
//! trace and [`xcsp3_ir::Instance`], one scenario per canonical
//! XCSP3 feature: domains, canonicalisation, group/slide unfolding,
//! nValues specialisation, and extension tuples with `*`.

use xcsp3_ir::{OrderType, TupleValue};
use xcsp3_parse::{CallbackBank, ParserConfig, Tuple};

#[derive(Default)]
struct RecordingBank {
    ranges: Vec<(String, i64, i64)>,
    enums: Vec<(String, Vec<i64>)>,
    primitives: Vec<(String, OrderType, String, i64)>,
    all_equal: Vec<(String, Vec<String>)>,
    nvalues: Vec<String>,
    extensions: Vec<(String, Vec<String>, Vec<Vec<TupleValue>>, bool)>,
}

impl CallbackBank for RecordingBank {
    fn build_variable_integer_range(&mut self, id: &str, min: i64, max: i64) {
        self.ranges.push((id.to_string(), min, max));
    }

    fn build_variable_integer_enum(&mut self, id: &str, values: &[i64]) {
        self.enums.push((id.to_string(), values.to_vec()));
    }

    fn build_constraint_primitive_var_rel_const(&mut self, id: &str, op: OrderType, x: &str, k: i64) {
        self.primitives.push((id.to_string(), op, x.to_string(), k));
    }

    fn build_constraint_all_equal(&mut self, id: &str, list: &[&str]) {
        self.all_equal.push((id.to_string(), list.iter().map(|s| s.to_string()).collect()));
    }

    fn build_constraint_nvalues(&mut self, id: &str, _list: &[&str], _except: &[i64], _condition: &xcsp3_ir::Condition) {
        self.nvalues.push(id.to_string());
    }

    fn build_constraint_extension(&mut self, id: &str, list: &[&str], tuples: &[Tuple<'_>], is_support: bool) {
        self.extensions.push((
            id.to_string(),
            list.iter().map(|s| s.to_string()).collect(),
            tuples.iter().map(|t| t.to_vec()).collect(),
            is_support,
        ));
    }
}

fn parse(xml: &str) -> (xcsp3_ir::Instance, RecordingBank) {
    let mut bank = RecordingBank::default();
    let instance = xcsp3::parse_document(xml, ParserConfig::default(), &mut bank).expect("document parses");
    (instance, bank)
}

#[test]
fn range_domain_is_reported_as_a_single_interval() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="x"> 0..3 </var>
            </variables>
            <constraints/>
        </instance>
    "#;
    let (_, bank) = parse(xml);
    assert_eq!(bank.ranges, vec![("x".to_string(), 0, 3)]);
    assert!(bank.enums.is_empty());
}

#[test]
fn enumerated_domain_with_a_gap_is_reported_as_explicit_values() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="y"> 1 3 5 </var>
            </variables>
            <constraints/>
        </instance>
    "#;
    let (_, bank) = parse(xml);
    assert_eq!(bank.enums, vec![("y".to_string(), vec![1, 3, 5])]);
    assert!(bank.ranges.is_empty());
}

#[test]
fn canonicalisation_recognises_not_of_lt_as_a_primitive_ge() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="x"> 0..10 </var>
            </variables>
            <constraints>
                <intension id="c1">not(lt(add(x,1),5))</intension>
            </constraints>
        </instance>
    "#;
    let (instance, bank) = parse(xml);
    assert_eq!(bank.primitives, vec![("c1".to_string(), OrderType::Ge, "x".to_string(), 4)]);
    assert_eq!(instance.constraints.len(), 1);
}

#[test]
fn group_unfolding_instantiates_each_argument_row_in_order() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="x"> 0..10 </var>
                <var id="y"> 0..10 </var>
            </variables>
            <constraints>
                <group id="g1">
                    <intension>eq(%0,%1)</intension>
                    <args>x 1</args>
                    <args>y 2</args>
                </group>
            </constraints>
        </instance>
    "#;
    let (_, bank) = parse(xml);
    assert_eq!(
        bank.primitives,
        vec![
            ("g1".to_string(), OrderType::Eq, "x".to_string(), 1),
            ("g1".to_string(), OrderType::Eq, "y".to_string(), 2),
        ]
    );
}

#[test]
fn circular_slide_wraps_the_last_window_back_to_the_first_element() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="a"> 0..1 </var>
                <var id="b"> 0..1 </var>
                <var id="c"> 0..1 </var>
                <var id="d"> 0..1 </var>
            </variables>
            <constraints>
                <slide id="s1" circular="true">
                    <list> a b c d </list>
                    <intension>ne(%0,%1)</intension>
                </slide>
            </constraints>
        </instance>
    "#;
    let (instance, _bank) = parse(xml);
    assert_eq!(instance.constraints.len(), 4);
    let pairs: Vec<(String, String)> = instance
        .constraints
        .iter()
        .map(|c| match &c.kind {
            xcsp3_ir::ConstraintKind::Intension { tree } => match instance.exprs.get(*tree) {
                xcsp3_ir::ExprKind::Ne(list) => {
                    let children = instance.exprs.list(list);
                    let name_of = |id: xcsp3_ir::ExprId| match instance.exprs.get(id) {
                        xcsp3_ir::ExprKind::Var(n) => instance.names.resolve(n).to_string(),
                        other => panic!("expected a variable leaf, got {other:?}"),
                    };
                    (name_of(children[0]), name_of(children[1]))
                }
                other => panic!("unexpected canonical form {other:?}"),
            },
            other => panic!("unexpected constraint kind {other:?}"),
        })
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("a".to_string(), "b".to_string()),
            ("b".to_string(), "c".to_string()),
            ("c".to_string(), "d".to_string()),
            ("d".to_string(), "a".to_string()),
        ]
    );
}

#[test]
fn nvalues_with_condition_eq_one_specialises_to_all_equal() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="x"> 0..5 </var>
                <var id="y"> 0..5 </var>
                <var id="z"> 0..5 </var>
            </variables>
            <constraints>
                <nValues id="n1">
                    <list>x y z</list>
                    <condition>(eq,1)</condition>
                </nValues>
            </constraints>
        </instance>
    "#;
    let (_, bank) = parse(xml);
    assert_eq!(bank.all_equal, vec![("n1".to_string(), vec!["x".to_string(), "y".to_string(), "z".to_string()])]);
    assert!(bank.nvalues.is_empty());
}

#[test]
fn extension_tuple_with_a_star_keeps_the_wildcard_in_place() {
    let xml = r#"
        <instance type="CSP">
            <variables>
                <var id="x"> 0..3 </var>
                <var id="y"> 0..3 </var>
                <var id="z"> 0..3 </var>
            </variables>
            <constraints>
                <extension id="e1">
                    <list>x y z</list>
                    <supports>(1,*,3)</supports>
                </extension>
            </constraints>
        </instance>
    "#;
    let (_, bank) = parse(xml);
    assert_eq!(bank.extensions.len(), 1);
    let (id, list, tuples, is_support) = &bank.extensions[0];
    assert_eq!(id, "e1");
    assert_eq!(list, &vec!["x".to_string(), "y".to_string(), "z".to_string()]);
    assert!(is_support);
    assert_eq!(tuples.len(), 1);
    assert_eq!(tuples[0], vec![TupleValue::Value(1), TupleValue::Star, TupleValue::Value(3)]);
    assert!(tuples[0].contains(&TupleValue::Star));
}
