//! The streaming XML driver (§4.6): a tag-handler stack implementing
//! [`XmlEvents`]. Grounded on the original `XCSP3CoreParser`'s
//! SAX-callback methods (`startElement`/`endElement`/`characters`),
//! rewritten per the specification's own design note (§9) as a tagged
//! union (`Frame`) dispatched by tag name, rather than the source's
//! polymorphic per-tag handler objects.

use rustc_hash::FxHashMap;
use xcsp3_diagnostic::{ParseError, Result};
use xcsp3_ir::{
    Condition, Constraint, ConstraintKind, ExprArena, ExprId, GroupTemplate, Instance,
    InstanceType, Name, NameInterner, Objective, ObjectiveGoal, ObjectiveKind, Operand, OrderType,
    Rank, SlideMode, SlideTemplate, Transition, TupleValue, Variable, VariableArray,
};

use crate::callback::CallbackBank;
use crate::condition::parse_condition;
use crate::config::ParserConfig;
use crate::dispatcher::dispatch_constraint;
use crate::events::{Attribute, XmlEvents};
use crate::expr_parser::parse_expr;
use crate::scanner::{scan_int_sequence, scan_name_list, scan_name_rows, scan_tuples};
use crate::validate::validate_known_variables;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Extension,
    Intension,
    Regular,
    Mdd,
    AllDifferent,
    AllEqual,
    NotAllEqual,
    Ordered,
    Lex,
    Sum,
    Count,
    NValues,
    Cardinality,
    Minimum,
    Maximum,
    Element,
    Channel,
    Stretch,
    NoOverlap,
    Cumulative,
    Instantiation,
    Clause,
    Circuit,
}

impl Family {
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "extension" => Family::Extension,
            "intension" => Family::Intension,
            "regular" => Family::Regular,
            "mdd" => Family::Mdd,
            "allDifferent" => Family::AllDifferent,
            "allEqual" => Family::AllEqual,
            "notAllEqual" => Family::NotAllEqual,
            "ordered" => Family::Ordered,
            "lex" => Family::Lex,
            "sum" => Family::Sum,
            "count" => Family::Count,
            "nValues" => Family::NValues,
            "cardinality" => Family::Cardinality,
            "minimum" => Family::Minimum,
            "maximum" => Family::Maximum,
            "element" => Family::Element,
            "channel" => Family::Channel,
            "stretch" => Family::Stretch,
            "noOverlap" => Family::NoOverlap,
            "cumulative" => Family::Cumulative,
            "instantiation" => Family::Instantiation,
            "clause" => Family::Clause,
            "circuit" => Family::Circuit,
            _ => return None,
        })
    }
}

/// Accumulator for every field any constraint family's children might
/// populate. One instance lives per [`Frame::ConstraintFamily`]; only
/// the fields that family's constructor reads are ever non-default.
#[derive(Debug, Default)]
struct Pending {
    lists: Vec<Vec<Name>>,
    list_start_index: i64,
    values: Vec<i64>,
    except: Vec<i64>,
    condition: Option<Condition>,
    indices: Vec<(Name, Rank)>,
    matrix: Vec<Vec<Name>>,
    start_state: Option<String>,
    final_states: Vec<String>,
    transitions: Vec<Transition>,
    widths_min: Vec<i64>,
    widths_max: Vec<i64>,
    patterns: Vec<(i64, i64)>,
    origins: Vec<Name>,
    lengths_int: Vec<i64>,
    lengths_name: Vec<Name>,
    heights: Vec<Name>,
    coeffs: Vec<i64>,
    size: Option<i64>,
    operator: Option<OrderType>,
    value_operand: Option<Operand>,
    tuples: Vec<Vec<TupleValue>>,
    is_support: bool,
    closed: bool,
    zero_ignored: bool,
}

enum Frame {
    Root,
    Instance,
    Variables,
    VarDecl { id: String },
    ArrayDecl { id: String, dims: Vec<usize> },
    ConstraintsSection,
    Block,
    Group { id: String, classes: Vec<String>, template: Option<ConstraintKind>, rows: Vec<Vec<Name>> },
    Slide {
        id: String,
        classes: Vec<String>,
        circular: bool,
        offset: usize,
        template: Option<ConstraintKind>,
        list: Vec<Name>,
    },
    Args,
    ConstraintFamily { family: Family, id: String, classes: Vec<String>, pending: Pending },
    Leaf { tag: String, start_index: i64, rank: Rank },
    Objectives,
    Objective { goal: ObjectiveGoal, kind: ObjectiveKind, list: Vec<Name>, coeffs: Vec<i64> },
    Annotations,
}

fn syntax_error(text: &str) -> ParseError {
    ParseError::ExpressionSyntaxError { message: text.to_string() }
}

fn unexpected_text(tag: &str) -> ParseError {
    ParseError::UnexpectedTextError { tag: tag.to_string() }
}

/// The tag name a frame corresponds to, used only for parent-tag
/// validation and `UnexpectedTextError` messages (not for dispatch,
/// which matches on the frame variant itself).
fn frame_tag(frame: &Frame) -> &'static str {
    match frame {
        Frame::Root => "root",
        Frame::Instance => "instance",
        Frame::Variables => "variables",
        Frame::VarDecl { .. } => "var",
        Frame::ArrayDecl { .. } => "array",
        Frame::ConstraintsSection => "constraints",
        Frame::Block => "block",
        Frame::Group { .. } => "group",
        Frame::Slide { .. } => "slide",
        Frame::Args => "args",
        Frame::ConstraintFamily { .. } => "constraintFamily",
        Frame::Leaf { .. } => "leaf",
        Frame::Objectives => "objectives",
        Frame::Objective { .. } => "objective",
        Frame::Annotations => "annotations",
    }
}

/// Validates that `tag`'s immediate parent (the top of the handler
/// stack, per §4.6) is one it is allowed to appear under. Tags not
/// listed here have no single fixed parent in this model (leaf
/// sub-tags are validated by `merge_leaf`'s own tag match instead) and
/// are accepted unconditionally.
fn validate_parent(tag: &str, parent: &str) -> Result<()> {
    let allowed: &[&str] = match tag {
        "instance" => &["root"],
        "variables" => &["instance"],
        "var" => &["variables"],
        "array" => &["variables"],
        "constraints" => &["instance"],
        "block" => &["constraints", "block"],
        "group" => &["constraints", "block"],
        "slide" => &["constraints", "block"],
        "args" => &["group"],
        "objectives" => &["instance"],
        "minimize" | "maximize" => &["objectives"],
        "annotations" => &["instance"],
        _ => return Ok(()),
    };
    if allowed.contains(&parent) {
        Ok(())
    } else {
        Err(ParseError::ParentMismatchError {
            tag: tag.to_string(),
            expected_parent: allowed.join(" or "),
            actual_parent: parent.to_string(),
        })
    }
}

fn attr<'a>(attrs: &'a [Attribute<'_>], name: &str) -> Option<&'a str> {
    attrs.iter().find(|a| a.name == name).map(|a| a.value)
}

fn classes_of(attrs: &[Attribute<'_>]) -> Vec<String> {
    attr(attrs, "class")
        .map(|s| s.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

fn order_of(token: &str) -> Option<OrderType> {
    Some(match token {
        "lt" => OrderType::Lt,
        "le" => OrderType::Le,
        "ge" => OrderType::Ge,
        "gt" => OrderType::Gt,
        "eq" => OrderType::Eq,
        "ne" => OrderType::Ne,
        _ => return None,
    })
}

/// Drives a callback bank from XML events, owning the per-parse arenas
/// and the tag-handler stack.
pub struct Driver<'b> {
    config: ParserConfig,
    bank: &'b mut dyn CallbackBank,
    instance: Instance,
    array_dims: FxHashMap<String, Vec<usize>>,
    stack: Vec<Frame>,
    text: String,
}

impl<'b> Driver<'b> {
    #[must_use]
    pub fn new(kind: InstanceType, config: ParserConfig, bank: &'b mut dyn CallbackBank) -> Self {
        bank.begin_instance(kind);
        Self {
            config,
            bank,
            instance: Instance::new(kind),
            array_dims: FxHashMap::default(),
            stack: vec![Frame::Root],
            text: String::new(),
        }
    }

    /// Consumes the driver, returning the fully parsed and unfolded
    /// instance after the `</instance>` close tag has been observed.
    #[must_use]
    pub fn into_instance(self) -> Instance {
        self.instance
    }

    fn array_dims_lookup(&self) -> impl Fn(&str) -> Option<Vec<usize>> + '_ {
        move |base: &str| self.array_dims.get(base).cloned()
    }

    fn dispatch(&mut self, id: &str, classes: &[String], kind: ConstraintKind) -> Result<()> {
        let constraint = Constraint { id: id.to_string(), classes: classes.to_vec(), kind };
        dispatch_constraint(&self.instance.names, &mut self.instance.exprs, &self.config, self.bank, &constraint)?;
        self.instance.constraints.push(constraint);
        Ok(())
    }

    fn route_constraint(&mut self, id: String, classes: Vec<String>, kind: ConstraintKind) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Group { template, .. }) => {
                *template = Some(kind);
                Ok(())
            }
            Some(Frame::Slide { template, .. }) => {
                *template = Some(kind);
                Ok(())
            }
            _ => self.dispatch(&id, &classes, kind),
        }
    }
}

impl<'b> XmlEvents for Driver<'b> {
    fn start_element(&mut self, name: &str, attributes: &[Attribute<'_>]) -> Result<()> {
        self.text.clear();
        let parent = self.stack.last().map_or("root", frame_tag);
        validate_parent(name, parent)?;
        if Family::from_tag(name).is_some() {
            let allowed = ["constraints", "block", "group", "slide"];
            if !allowed.contains(&parent) {
                return Err(ParseError::ParentMismatchError {
                    tag: name.to_string(),
                    expected_parent: allowed.join(" or "),
                    actual_parent: parent.to_string(),
                });
            }
        }
        match name {
            "instance" => self.stack.push(Frame::Instance),
            "variables" => {
                self.bank.begin_variables();
                self.stack.push(Frame::Variables);
            }
            "var" => {
                let id = attr(attributes, "id").unwrap_or_default().to_string();
                self.stack.push(Frame::VarDecl { id });
            }
            "array" => {
                let id = attr(attributes, "id").unwrap_or_default().to_string();
                let dims: Vec<usize> = attr(attributes, "size")
                    .map(|s| {
                        s.trim_matches(|c| c == '[' || c == ']')
                            .split("][")
                            .filter_map(|d| d.parse().ok())
                            .collect()
                    })
                    .unwrap_or_default();
                self.bank.begin_variable_array(&id);
                self.stack.push(Frame::ArrayDecl { id, dims });
            }
            "domain" => {
                // Per-cell array domain overrides (`<domain for="...">`)
                // are not part of the supported subset; push a leaf
                // frame so the matching end tag fails with a clear
                // `UnknownTagError` rather than popping an unrelated
                // frame off the stack.
                self.stack.push(Frame::Leaf { tag: "domain".to_string(), start_index: 0, rank: Rank::Any });
            }
            "constraints" => {
                self.bank.begin_constraints();
                self.stack.push(Frame::ConstraintsSection);
            }
            "block" => {
                let classes = classes_of(attributes);
                self.bank.begin_block(&classes);
                self.stack.push(Frame::Block);
            }
            "group" => {
                let id = attr(attributes, "id").unwrap_or_default().to_string();
                let classes = classes_of(attributes);
                self.bank.begin_group(&id);
                self.stack.push(Frame::Group { id, classes, template: None, rows: Vec::new() });
            }
            "args" => self.stack.push(Frame::Args),
            "slide" => {
                let id = attr(attributes, "id").unwrap_or_default().to_string();
                let classes = classes_of(attributes);
                let circular = attr(attributes, "circular") == Some("true");
                let offset: usize = attr(attributes, "offset").and_then(|s| s.parse().ok()).unwrap_or(1);
                self.bank.begin_slide(&id, circular);
                self.stack.push(Frame::Slide { id, classes, circular, offset, template: None, list: Vec::new() });
            }
            "objectives" => {
                self.bank.begin_objectives();
                self.stack.push(Frame::Objectives);
            }
            "minimize" | "maximize" => {
                let goal = if name == "minimize" { ObjectiveGoal::Minimize } else { ObjectiveGoal::Maximize };
                let kind = match attr(attributes, "type") {
                    Some("sum") => ObjectiveKind::Sum,
                    Some("product") => ObjectiveKind::Product,
                    Some("minimum") => ObjectiveKind::Minimum,
                    Some("maximum") => ObjectiveKind::Maximum,
                    Some("nValues") => ObjectiveKind::NValues,
                    Some("lex") => ObjectiveKind::Lex,
                    _ => ObjectiveKind::Expression,
                };
                self.stack.push(Frame::Objective { goal, kind, list: Vec::new(), coeffs: Vec::new() });
            }
            "annotations" => {
                self.bank.begin_annotations();
                self.stack.push(Frame::Annotations);
            }
            other => {
                if let Some(family) = Family::from_tag(other) {
                    let id = attr(attributes, "id").unwrap_or_default().to_string();
                    let classes = classes_of(attributes);
                    let mut pending = Pending::default();
                    pending.closed = attr(attributes, "closed") == Some("true");
                    pending.zero_ignored = attr(attributes, "zeroIgnored") == Some("true");
                    self.stack.push(Frame::ConstraintFamily { family, id, classes, pending });
                } else {
                    let start_index: i64 = attr(attributes, "startIndex").and_then(|s| s.parse().ok()).unwrap_or(0);
                    let rank = match attr(attributes, "rank") {
                        Some("first") => Rank::First,
                        Some("last") => Rank::Last,
                        _ => Rank::Any,
                    };
                    self.stack.push(Frame::Leaf { tag: other.to_string(), start_index, rank });
                }
            }
        }
        Ok(())
    }

    fn characters(&mut self, chunk: &str) -> Result<()> {
        if !chunk.trim().is_empty() || !self.text.is_empty() {
            self.text.push_str(chunk);
        }
        Ok(())
    }

    fn end_element(&mut self, name: &str) -> Result<()> {
        let text = std::mem::take(&mut self.text);
        let frame = self.stack.pop().ok_or_else(|| ParseError::UnknownTagError { name: name.to_string() })?;

        match frame {
            Frame::Root => return Err(ParseError::UnknownTagError { name: name.to_string() }),
            Frame::Instance => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(name));
                }
                self.bank.end_instance();
                validate_known_variables(&self.instance)?;
            }
            Frame::Variables => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(name));
                }
                self.bank.end_variables();
            }
            Frame::VarDecl { id } => {
                let domain = parse_domain_text(&text)?;
                if domain.is_interval() {
                    let (min, max) = (domain.minimum().unwrap_or(0), domain.maximum().unwrap_or(0));
                    self.bank.build_variable_integer_range(&id, min, max);
                } else {
                    self.bank.build_variable_integer_enum(&id, &domain_values(&domain));
                }
                let name = self.instance.names.intern(&id);
                let domain = self.instance.domains.intern(domain);
                self.instance.variables.push(Variable { name, domain });
            }
            Frame::ArrayDecl { id, dims } => {
                self.array_dims.insert(id.clone(), dims.clone());
                if !text.trim().is_empty() {
                    let domain = parse_domain_text(&text)?;
                    if domain.is_interval() {
                        let (min, max) = (domain.minimum().unwrap_or(0), domain.maximum().unwrap_or(0));
                        self.bank.build_variable_integer_range(&id, min, max);
                    } else {
                        self.bank.build_variable_integer_enum(&id, &domain_values(&domain));
                    }
                }
                let name = self.instance.names.intern(&id);
                self.instance.arrays.push(VariableArray::new(name, dims));
                self.bank.end_variable_array();
            }
            Frame::ConstraintsSection => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(name));
                }
                self.bank.end_constraints();
            }
            Frame::Block => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(name));
                }
                self.bank.end_block();
            }
            Frame::Group { id, classes, template, rows } => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(&id));
                }
                self.bank.end_group();
                let template = template.ok_or_else(|| syntax_error(&id))?;
                let group = GroupTemplate { id: id.clone(), classes: classes.clone(), template, arguments: rows };
                let instances = xcsp3_unfold::unfold_group(&self.instance.names, &mut self.instance.exprs, &group)?;
                for kind in instances {
                    self.dispatch(&group.id, &group.classes, kind)?;
                }
            }
            Frame::Args => {
                let dims = self.array_dims_lookup();
                let row_names = scan_name_list(&text, &dims)?;
                let row: Vec<Name> = row_names.iter().map(|n| self.instance.names.intern(n)).collect();
                if let Some(Frame::Group { rows, .. }) = self.stack.last_mut() {
                    rows.push(row);
                }
            }
            Frame::Slide { id, classes, circular, offset, template, list } => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(&id));
                }
                self.bank.end_slide();
                let template = template.ok_or_else(|| syntax_error(&id))?;
                let window_len = max_placeholder(&self.instance.exprs, &template).map_or(2, |m| m as usize + 1);
                let slide = SlideTemplate {
                    id: id.clone(),
                    classes: classes.clone(),
                    template,
                    list,
                    list2: None,
                    window_len,
                    offset,
                    mode: if circular { SlideMode::Circular } else { SlideMode::NonCircular },
                };
                let instances = xcsp3_unfold::unfold_slide(&self.instance.names, &mut self.instance.exprs, &slide)?;
                for kind in instances {
                    self.dispatch(&slide.id, &slide.classes, kind)?;
                }
            }
            Frame::ConstraintFamily { family, id, classes, mut pending } => {
                if family == Family::Intension {
                    let trimmed = text.trim();
                    let kind = match trimmed {
                        "true" => ConstraintKind::True,
                        "false" => ConstraintKind::False,
                        _ => {
                            let tree = parse_expr(&mut self.instance.exprs, &mut self.instance.names, trimmed)?;
                            ConstraintKind::Intension { tree }
                        }
                    };
                    self.route_constraint(id, classes, kind)?;
                } else {
                    if !text.trim().is_empty() {
                        return Err(unexpected_text(&id));
                    }
                    let kind = build_constraint_kind(&mut self.instance.names, family, &mut pending)?;
                    self.route_constraint(id, classes, kind)?;
                }
            }
            Frame::Leaf { tag, start_index, rank } => {
                self.merge_leaf(&tag, start_index, rank, &text)?;
            }
            Frame::Objectives => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(name));
                }
                self.bank.end_objectives();
            }
            Frame::Objective { goal, kind, list, coeffs } => {
                self.finish_objective(goal, kind, list, coeffs, &text)?;
            }
            Frame::Annotations => {
                if !text.trim().is_empty() {
                    return Err(unexpected_text(name));
                }
                self.bank.end_annotations();
            }
        }
        Ok(())
    }
}

impl<'b> Driver<'b> {
    fn merge_leaf(&mut self, tag: &str, start_index: i64, rank: Rank, text: &str) -> Result<()> {
        let dims = self.array_dims_lookup();
        let current_family = match self.stack.last() {
            Some(Frame::ConstraintFamily { family, .. }) => Some(*family),
            _ => None,
        };

        match tag {
            "list" => {
                let raw = scan_name_list(text, &dims)?;
                let list: Vec<Name> = raw.iter().map(|n| self.instance.names.intern(n)).collect();
                match self.stack.last_mut() {
                    Some(Frame::ConstraintFamily { pending, .. }) => {
                        if pending.lists.is_empty() {
                            pending.list_start_index = start_index;
                        }
                        pending.lists.push(list);
                    }
                    Some(Frame::Slide { list: slot, .. }) => *slot = list,
                    Some(Frame::Objective { list: slot, .. }) => *slot = list,
                    _ => {}
                }
            }
            "values" => {
                let values = scan_int_sequence(text)?;
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.values = values;
                }
            }
            "condition" => {
                let condition = parse_condition(&mut self.instance.names, text)?;
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.condition = Some(condition);
                }
            }
            "operator" => {
                let order = order_of(text.trim());
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.operator = order;
                }
            }
            "value" => {
                let operand = parse_scalar_operand(&mut self.instance.names, text.trim());
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.value_operand = Some(operand);
                }
            }
            "index" => {
                let raw = scan_name_list(text, &dims)?;
                let Some(first) = raw.first() else { return Err(syntax_error(text)) };
                let name = self.instance.names.intern(first);
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.indices.push((name, rank));
                }
            }
            "matrix" => {
                let rows = scan_name_rows(text, &dims)?;
                let rows: Vec<Vec<Name>> = rows
                    .into_iter()
                    .map(|r| r.iter().map(|n| self.instance.names.intern(n)).collect())
                    .collect();
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.matrix = rows;
                }
            }
            "start" => {
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.start_state = Some(text.trim().to_string());
                }
            }
            "final" => {
                let states = text.split_whitespace().map(String::from).collect::<Vec<_>>();
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.final_states = states;
                }
            }
            "transitions" => {
                let transitions = parse_transitions(text)?;
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.transitions = transitions;
                }
            }
            "except" => {
                let values = scan_int_sequence(text)?;
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.except = values;
                }
            }
            "origins" => {
                let raw = scan_name_list(text, &dims)?;
                let names: Vec<Name> = raw.iter().map(|n| self.instance.names.intern(n)).collect();
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.origins = names;
                }
            }
            "lengths" => match current_family {
                Some(Family::Ordered) => {
                    let values = scan_int_sequence(text)?;
                    if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                        pending.lengths_int = values;
                    }
                }
                _ => {
                    let raw = scan_name_list(text, &dims)?;
                    let names: Vec<Name> = raw.iter().map(|n| self.instance.names.intern(n)).collect();
                    if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                        pending.lengths_name = names;
                    }
                }
            },
            "heights" => {
                let raw = scan_name_list(text, &dims)?;
                let names: Vec<Name> = raw.iter().map(|n| self.instance.names.intern(n)).collect();
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.heights = names;
                }
            }
            "widths" => {
                let pairs = scan_tuples(text, 2)?;
                let (mins, maxs): (Vec<i64>, Vec<i64>) = pairs
                    .into_iter()
                    .map(|row| (tuple_value_as_i64(row[0]), tuple_value_as_i64(row[1])))
                    .unzip();
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.widths_min = mins;
                    pending.widths_max = maxs;
                }
            }
            "patterns" => {
                let pairs = scan_tuples(text, 2)?;
                let patterns: Vec<(i64, i64)> = pairs
                    .into_iter()
                    .map(|row| (tuple_value_as_i64(row[0]), tuple_value_as_i64(row[1])))
                    .collect();
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.patterns = patterns;
                }
            }
            "coeffs" => {
                let values = scan_int_sequence(text)?;
                match self.stack.last_mut() {
                    Some(Frame::ConstraintFamily { pending, .. }) => pending.coeffs = values,
                    Some(Frame::Objective { coeffs, .. }) => *coeffs = values,
                    _ => {}
                }
            }
            "size" => {
                let value: i64 = text.trim().parse().map_err(|_| syntax_error(text))?;
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    pending.size = Some(value);
                }
            }
            "supports" | "conflicts" => {
                let is_support = tag == "supports";
                if let Some(Frame::ConstraintFamily { pending, .. }) = self.stack.last_mut() {
                    let arity = pending.lists.first().map_or(1, Vec::len);
                    pending.tuples = scan_tuples(text, arity)?;
                    pending.is_support = is_support;
                }
            }
            "decision" => {
                let raw = scan_name_list(text, &dims)?;
                let names: Vec<Name> = raw.iter().map(|n| self.instance.names.intern(n)).collect();
                let resolved: Vec<&str> = names.iter().map(|&n| self.instance.names.resolve(n)).collect();
                self.bank.build_annotation_decision(&resolved);
            }
            _ => return Err(ParseError::UnknownTagError { name: tag.to_string() }),
        }
        Ok(())
    }

    fn finish_objective(
        &mut self,
        goal: ObjectiveGoal,
        kind: ObjectiveKind,
        list: Vec<Name>,
        coeffs: Vec<i64>,
        text: &str,
    ) -> Result<()> {
        if !list.is_empty() {
            let resolved: Vec<&str> = list.iter().map(|&n| self.instance.names.resolve(n)).collect();
            let coeff_slice = if coeffs.is_empty() { None } else { Some(coeffs.as_slice()) };
            self.bank.build_objective(goal, kind, &resolved, coeff_slice);
            self.instance.objectives.push(Objective { goal, kind, list, coeffs, tree: None });
            return Ok(());
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let is_bare_identifier = trimmed.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '[' || c == ']');
        if is_bare_identifier {
            self.bank.build_objective_variable(goal, trimmed);
            let name = self.instance.names.intern(trimmed);
            self.instance.objectives.push(Objective {
                goal,
                kind: ObjectiveKind::Expression,
                list: vec![name],
                coeffs: Vec::new(),
                tree: None,
            });
        } else {
            let tree = parse_expr(&mut self.instance.exprs, &mut self.instance.names, trimmed)?;
            let rendered = format!("{:?}", self.instance.exprs.get(tree));
            self.bank.build_objective_expression(goal, &rendered);
            self.instance.objectives.push(Objective {
                goal,
                kind: ObjectiveKind::Expression,
                list: Vec::new(),
                coeffs: Vec::new(),
                tree: Some(tree),
            });
        }
        Ok(())
    }
}

fn parse_scalar_operand(names: &mut NameInterner, text: &str) -> Operand {
    match text.parse::<i64>() {
        Ok(v) => Operand::Integer(v),
        Err(_) => Operand::Variable(names.intern(text)),
    }
}

fn tuple_value_as_i64(v: TupleValue) -> i64 {
    match v {
        TupleValue::Value(n) => n,
        TupleValue::Star => xcsp3_ir::STAR,
    }
}

fn parse_domain_text(text: &str) -> Result<xcsp3_ir::IntegerDomain> {
    let mut domain = xcsp3_ir::IntegerDomain::new();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(domain);
    }
    for tok in trimmed.split_whitespace() {
        if let Some(idx) = tok.find("..") {
            let lo: i64 = tok[..idx].parse().map_err(|_| syntax_error(tok))?;
            let hi: i64 = tok[idx + 2..].parse().map_err(|_| syntax_error(tok))?;
            domain.add_interval(lo, hi)?;
        } else {
            let v: i64 = tok.parse().map_err(|_| syntax_error(tok))?;
            domain.add_value(v)?;
        }
    }
    Ok(domain)
}

fn domain_values(domain: &xcsp3_ir::IntegerDomain) -> Vec<i64> {
    let mut out = Vec::new();
    for entity in domain.entities() {
        match *entity {
            xcsp3_ir::DomainEntity::Value(v) => out.push(v),
            xcsp3_ir::DomainEntity::Interval { min, max } => out.extend(min..=max),
        }
    }
    out
}

fn parse_transitions(text: &str) -> Result<Vec<Transition>> {
    let trimmed = text.trim();
    let mut out = Vec::new();
    let bytes = trimmed.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                let close = trimmed[i..].find(')').map(|rel| i + rel).ok_or_else(|| syntax_error(trimmed))?;
                let inner = &trimmed[i + 1..close];
                let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
                if fields.len() != 3 {
                    return Err(syntax_error(inner));
                }
                let value: i64 = fields[1].parse().map_err(|_| syntax_error(inner))?;
                out.push(Transition { from: fields[0].to_string(), value, to: fields[2].to_string() });
                i = close + 1;
            }
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            _ => return Err(syntax_error(&trimmed[i..])),
        }
    }
    Ok(out)
}

/// Finds the highest `%k` placeholder referenced anywhere in an
/// intension/primitive template tree, used to size a slide's window
/// when no explicit arity is given.
fn max_placeholder(arena: &ExprArena, kind: &ConstraintKind) -> Option<u32> {
    match kind {
        ConstraintKind::Intension { tree } | ConstraintKind::Primitive { tree } => max_param_in(arena, *tree),
        _ => None,
    }
}

fn max_param_in(arena: &ExprArena, id: ExprId) -> Option<u32> {
    if let xcsp3_ir::ExprKind::Param(k) = arena.get(id) {
        return Some(k);
    }
    xcsp3_canon::children_of(arena, id)
        .into_iter()
        .filter_map(|c| max_param_in(arena, c))
        .max()
}

fn build_constraint_kind(names: &mut NameInterner, family: Family, pending: &mut Pending) -> Result<ConstraintKind> {
    let list = pending.lists.first().cloned().unwrap_or_default();
    Ok(match family {
        Family::Extension => ConstraintKind::Extension {
            list,
            tuples: std::mem::take(&mut pending.tuples),
            is_support: pending.is_support,
        },
        Family::Regular => ConstraintKind::Regular {
            list,
            start: pending.start_state.clone().unwrap_or_default(),
            finals: std::mem::take(&mut pending.final_states),
            transitions: std::mem::take(&mut pending.transitions),
        },
        Family::Mdd => ConstraintKind::Mdd { list, transitions: std::mem::take(&mut pending.transitions) },
        Family::AllDifferent => {
            if !pending.matrix.is_empty() {
                ConstraintKind::AllDifferentMatrix { matrix: std::mem::take(&mut pending.matrix) }
            } else if pending.lists.len() > 1 {
                ConstraintKind::AllDifferentList { lists: std::mem::take(&mut pending.lists) }
            } else {
                ConstraintKind::AllDifferent { list, except: std::mem::take(&mut pending.except) }
            }
        }
        Family::AllEqual => ConstraintKind::AllEqual { list },
        Family::NotAllEqual => ConstraintKind::NotAllEqual { list },
        Family::Ordered => ConstraintKind::Ordered {
            list,
            order: pending.operator.unwrap_or(OrderType::Lt),
            lengths: std::mem::take(&mut pending.lengths_int),
        },
        Family::Lex => {
            let order = pending.operator.unwrap_or(OrderType::Lt);
            if !pending.matrix.is_empty() {
                ConstraintKind::LexMatrix { matrix: std::mem::take(&mut pending.matrix), order }
            } else {
                ConstraintKind::Lex { lists: std::mem::take(&mut pending.lists), order }
            }
        }
        Family::Sum => ConstraintKind::Sum {
            list,
            coeffs: std::mem::take(&mut pending.coeffs),
            condition: pending.condition.take().ok_or_else(|| syntax_error("sum"))?,
        },
        Family::Count => ConstraintKind::Count {
            list,
            values: std::mem::take(&mut pending.values),
            condition: pending.condition.take().ok_or_else(|| syntax_error("count"))?,
        },
        Family::NValues => ConstraintKind::NValues {
            list,
            except: std::mem::take(&mut pending.except),
            condition: pending.condition.take().ok_or_else(|| syntax_error("nValues"))?,
        },
        Family::Cardinality => ConstraintKind::Cardinality {
            list,
            values: std::mem::take(&mut pending.values),
            occurs_min: Vec::new(),
            occurs_max: Vec::new(),
            closed: pending.closed,
        },
        Family::Minimum => ConstraintKind::Minimum {
            list,
            condition: pending.condition.take(),
            start_index: pending.list_start_index,
            rank: pending.indices.first().map_or(Rank::Any, |(_, r)| *r),
        },
        Family::Maximum => ConstraintKind::Maximum {
            list,
            condition: pending.condition.take(),
            start_index: pending.list_start_index,
            rank: pending.indices.first().map_or(Rank::Any, |(_, r)| *r),
        },
        Family::Element => {
            let value = pending.value_operand.take().unwrap_or(Operand::Integer(0));
            if !pending.matrix.is_empty() {
                let row_index = pending.indices.first().map(|(n, _)| *n).unwrap_or_else(|| names.intern(""));
                let col_index = pending.indices.get(1).map(|(n, _)| *n).unwrap_or_else(|| names.intern(""));
                ConstraintKind::ElementMatrix {
                    matrix: std::mem::take(&mut pending.matrix),
                    row_index,
                    col_index,
                    start_row_index: pending.list_start_index,
                    start_col_index: pending.list_start_index,
                    value,
                }
            } else {
                let (index, rank) = pending.indices.first().copied().unwrap_or((names.intern(""), Rank::Any));
                ConstraintKind::Element { list, index, start_index: pending.list_start_index, rank, value }
            }
        }
        Family::Channel => ConstraintKind::Channel {
            list,
            start_index: pending.list_start_index,
            list2: pending.lists.get(1).cloned(),
            start_index2: 0,
        },
        Family::Stretch => ConstraintKind::Stretch {
            list,
            values: std::mem::take(&mut pending.values),
            widths_min: std::mem::take(&mut pending.widths_min),
            widths_max: std::mem::take(&mut pending.widths_max),
            patterns: std::mem::take(&mut pending.patterns),
        },
        Family::NoOverlap => ConstraintKind::NoOverlap {
            origins: std::mem::take(&mut pending.origins),
            lengths: std::mem::take(&mut pending.lengths_name),
            zero_ignored: pending.zero_ignored,
        },
        Family::Cumulative => ConstraintKind::Cumulative {
            origins: std::mem::take(&mut pending.origins),
            lengths: std::mem::take(&mut pending.lengths_name),
            heights: std::mem::take(&mut pending.heights),
            condition: pending.condition.take().ok_or_else(|| syntax_error("cumulative"))?,
        },
        Family::Instantiation => {
            ConstraintKind::Instantiation { list, values: std::mem::take(&mut pending.values) }
        }
        Family::Clause => ConstraintKind::Clause {
            positive: list,
            negative: pending.lists.get(1).cloned().unwrap_or_default(),
        },
        Family::Circuit => {
            ConstraintKind::Circuit { list, start_index: pending.list_start_index, size: pending.size }
        }
        Family::Intension => unreachable!("handled by caller"),
    })
}
