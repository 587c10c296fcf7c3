//! Condition, filter, and key-condition compilation.
//!
//! The three clauses share one builder: every `(key, value)` entry of the
//! clause map renders one parenthesized sub-expression, and the
//! sub-expressions join with the clause's logical operator. An array value
//! fans out into one sub-expression per element, all on the same field.
//! Name and value placeholder maps accumulate alongside the expression
//! string; both merge into whatever the caller pre-seeded.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use dynoexpr_model::params::{ClauseMap, ExpressionParams, LogicalOperator};
use dynoexpr_model::value::AttrValue;

use crate::codec::{attr_name, attr_value, single_attr_name, split_by_dot};
use crate::parser::{ConditionExpr, ConditionKind, parse_condition_value};

/// Expand array values into one `(key, value)` pair per element.
fn flatten_clause(clause: &ClauseMap) -> Vec<(&str, &JsonValue)> {
    clause
        .iter()
        .flat_map(|(key, value)| match value {
            JsonValue::Array(values) => {
                values.iter().map(|v| (key.as_str(), v)).collect::<Vec<_>>()
            }
            other => vec![(key.as_str(), other)],
        })
        .collect()
}

/// Render one sub-expression for a clause entry (without the outer parens).
fn render_entry(key: &str, value: &JsonValue) -> String {
    let name = attr_name(key);
    let JsonValue::String(raw) = value else {
        return format!("{name} = {}", attr_value(value));
    };

    let ConditionExpr { negated, kind } = parse_condition_value(raw);
    let rendered = match &kind {
        ConditionKind::Compare { op, operand } => {
            format!("{name} {op} {}", attr_value(operand))
        }
        ConditionKind::Between { low, high } => {
            format!("{name} between {} and {}", attr_value(low), attr_value(high))
        }
        ConditionKind::In { list } => {
            let values: Vec<String> = list.iter().map(attr_value).collect();
            format!("{name} in ({})", values.join(","))
        }
        ConditionKind::AttributeExists => format!("attribute_exists({name})"),
        ConditionKind::AttributeNotExists => format!("attribute_not_exists({name})"),
        ConditionKind::AttributeType { operand } => {
            format!("attribute_type({name},{})", attr_value(operand))
        }
        ConditionKind::BeginsWith { operand } => {
            format!("begins_with({name},{})", attr_value(operand))
        }
        ConditionKind::Contains { operand } => {
            format!("contains({name},{})", attr_value(operand))
        }
        ConditionKind::Size { op, operand } => {
            format!("size({name}) {op} {}", attr_value(operand))
        }
        ConditionKind::Equals { operand } => {
            format!("{name} = {}", attr_value(operand))
        }
    };

    if negated {
        format!("not {rendered}")
    } else {
        rendered
    }
}

/// Build the boolean expression string for one clause.
#[must_use]
pub fn build_condition_expression(clause: &ClauseMap, operator: LogicalOperator) -> String {
    flatten_clause(clause)
        .into_iter()
        .map(|(key, value)| format!("({})", render_entry(key, value)))
        .collect::<Vec<_>>()
        .join(&format!(" {operator} "))
}

/// Merge one name-map entry per dotted segment of every clause key.
///
/// Segments already carrying a `#` prefix are pre-encoded by the caller and
/// contribute no entry.
pub fn build_condition_attribute_names(clause: &ClauseMap, names: &mut BTreeMap<String, String>) {
    for key in clause.keys() {
        for segment in split_by_dot(key) {
            if segment.starts_with('#') {
                continue;
            }
            names.insert(single_attr_name(&segment), segment);
        }
    }
}

/// Merge one value-map entry per extracted operand of every clause entry.
///
/// The exists functions contribute nothing; operands that are pre-supplied
/// `:`-references stay references and contribute nothing either.
pub fn build_condition_attribute_values(
    clause: &ClauseMap,
    values: &mut BTreeMap<String, AttrValue>,
) {
    for (_, value) in flatten_clause(clause) {
        if let JsonValue::String(raw) = value {
            let parsed = parse_condition_value(raw);
            for operand in parsed.kind.operands() {
                insert_value(values, operand);
            }
        } else {
            insert_value(values, value);
        }
    }
}

fn insert_value(values: &mut BTreeMap<String, AttrValue>, operand: &JsonValue) {
    if let JsonValue::String(s) = operand {
        if s.starts_with(':') {
            return;
        }
    }
    values.insert(attr_value(operand), AttrValue::Json(operand.clone()));
}

/// Compile one clause into `params`, consuming the clause input.
fn compile_clause(
    params: &mut ExpressionParams,
    clause: &ClauseMap,
    operator: Option<LogicalOperator>,
) -> String {
    build_condition_attribute_names(clause, &mut params.expression_attribute_names);
    build_condition_attribute_values(clause, &mut params.expression_attribute_values);
    build_condition_expression(clause, operator.unwrap_or_default())
}

/// Compile the `Condition` clause; no-op when absent.
pub fn get_condition_expression(params: &mut ExpressionParams) {
    let Some(clause) = params.condition.take() else {
        return;
    };
    let operator = params.condition_logical_operator.take();
    params.condition_expression = Some(compile_clause(params, &clause, operator));
}

/// Compile the `Filter` clause; no-op when absent.
pub fn get_filter_expression(params: &mut ExpressionParams) {
    let Some(clause) = params.filter.take() else {
        return;
    };
    let operator = params.filter_logical_operator.take();
    params.filter_expression = Some(compile_clause(params, &clause, operator));
}

/// Compile the `KeyCondition` clause; no-op when absent.
pub fn get_key_condition_expression(params: &mut ExpressionParams) {
    let Some(clause) = params.key_condition.take() else {
        return;
    };
    let operator = params.key_condition_logical_operator.take();
    params.key_condition_expression = Some(compile_clause(params, &clause, operator));
}
