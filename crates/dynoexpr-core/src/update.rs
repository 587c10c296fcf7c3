//! Update expression compilation.
//!
//! Two layers: a single-action compiler for `Update` + `UpdateAction`
//! (default `SET`), and a combinator for the split clauses `UpdateSet`,
//! `UpdateRemove`, `UpdateAdd`, `UpdateDelete` that merges the per-action
//! fragments into one `UpdateExpression` in SET, REMOVE, ADD, DELETE order.
//!
//! `SET` values go through the update mini-grammar (`if_not_exists`,
//! `list_append`, arithmetic delta, plain assignment). `ADD`/`DELETE`
//! promote array values to native sets before placeholder hashing, so
//! member order and repetition do not change the placeholder.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use dynoexpr_model::params::{ClauseMap, ExpressionParams, UpdateAction};
use dynoexpr_model::value::{AttrValue, SetLiteral};

use crate::codec::{attr_name, attr_value_of, single_attr_name, split_by_dot};
use crate::parser::{ListAppendOperand, MathOperand, SetValueExpr, parse_set_value};

/// Insert a value into the map and return its placeholder token.
///
/// Pre-supplied `:`-references are used verbatim and never enter the map.
fn push_value(values: &mut BTreeMap<String, AttrValue>, value: AttrValue) -> String {
    if let AttrValue::Json(JsonValue::String(s)) = &value {
        if s.starts_with(':') {
            return s.clone();
        }
    }
    let token = attr_value_of(&value);
    values.insert(token.clone(), value);
    token
}

/// Render one `SET` entry: `<name> = <rhs>`.
fn render_set_entry(
    key: &str,
    value: &JsonValue,
    values: &mut BTreeMap<String, AttrValue>,
) -> String {
    let name = attr_name(key);
    let JsonValue::String(raw) = value else {
        let token = push_value(values, AttrValue::Json(value.clone()));
        return format!("{name} = {token}");
    };

    match parse_set_value(key, raw) {
        SetValueExpr::IfNotExists { operand } => {
            let token = push_value(values, AttrValue::Json(JsonValue::String(operand)));
            format!("{name} = if_not_exists({name}, {token})")
        }
        SetValueExpr::ListAppend { operands } => {
            let rendered: Vec<String> = operands
                .into_iter()
                .map(|operand| match operand {
                    ListAppendOperand::Field => name.clone(),
                    ListAppendOperand::Literal(members) => {
                        push_value(values, AttrValue::Json(JsonValue::Array(members)))
                    }
                    ListAppendOperand::Token(token) => token,
                })
                .collect();
            format!("{name} = list_append({})", rendered.join(", "))
        }
        SetValueExpr::Math { left, op, right } => {
            let mut render_operand = |operand: MathOperand| match operand {
                MathOperand::Field => name.clone(),
                MathOperand::Literal(number) => {
                    push_value(values, AttrValue::Json(JsonValue::Number(number)))
                }
            };
            let left = render_operand(left);
            let right = render_operand(right);
            format!("{name} = {left} {op} {right}")
        }
        SetValueExpr::Assign => {
            let token = push_value(values, AttrValue::Json(value.clone()));
            format!("{name} = {token}")
        }
    }
}

/// Build one action's `UpdateExpression` fragment, merging placeholder maps.
fn build_update_expression(
    clause: &ClauseMap,
    action: UpdateAction,
    names: &mut BTreeMap<String, String>,
    values: &mut BTreeMap<String, AttrValue>,
) -> String {
    let mut entries = Vec::with_capacity(clause.len());
    for (key, value) in clause {
        for segment in split_by_dot(key) {
            if !segment.starts_with('#') {
                names.insert(single_attr_name(&segment), segment);
            }
        }

        let entry = match action {
            UpdateAction::Set => render_set_entry(key, value, values),
            UpdateAction::Add | UpdateAction::Delete => {
                let promoted = match value {
                    JsonValue::Array(members) => {
                        AttrValue::Set(SetLiteral::from_members(members.iter().cloned()))
                    }
                    other => AttrValue::Json(other.clone()),
                };
                let token = push_value(values, promoted);
                format!("{} {token}", attr_name(key))
            }
            UpdateAction::Remove => attr_name(key),
        };
        entries.push(entry);
    }
    format!("{action} {}", entries.join(", "))
}

/// Compile the single-action `Update` clause; no-op when absent.
///
/// `UpdateAction` is consumed either way: it is an internal-only key and
/// must not leak into the output.
pub fn get_update_expression(params: &mut ExpressionParams) {
    let action = params.update_action.take().unwrap_or_default();
    let Some(clause) = params.update.take() else {
        return;
    };
    if clause.is_empty() {
        return;
    }
    params.update_expression = Some(build_update_expression(
        &clause,
        action,
        &mut params.expression_attribute_names,
        &mut params.expression_attribute_values,
    ));
}

/// Compile the split update clauses and merge all fragments.
///
/// Runs after the single-action path; any `UpdateExpression` that path
/// produced seeds the fragment list, so both forms appearing together merge
/// rather than overwrite. Identical fragments are emitted once.
pub fn get_update_operations_expression(params: &mut ExpressionParams) {
    let clauses = [
        (UpdateAction::Set, params.update_set.take()),
        (UpdateAction::Remove, params.update_remove.take()),
        (UpdateAction::Add, params.update_add.take()),
        (UpdateAction::Delete, params.update_delete.take()),
    ];
    if clauses.iter().all(|(_, clause)| clause.is_none()) {
        return;
    }

    let mut fragments: Vec<String> = params.update_expression.take().into_iter().collect();
    for (action, clause) in clauses {
        let Some(clause) = clause else { continue };
        if clause.is_empty() {
            continue;
        }
        fragments.push(build_update_expression(
            &clause,
            action,
            &mut params.expression_attribute_names,
            &mut params.expression_attribute_values,
        ));
    }

    let mut kept: Vec<String> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if !kept.contains(&fragment) {
            kept.push(fragment);
        }
    }
    if !kept.is_empty() {
        params.update_expression = Some(kept.join(" "));
    }
}
