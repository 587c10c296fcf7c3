//! Projection compilation.
//!
//! Maps the `Projection` field list to a comma-joined placeholder list.
//! Name-map merging is first-writer-wins, so caller-supplied aliases for the
//! same placeholder survive compilation.

use dynoexpr_model::params::ExpressionParams;

use crate::codec::{attr_name, single_attr_name, split_by_dot};

/// Compile the `Projection` clause; no-op when absent.
pub fn get_projection_expression(params: &mut ExpressionParams) {
    let Some(projection) = params.projection.take() else {
        return;
    };

    let fields: Vec<String> = projection.iter().map(|field| field.trim().to_owned()).collect();

    params.projection_expression = Some(
        fields
            .iter()
            .map(|field| attr_name(field))
            .collect::<Vec<_>>()
            .join(","),
    );

    for field in &fields {
        for segment in split_by_dot(field) {
            if segment.starts_with('#') {
                continue;
            }
            params
                .expression_attribute_names
                .entry(single_attr_name(&segment))
                .or_insert(segment);
        }
    }
}
