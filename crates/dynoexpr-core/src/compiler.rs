//! Top-level orchestration.
//!
//! `Dynoexpr` sequences the clause compilers over one parameter object:
//! key-condition, condition, filter, projection, single-action update, and
//! the split-clause update combinator, in that order. Each stage consumes
//! its clause input and merges into the shared placeholder maps, which is
//! how placeholder reuse across clauses falls out for free. After the
//! stages run, any native set left in the value map is promoted through the
//! configured set adapter; with no adapter configured that is the one hard
//! failure in the pipeline.
//!
//! Batch and transact requests are thin fan-outs: the same single-item
//! compilation applied per sub-request.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use dynoexpr_model::error::ExpressionError;
use dynoexpr_model::params::ExpressionParams;
use dynoexpr_model::request::{BatchItems, BatchRequest, Request, TransactItem, TransactRequest};
use dynoexpr_model::value::AttrValue;

use crate::adapter::{CreateSetOptions, SetAdapter};
use crate::condition::{
    get_condition_expression, get_filter_expression, get_key_condition_expression,
};
use crate::projection::get_projection_expression;
use crate::update::{get_update_expression, get_update_operations_expression};

/// The expression compiler.
///
/// Holds the optional set adapter; everything else is stateless. Cheap to
/// clone and safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct Dynoexpr {
    set_adapter: Option<Arc<dyn SetAdapter>>,
}

impl Dynoexpr {
    /// A compiler with no set adapter configured.
    ///
    /// Compilation fails only when a native set value actually reaches the
    /// output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler using `adapter` to construct vendor sets.
    #[must_use]
    pub fn with_set_adapter(adapter: impl SetAdapter + 'static) -> Self {
        Self {
            set_adapter: Some(Arc::new(adapter)),
        }
    }

    /// Compile a request of any shape.
    pub fn compile(&self, request: Request) -> Result<Request, ExpressionError> {
        match request {
            Request::Single(params) => Ok(Request::Single(Box::new(
                self.compile_params(*params)?,
            ))),
            Request::Batch(batch) => self.compile_batch(batch).map(Request::Batch),
            Request::Transact(transact) => self.compile_transact(transact).map(Request::Transact),
        }
    }

    /// Compile a single-item parameter object.
    pub fn compile_params(
        &self,
        mut params: ExpressionParams,
    ) -> Result<ExpressionParams, ExpressionError> {
        get_key_condition_expression(&mut params);
        get_condition_expression(&mut params);
        get_filter_expression(&mut params);
        get_projection_expression(&mut params);
        get_update_expression(&mut params);
        get_update_operations_expression(&mut params);
        self.promote_sets(&mut params)?;

        tracing::debug!(
            names = params.expression_attribute_names.len(),
            values = params.expression_attribute_values.len(),
            "compiled expression parameters"
        );
        Ok(params)
    }

    /// Compile each get sub-request of a batch; write sub-requests pass
    /// through unchanged.
    fn compile_batch(&self, mut batch: BatchRequest) -> Result<BatchRequest, ExpressionError> {
        for items in batch.request_items.values_mut() {
            if let BatchItems::Get(params) = items {
                **params = self.compile_params(std::mem::take(&mut **params))?;
            }
        }
        Ok(batch)
    }

    /// Compile the inner object of every transact item.
    fn compile_transact(
        &self,
        mut transact: TransactRequest,
    ) -> Result<TransactRequest, ExpressionError> {
        for item in &mut transact.transact_items {
            let (TransactItem::Get(params)
            | TransactItem::Put(params)
            | TransactItem::Delete(params)
            | TransactItem::Update(params)
            | TransactItem::ConditionCheck(params)) = item;
            **params = self.compile_params(std::mem::take(&mut **params))?;
        }
        Ok(transact)
    }

    /// Replace native sets in the value map with vendor sets.
    fn promote_sets(&self, params: &mut ExpressionParams) -> Result<(), ExpressionError> {
        for value in params.expression_attribute_values.values_mut() {
            if let AttrValue::Set(set) = &*value {
                let Some(adapter) = &self.set_adapter else {
                    return Err(ExpressionError::MissingSetAdapter);
                };
                let vendor = adapter.create_set(set.members(), CreateSetOptions::default())?;
                *value = AttrValue::Vendor(vendor);
            }
        }
        Ok(())
    }
}

/// Compile a raw parameter object with a default (adapter-less) compiler.
///
/// Classifies the input into its request shape, compiles it, and returns
/// the same shape with expressions and placeholder maps filled in and
/// internal-only keys removed.
pub fn dynoexpr(input: JsonValue) -> Result<JsonValue, ExpressionError> {
    let request = Request::from_value(input)?;
    let compiled = Dynoexpr::new().compile(request)?;
    Ok(serde_json::to_value(compiled)?)
}
