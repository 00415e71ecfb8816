//! Item- and collection-level cost validators.

use serde_json::Value;

use crate::error::{CostwiseError, CostwiseResult, ValidationError};
use crate::types::{FixedCostItem, VariableCostItem};

/// Raw cost-definition file shape. Both keys are optional: a missing or
/// non-array key defaults to an empty list rather than an error.
#[derive(Debug, Default)]
pub struct CostFile {
    pub variable_costs: Vec<VariableCostItem>,
    pub fixed_costs: Vec<FixedCostItem>,
    /// Per-item errors for elements that were dropped, for warning display.
    pub warnings: Vec<ValidationError>,
}

impl CostFile {
    /// Validate a parsed cost-definition document.
    pub fn from_value(doc: &Value) -> CostwiseResult<Self> {
        let empty = Value::Array(Vec::new());
        let variable_raw = match doc.get("variableCosts") {
            Some(v) if v.is_array() => v,
            _ => &empty,
        };
        let fixed_raw = match doc.get("fixedCosts") {
            Some(v) if v.is_array() => v,
            _ => &empty,
        };

        let (variable_costs, mut warnings) = validate_variable_costs(variable_raw)?;
        let (fixed_costs, fixed_warnings) = validate_fixed_costs(fixed_raw)?;
        warnings.extend(fixed_warnings);

        Ok(Self {
            variable_costs,
            fixed_costs,
            warnings,
        })
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A finite number, range-checked for non-negativity. First failing rule
/// determines the error message, which always names the field.
fn require_non_negative_number(obj: &Value, field: &str) -> Result<f64, ValidationError> {
    let raw = obj
        .get(field)
        .ok_or_else(|| ValidationError::new(field, "is required"))?;
    let n = raw.as_f64().ok_or_else(|| {
        ValidationError::with_value(field, value_type_name(raw), "must be a number")
    })?;
    if n.is_nan() {
        return Err(ValidationError::new(field, "must not be NaN"));
    }
    if !n.is_finite() {
        return Err(ValidationError::new(field, "must be finite"));
    }
    if n < 0.0 {
        return Err(ValidationError::with_value(
            field,
            n.to_string(),
            "must not be negative",
        ));
    }
    Ok(n)
}

/// A string that is non-empty after trimming.
fn require_non_empty_string(obj: &Value, field: &str) -> Result<String, ValidationError> {
    let raw = obj
        .get(field)
        .ok_or_else(|| ValidationError::new(field, "is required"))?;
    let s = raw.as_str().ok_or_else(|| {
        ValidationError::with_value(field, value_type_name(raw), "must be a string")
    })?;
    if s.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    Ok(s.to_string())
}

fn optional_string(obj: &Value, field: &str) -> String {
    obj.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Validate a single raw variable cost record.
///
/// Validation order: object check, then per-field presence/type, then numeric
/// range, then id/name/unit non-emptiness. Never panics.
pub fn validate_variable_cost_item(value: &Value) -> Result<VariableCostItem, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::with_value(
            "item",
            value_type_name(value),
            "must be an object",
        ));
    }

    let cost_per_unit = require_non_negative_number(value, "costPerUnit")?;
    let usage_per_customer = require_non_negative_number(value, "usagePerCustomer")?;
    let id = require_non_empty_string(value, "id")?;
    let name = require_non_empty_string(value, "name")?;
    let unit = require_non_empty_string(value, "unit")?;

    Ok(VariableCostItem {
        id,
        name,
        unit,
        cost_per_unit,
        usage_per_customer,
        description: optional_string(value, "description"),
    })
}

/// Validate a single raw fixed cost record.
pub fn validate_fixed_cost_item(value: &Value) -> Result<FixedCostItem, ValidationError> {
    if !value.is_object() {
        return Err(ValidationError::with_value(
            "item",
            value_type_name(value),
            "must be an object",
        ));
    }

    let monthly_cost = require_non_negative_number(value, "monthlyCost")?;
    let id = require_non_empty_string(value, "id")?;
    let name = require_non_empty_string(value, "name")?;

    Ok(FixedCostItem {
        id,
        name,
        monthly_cost,
        description: optional_string(value, "description"),
    })
}

fn validate_collection<T>(
    value: &Value,
    field: &str,
    validate_item: impl Fn(&Value) -> Result<T, ValidationError>,
) -> CostwiseResult<(Vec<T>, Vec<ValidationError>)> {
    let items = value.as_array().ok_or_else(|| CostwiseError::NotASequence {
        field: field.to_string(),
    })?;

    // An empty input sequence is a success, distinct from "items provided but
    // all invalid" below.
    if items.is_empty() {
        return Ok((Vec::new(), Vec::new()));
    }

    let mut valid = Vec::new();
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        match validate_item(item) {
            Ok(parsed) => valid.push(parsed),
            Err(mut err) => {
                err.field = format!("{field}[{index}].{}", err.field);
                errors.push(err);
            }
        }
    }

    if valid.is_empty() {
        return Err(CostwiseError::AllItemsInvalid {
            field: field.to_string(),
            errors,
        });
    }

    Ok((valid, errors))
}

/// Validate a sequence of raw variable cost records.
///
/// Invalid elements are dropped and reported as warnings as long as at least
/// one element validates. A non-array input or an all-invalid non-empty input
/// is a hard failure.
pub fn validate_variable_costs(
    value: &Value,
) -> CostwiseResult<(Vec<VariableCostItem>, Vec<ValidationError>)> {
    validate_collection(value, "variableCosts", validate_variable_cost_item)
}

/// Validate a sequence of raw fixed cost records. Same partial-failure
/// contract as [`validate_variable_costs`].
pub fn validate_fixed_costs(
    value: &Value,
) -> CostwiseResult<(Vec<FixedCostItem>, Vec<ValidationError>)> {
    validate_collection(value, "fixedCosts", validate_fixed_cost_item)
}
