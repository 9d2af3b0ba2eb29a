// Aggregate values for items with entity_id "calculated"
use crate::application::entity_resolver::EntityResolver;
use crate::domain::item::{CalcEntity, CalcFunction};
use crate::error::CalcError;
use serde_json::{Number, Value};

/// Apply `function` to the numeric values of `inputs`.
/// `Ok(None)` means the function is not supported and the value stays unset.
pub fn calculate(
    function: CalcFunction,
    inputs: &[CalcEntity],
    resolver: &EntityResolver<'_>,
) -> Result<Option<f64>, CalcError> {
    if function == CalcFunction::Unsupported {
        return Ok(None);
    }

    let values = inputs
        .iter()
        .map(|input| numeric_input(input, resolver))
        .collect::<Result<Vec<f64>, CalcError>>()?;

    if values.is_empty() {
        return Err(CalcError::NoInputs);
    }

    let result = match function {
        CalcFunction::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        CalcFunction::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        CalcFunction::Sum => values.iter().sum(),
        CalcFunction::Mean => values.iter().sum::<f64>() / values.len() as f64,
        CalcFunction::Unsupported => return Ok(None),
    };

    Ok(Some(result))
}

fn numeric_input(input: &CalcEntity, resolver: &EntityResolver<'_>) -> Result<f64, CalcError> {
    let value = resolver
        .value(&input.entity_id, input.attribute.as_deref())
        .ok_or_else(|| CalcError::MissingEntity(input.entity_id.clone()))?;

    to_number(&value).ok_or_else(|| CalcError::NotNumeric {
        entity_id: input.entity_id.clone(),
        value: match value {
            Value::String(s) => s,
            other => other.to_string(),
        },
    })
}

/// Numeric reading of a state or attribute value. Entity states are strings.
pub fn to_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// JSON value for a computed number; integral results become JSON integers.
pub fn number_value(number: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null)
    }
}
