use serde::de::DeserializeOwned;

use crate::{
    foundation::error::{PortaError, PortaResult},
    ops::ParamSpec,
};

/// Parameter struct for operations that take none.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct NoParams {}

/// Decode a JSON parameter object into an operation's typed parameter struct.
///
/// `null` yields the defaults. Keys not in `specs` fail with `UnknownParameter`; malformed
/// values fail with `InvalidParameter`.
pub(crate) fn parse_params<T>(op: &str, specs: &[ParamSpec], raw: &serde_json::Value) -> PortaResult<T>
where
    T: DeserializeOwned + Default,
{
    let map = match raw {
        serde_json::Value::Null => return Ok(T::default()),
        serde_json::Value::Object(map) => map,
        other => {
            return Err(PortaError::invalid_parameter(
                op,
                "<params>",
                format!("expected an object, got {other}"),
            ));
        }
    };

    if let Some(unknown) = map.keys().find(|k| !specs.iter().any(|s| s.name == k.as_str())) {
        return Err(PortaError::UnknownParameter {
            op: op.to_string(),
            name: unknown.clone(),
        });
    }

    serde_json::from_value(raw.clone()).map_err(|e| {
        // Parameter structs default every field, so a single-key object isolates the culprit.
        let name = map
            .iter()
            .find(|(k, v)| {
                let single = serde_json::Value::Object(
                    std::iter::once(((*k).clone(), (*v).clone())).collect(),
                );
                serde_json::from_value::<T>(single).is_err()
            })
            .map(|(k, _)| k.clone())
            .unwrap_or_else(|| "<params>".to_string());
        PortaError::invalid_parameter(op, name, e.to_string())
    })
}

/// Reject non-finite values and values outside `[min, max]`.
pub(crate) fn check_range(op: &str, name: &str, v: f64, min: f64, max: f64) -> PortaResult<()> {
    if !v.is_finite() || v < min || v > max {
        return Err(PortaError::invalid_parameter(
            op,
            name,
            format!("{v} is outside [{min}, {max}]"),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/ops/params.rs"]
mod tests;
