use crate::errors::{Error, Result};
use crate::model::{ReadingPayload, RegisterRequest};
use serde_json::Value;

/// Parses and validates a registration body. `lat`/`lon` may arrive as JSON
/// numbers or numeric strings (the reference UI submits form strings);
/// anything unparsable is rejected rather than defaulted.
pub fn parse_register(body: &Value) -> Result<RegisterRequest> {
    let obj = body
        .as_object()
        .ok_or_else(|| Error::Malformed("expected a JSON object".to_string()))?;

    let mac = obj
        .get("mac")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Validation("Missing or non-string field: mac".to_string()))?;
    if mac.is_empty() {
        return Err(Error::Validation("Miner mac cannot be empty".to_string()));
    }

    let lat = number_field(obj, "lat")?;
    let lon = number_field(obj, "lon")?;

    Ok(RegisterRequest {
        mac: mac.to_string(),
        lat,
        lon,
    })
}

/// Parses and validates a sensor reading body. All three fields are
/// required; there is no semantic range check beyond being numbers.
pub fn parse_reading(body: &Value) -> Result<ReadingPayload> {
    let obj = body
        .as_object()
        .ok_or_else(|| Error::Malformed("expected a JSON object".to_string()))?;

    let rssi = numeric(obj, "rssi")?;
    let snr = numeric(obj, "snr")?;
    let size = obj
        .get("size")
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::Validation("Missing required field: size".to_string()))?;
    let size = u32::try_from(size)
        .map_err(|_| Error::Validation(format!("Field size out of range: {}", size)))?;

    Ok(ReadingPayload { rssi, snr, size })
}

fn numeric(obj: &serde_json::Map<String, Value>, field: &str) -> Result<f64> {
    obj.get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| Error::Validation(format!("Missing required field: {}", field)))
}

fn number_field(obj: &serde_json::Map<String, Value>, field: &str) -> Result<f64> {
    let value = obj
        .get(field)
        .ok_or_else(|| Error::Validation(format!("Missing required field: {}", field)))?;

    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|f| f.is_finite())
        .ok_or_else(|| Error::Validation(format!("Field {} is not a valid number", field)))
}
