pub mod card_vps;
pub mod score;

pub use card_vps::CardVpsStatType;
pub use score::{ScoreRestrictions, ScoreStatType};

use serde_json::{Map, Value};

use super::StatsError;

/// Reads an optional integer input. `null` counts as absent.
fn integer_input(input: &Map<String, Value>, name: &str) -> Result<Option<i64>, StatsError> {
    match input.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_i64()
            .map(Some)
            .ok_or_else(|| StatsError::Validation(format!("{name} must be an integer"))),
    }
}

fn text_input<'a>(
    input: &'a Map<String, Value>,
    name: &str,
) -> Result<Option<&'a str>, StatsError> {
    match input.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.as_str())),
        Some(_) => Err(StatsError::Validation(format!("{name} must be a string"))),
    }
}

fn check_bounds(
    name: &str,
    value: i64,
    min: Option<i64>,
    max: Option<i64>,
) -> Result<(), StatsError> {
    if let Some(min) = min {
        if value < min {
            return Err(StatsError::Validation(format!(
                "{name} must be at least {min}, got {value}"
            )));
        }
    }
    if let Some(max) = max {
        if value > max {
            return Err(StatsError::Validation(format!(
                "{name} must be at most {max}, got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn integer_input_treats_null_as_absent() {
        let map = input(json!({ "a": null, "b": 4 }));

        assert_eq!(integer_input(&map, "a").unwrap(), None);
        assert_eq!(integer_input(&map, "b").unwrap(), Some(4));
        assert_eq!(integer_input(&map, "c").unwrap(), None);
    }

    #[test]
    fn integer_input_rejects_fractions_and_strings() {
        let map = input(json!({ "a": 1.5, "b": "3" }));

        assert!(integer_input(&map, "a").is_err());
        assert!(integer_input(&map, "b").is_err());
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(check_bounds("n", 0, Some(0), Some(3)).is_ok());
        assert!(check_bounds("n", 3, Some(0), Some(3)).is_ok());
        assert!(check_bounds("n", -1, Some(0), None).is_err());
        assert!(check_bounds("n", 4, None, Some(3)).is_err());
    }
}
