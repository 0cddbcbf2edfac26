use crate::DemesError;
use serde_json::Value;

// JSON has no encoding for infinity, and writers
// emit null in its place. Only start times may be
// infinite, so those nulls become "Infinity".
fn fix_null_start_time(object: &mut Value) {
    if let Some(value) = object.get_mut("start_time") {
        if value.is_null() {
            *value = Value::from("Infinity");
        }
    }
}

fn fix_null_start_times_in_list(value: Option<&mut Value>) {
    if let Some(Value::Array(items)) = value {
        items.iter_mut().for_each(fix_null_start_time);
    }
}

pub(crate) fn fix_json_input(input: Value) -> Result<Value, DemesError> {
    let mut input = input;
    if !input.is_object() {
        return Err(DemesError::ParseError(
            "a graph must be a JSON object".to_string(),
        ));
    }
    fix_null_start_times_in_list(input.get_mut("demes"));
    fix_null_start_times_in_list(input.get_mut("migrations"));
    if let Some(defaults) = input.get_mut("defaults") {
        for key in ["deme", "migration"] {
            if let Some(object) = defaults.get_mut(key) {
                fix_null_start_time(object);
            }
        }
    }
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_start_times() {
        let json = r#"{
            "defaults": {"deme": {"start_time": null}},
            "demes": [{"name": "A", "start_time": null, "epochs": [{"start_size": 1}]}],
            "migrations": [{"source": "A", "dest": "B", "start_time": null, "rate": 0.1}]
        }"#;
        let value: Value = serde_json::from_str(json).unwrap();
        let value = fix_json_input(value).unwrap();
        assert_eq!(value["demes"][0]["start_time"], "Infinity");
        assert_eq!(value["migrations"][0]["start_time"], "Infinity");
        assert_eq!(value["defaults"]["deme"]["start_time"], "Infinity");
    }

    #[test]
    fn test_json_matches_yaml() {
        let yaml = "
time_units: generations
demes:
 - name: A
   epochs:
    - start_size: 100
      end_time: 50
 - name: B
   ancestors: [A]
   epochs:
    - start_size: 100
      end_size: 200
";
        let from_yaml = crate::loads(yaml).unwrap();
        let json = from_yaml.as_json_string().unwrap();
        let from_json = crate::loads_json(&json).unwrap();
        assert_eq!(from_yaml, from_json);
        let reader = std::io::Cursor::new(json.into_bytes());
        assert_eq!(from_yaml, crate::load_json(reader).unwrap());
    }

    #[test]
    #[should_panic]
    fn test_not_an_object() {
        let _ = crate::loads_json("[1, 2, 3]").unwrap();
    }
}
