use serde_json::Value;

// Bodies are read leniently: a missing or malformed body behaves like `{}`,
// so the handlers answer with their own 400/404 messages instead of a
// framework rejection.
fn parse_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap_or(Value::Null)
}

/// Body of `POST /users` and `PUT /users/:id`.
#[derive(Debug, Default, PartialEq)]
pub struct NameForm {
    pub name: Option<String>,
}

impl NameForm {
    pub fn from_body(body: &[u8]) -> Self {
        let name = parse_body(body)
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned);
        Self { name }
    }
}

/// Body of `PATCH /users/:id`. `hours_to_add` is `None` unless the field is a JSON number.
#[derive(Debug, Default, PartialEq)]
pub struct HoursForm {
    pub hours_to_add: Option<f64>,
}

impl HoursForm {
    pub fn from_body(body: &[u8]) -> Self {
        let hours_to_add = parse_body(body)
            .get("hoursToAdd")
            .and_then(Value::as_f64);
        Self { hours_to_add }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_form() {
        assert_eq!(NameForm::from_body(br#"{"name":"Test User"}"#).name.as_deref(), Some("Test User"));
        assert_eq!(NameForm::from_body(br#"{"name":42}"#).name, None);
        assert_eq!(NameForm::from_body(br#"{"newName":"x"}"#).name, None);
        assert_eq!(NameForm::from_body(b"").name, None);
        assert_eq!(NameForm::from_body(b"not json").name, None);
    }

    #[test]
    fn test_hours_form() {
        assert_eq!(HoursForm::from_body(br#"{"hoursToAdd":5}"#).hours_to_add, Some(5.0));
        assert_eq!(HoursForm::from_body(br#"{"hoursToAdd":-1.5}"#).hours_to_add, Some(-1.5));
        assert_eq!(HoursForm::from_body(br#"{"hoursToAdd":"5"}"#).hours_to_add, None);
        assert_eq!(HoursForm::from_body(br#"{}"#).hours_to_add, None);
    }
}
