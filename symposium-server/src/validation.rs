//! Registration payload validation
//!
//! Field-level checks over the raw JSON body. Every failing field is reported
//! at once so the form can highlight all of them; a payload with no errors is
//! converted into a [`NewRegistration`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use shared::catalog::{self, MAX_EVENT_ID};
use shared::models::{EventDetail, NewRegistration};

/// Field name → message; empty means the payload is valid
pub type FieldErrors = BTreeMap<String, String>;

const REQUIRED_FIELDS: [&str; 5] = ["name", "phone", "email", "college", "department"];

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|e| unreachable!("email regex: {e}"))
});

fn str_field<'a>(payload: &'a Value, field: &str) -> &'a str {
    payload.get(field).and_then(Value::as_str).unwrap_or("")
}

fn title_case(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn phone_digits(phone: &str) -> usize {
    phone.chars().filter(char::is_ascii_digit).count()
}

fn validate_selected_events(value: Option<&Value>) -> Option<String> {
    let Some(Value::Array(items)) = value else {
        return Some("Selected events must be a list.".into());
    };

    for item in items {
        match item.as_i64() {
            Some(id) if catalog::is_valid_event_id(id) => {}
            _ => {
                return Some(format!(
                    "Invalid event ID: {item}. Must be between 1 and {MAX_EVENT_ID}."
                ));
            }
        }
    }

    if items.is_empty() {
        return Some("Please select at least one event.".into());
    }
    if items.len() > usize::from(MAX_EVENT_ID) {
        return Some(format!("Cannot select more than {MAX_EVENT_ID} events."));
    }
    None
}

fn validate_event_details(value: Option<&Value>) -> Option<String> {
    let items = match value {
        None | Some(Value::Null) => return None,
        Some(Value::Array(items)) => items,
        Some(_) => return Some("Event details must be a list.".into()),
    };

    for item in items {
        let Value::Object(detail) = item else {
            return Some("Each event detail must be an object.".into());
        };
        if !detail.contains_key("eventId") || !detail.contains_key("subOption") {
            return Some("Each event detail must have eventId and subOption.".into());
        }
    }
    None
}

/// Check a registration payload; pure and deterministic
pub fn validate_registration(payload: &Value) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if !payload.is_object() {
        errors.insert("non_field_errors".into(), "Invalid data. Expected an object.".into());
        return errors;
    }

    for field in REQUIRED_FIELDS {
        if str_field(payload, field).trim().is_empty() {
            errors.insert(field.into(), format!("{} is required", title_case(field)));
        }
    }

    let email = str_field(payload, "email").trim();
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        errors.insert("email".into(), "Invalid email format".into());
    }

    let phone = str_field(payload, "phone");
    if !phone.trim().is_empty() && phone_digits(phone) != 10 {
        errors.insert("phone".into(), "Phone number must be 10 digits".into());
    }

    if let Some(message) = validate_selected_events(payload.get("selected_events")) {
        errors.insert("selected_events".into(), message);
    }
    if let Some(message) = validate_event_details(payload.get("event_details")) {
        errors.insert("event_details".into(), message);
    }

    errors
}

/// Validate and convert a payload into a [`NewRegistration`]
///
/// Strings are trimmed and the email is lowercased.
pub fn parse_registration(payload: &Value) -> Result<NewRegistration, FieldErrors> {
    let errors = validate_registration(payload);
    if !errors.is_empty() {
        return Err(errors);
    }

    let selected_events = payload
        .get("selected_events")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|id| u8::try_from(id).ok())
                .collect()
        })
        .unwrap_or_default();

    let event_details = match payload.get("event_details") {
        Some(details @ Value::Array(_)) => serde_json::from_value::<Vec<DetailInput>>(details.clone())
            .map_err(|e| {
                FieldErrors::from([("event_details".to_string(), format!("Invalid event details: {e}"))])
            })?
            .into_iter()
            .map(DetailInput::into_detail)
            .collect(),
        _ => Vec::new(),
    };

    Ok(NewRegistration {
        name: str_field(payload, "name").trim().to_string(),
        phone: str_field(payload, "phone").trim().to_string(),
        email: str_field(payload, "email").trim().to_lowercase(),
        college: str_field(payload, "college").trim().to_string(),
        department: str_field(payload, "department").trim().to_string(),
        selected_events,
        event_details,
    })
}

/// Event detail as submitted; `subOption` may be null or a non-string
#[derive(serde::Deserialize)]
struct DetailInput {
    #[serde(rename = "eventId")]
    event_id: Value,
    #[serde(rename = "subOption")]
    sub_option: Value,
}

impl DetailInput {
    fn into_detail(self) -> EventDetail {
        let sub_option = match self.sub_option {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        EventDetail {
            event_id: self.event_id,
            sub_option,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "name": "A",
            "phone": "9876543210",
            "email": "a@b.com",
            "college": "X",
            "department": "CS",
            "selected_events": [1, 3],
            "event_details": [{"eventId": 1, "subOption": "Morning"}],
        })
    }

    #[test]
    fn test_valid_payload() {
        assert!(validate_registration(&valid()).is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let mut payload = valid();
        payload["college"] = json!("   ");
        payload.as_object_mut().unwrap().remove("name");

        let errors = validate_registration(&payload);
        assert_eq!(errors["name"], "Name is required");
        assert_eq!(errors["college"], "College is required");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_email_and_phone_format() {
        let mut payload = valid();
        payload["email"] = json!("not-an-email");
        payload["phone"] = json!("+91 98765");

        let errors = validate_registration(&payload);
        assert_eq!(errors["email"], "Invalid email format");
        assert_eq!(errors["phone"], "Phone number must be 10 digits");
    }

    #[test]
    fn test_phone_separators_are_ignored() {
        let mut payload = valid();
        payload["phone"] = json!("(987) 654-3210");
        assert!(validate_registration(&payload).is_empty());
    }

    #[test]
    fn test_selected_events_bounds() {
        let mut payload = valid();

        payload["selected_events"] = json!([]);
        assert_eq!(
            validate_registration(&payload)["selected_events"],
            "Please select at least one event."
        );

        payload["selected_events"] = json!([0]);
        assert_eq!(
            validate_registration(&payload)["selected_events"],
            "Invalid event ID: 0. Must be between 1 and 12."
        );

        payload["selected_events"] = json!([13]);
        assert!(validate_registration(&payload).contains_key("selected_events"));

        payload["selected_events"] = json!("1,2");
        assert_eq!(
            validate_registration(&payload)["selected_events"],
            "Selected events must be a list."
        );

        payload["selected_events"] = json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 1]);
        assert_eq!(
            validate_registration(&payload)["selected_events"],
            "Cannot select more than 12 events."
        );

        payload["selected_events"] = json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert!(validate_registration(&payload).is_empty());
    }

    #[test]
    fn test_event_details_shape() {
        let mut payload = valid();

        payload.as_object_mut().unwrap().remove("event_details");
        assert!(validate_registration(&payload).is_empty());

        payload["event_details"] = json!({"eventId": 1});
        assert_eq!(
            validate_registration(&payload)["event_details"],
            "Event details must be a list."
        );

        payload["event_details"] = json!(["x"]);
        assert_eq!(
            validate_registration(&payload)["event_details"],
            "Each event detail must be an object."
        );

        payload["event_details"] = json!([{"eventId": 1}]);
        assert_eq!(
            validate_registration(&payload)["event_details"],
            "Each event detail must have eventId and subOption."
        );

        payload["event_details"] = json!([{"eventId": "", "subOption": ""}]);
        assert!(validate_registration(&payload).is_empty());
    }

    #[test]
    fn test_parse_normalizes_fields() {
        let mut payload = valid();
        payload["email"] = json!("  A@B.Com ");
        payload["name"] = json!(" A ");
        payload["event_details"] = json!([{"eventId": 3, "subOption": null}]);

        let parsed = parse_registration(&payload).unwrap();
        assert_eq!(parsed.email, "a@b.com");
        assert_eq!(parsed.name, "A");
        assert_eq!(parsed.selected_events, vec![1, 3]);
        assert_eq!(parsed.num_events(), 2);
        assert_eq!(parsed.event_details[0].sub_option, "");
    }

    #[test]
    fn test_non_object_payload() {
        let errors = validate_registration(&json!([1, 2]));
        assert!(errors.contains_key("non_field_errors"));
    }
}
