use crate::spy::event::RawEvent;
use crate::spy::value::Value;

const ACTOR_ID_FIELDS: &[&str] = &["name", "label", "id"];
const VALUE_ID_FIELDS: &[&str] = &["name", "label", "id", "_id"];

/// Identifier of the event's subject, or `""`.
pub fn guess_event_actor_id(event: &RawEvent) -> String {
    event
        .object()
        .map(|object| first_truthy(object, ACTOR_ID_FIELDS))
        .unwrap_or_default()
}

/// Identifier of an arbitrary value, or `""`. Also tries `_id`.
pub fn guess_value_id(value: &Value) -> String {
    first_truthy(value, VALUE_ID_FIELDS)
}

fn first_truthy(value: &Value, candidates: &[&str]) -> String {
    candidates
        .iter()
        .filter_map(|key| value.field(key))
        .find(|v| v.is_truthy())
        .map(Value::to_plain_string)
        .unwrap_or_default()
}
