use crate::spy::value::Value;

/// Short display form of a value. First matching rule wins:
///
/// 1. text -> `"text"` (embedded quotes are not escaped)
/// 2. primitive -> default textual form
/// 3. sequence -> `Sequence[len]`
/// 4. plain record -> `{a, b[len]}`, keys only, sequences get their length
/// 5. reaction -> names of the observed properties; other named type -> the type name
/// 6. `[Object]`
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Text(s) => format!("\"{}\"", s),
        v if !v.is_object() => v.to_plain_string(),
        Value::Sequence(items) => format!("Sequence[{}]", items.len()),
        Value::Record(fields) => {
            let keys = fields
                .iter()
                .map(|(key, v)| match v {
                    Value::Sequence(items) => format!("{}[{}]", key, items.len()),
                    _ => key.clone(),
                })
                .collect::<Vec<_>>();
            format!("{{{}}}", keys.join(", "))
        }
        Value::Reaction(reaction) => reaction.observing.join(", "),
        Value::Object(obj) => match obj.type_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "[Object]".to_string(),
        },
        _ => "[Object]".to_string(),
    }
}

/// `(a, b, ...)` over the stringified arguments, `()` when there are none.
pub fn stringify_arguments(arguments: Option<&[Value]>) -> String {
    match arguments {
        Some(args) => {
            let parts = args.iter().map(stringify).collect::<Vec<_>>();
            format!("({})", parts.join(", "))
        }
        None => "()".to_string(),
    }
}
