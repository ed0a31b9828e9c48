/// Runtime type name carried by reactive computations.
pub const REACTION_TYPE_NAME: &str = "Reaction";

/// A runtime value as seen by the logger.
///
/// Sources map their payloads into this closed set at the boundary; anything
/// they cannot classify becomes `Opaque`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Sequence(Vec<Value>),
    /// Plain key/value record, insertion-ordered.
    Record(Vec<(String, Value)>),
    /// Instance of a named type.
    Object(ObjectValue),
    Reaction(ReactionValue),
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectValue {
    pub type_name: Option<String>,
    pub fields: Vec<(String, Value)>,
}

/// A reactive computation and the names of the properties it currently observes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionValue {
    pub name: String,
    pub observing: Vec<String>,
}

impl ObjectValue {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields: Vec::new(),
        }
    }

    /// An instance whose type cannot be named.
    pub fn anonymous() -> Self {
        Self {
            type_name: None,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }
}

impl ReactionValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observing: Vec::new(),
        }
    }

    pub fn observing(mut self, property: impl Into<String>) -> Self {
        self.observing.push(property.into());
        self
    }
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Text(s.into())
    }

    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Everything that is not a primitive.
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            Value::Sequence(_)
                | Value::Record(_)
                | Value::Object(_)
                | Value::Reaction(_)
                | Value::Opaque
        )
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Text(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// Name of the value's runtime type, if it has one.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Value::Object(obj) => obj.type_name.as_deref(),
            Value::Reaction(_) => Some(REACTION_TYPE_NAME),
            Value::Record(_) => Some("Object"),
            Value::Sequence(_) => Some("Array"),
            Value::Text(_) => Some("String"),
            Value::Number(_) => Some("Number"),
            Value::Bool(_) => Some("Boolean"),
            Value::Undefined | Value::Null | Value::Opaque => None,
        }
    }

    /// Only a real reaction counts; an object whose type happens to be
    /// named `Reaction` does not.
    pub fn is_reaction(&self) -> bool {
        matches!(self, Value::Reaction(_))
    }

    /// Named field of a record or object.
    pub fn field(&self, key: &str) -> Option<&Value> {
        let fields = match self {
            Value::Record(fields) => fields,
            Value::Object(obj) => &obj.fields,
            _ => return None,
        };
        fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Default textual form, the way the host would coerce the value to a string.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Sequence(items) => items
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    other => other.to_plain_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Record(_) | Value::Object(_) | Value::Reaction(_) | Value::Opaque => {
                "[object Object]".to_string()
            }
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Covers -0.
        return "0".to_string();
    }
    let magnitude = n.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        // Exponent form with an explicit sign: 1e+21, 1.5e-7.
        let exp = format!("{:e}", n);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
            _ => exp,
        };
    }
    format!("{}", n)
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<ObjectValue> for Value {
    fn from(obj: ObjectValue) -> Self {
        Value::Object(obj)
    }
}

impl From<ReactionValue> for Value {
    fn from(reaction: ReactionValue) -> Self {
        Value::Reaction(reaction)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Undefined, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(Value::from(1).to_plain_string(), "1");
        assert_eq!(Value::from(1.5).to_plain_string(), "1.5");
        assert_eq!(Value::from(-0.0).to_plain_string(), "0");
        assert_eq!(Value::from(f64::NAN).to_plain_string(), "NaN");
        assert_eq!(Value::from(f64::NEG_INFINITY).to_plain_string(), "-Infinity");
    }

    #[test]
    fn test_number_exponent_range() {
        assert_eq!(Value::from(1e21).to_plain_string(), "1e+21");
        assert_eq!(Value::from(-1.5e22).to_plain_string(), "-1.5e+22");
        assert_eq!(Value::from(1e-7).to_plain_string(), "1e-7");
        assert_eq!(Value::from(1e20).to_plain_string(), "100000000000000000000");
        assert_eq!(Value::from(0.000001).to_plain_string(), "0.000001");
    }

    #[test]
    fn test_reaction_named_object_is_not_a_reaction() {
        let lookalike = Value::from(ObjectValue::new(REACTION_TYPE_NAME));
        assert!(!lookalike.is_reaction());
        assert_eq!(lookalike.type_name(), Some(REACTION_TYPE_NAME));
        assert!(Value::from(ReactionValue::new("Autorun@1")).is_reaction());
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(Value::from(7).is_truthy());
        assert!(Value::Sequence(vec![]).is_truthy());
    }

    #[test]
    fn test_field_lookup() {
        let person = Value::from(ObjectValue::new("Person").with_field("id", 1));
        assert_eq!(person.field("id"), Some(&Value::Number(1.0)));
        assert_eq!(person.field("name"), None);
        assert_eq!(Value::from("id").field("id"), None);
    }

    #[test]
    fn test_sequence_plain_string_skips_nullish() {
        let seq = Value::Sequence(vec![Value::from(1), Value::Null, Value::from("a")]);
        assert_eq!(seq.to_plain_string(), "1,,a");
    }
}
