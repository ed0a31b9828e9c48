use super::value::Value;

/// The three event categories the logger understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Action,
    Update,
    Compute,
}

impl EventKind {
    pub fn tag(&self) -> &'static str {
        match self {
            EventKind::Action => "action",
            EventKind::Update => "update",
            EventKind::Compute => "compute",
        }
    }
}

/// One occurrence reported by the instrumentation source.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// A named action, or a reaction run through the action machinery.
    Action {
        object: Option<Value>,
        name: String,
        arguments: Option<Vec<Value>>,
    },
    /// A single field write on an observed instance.
    Update {
        object: Option<Value>,
        key: String,
        new_value: Value,
    },
    /// A derived value recomputation. `name` is shaped `Actor@id.key`.
    Compute {
        object: Option<Value>,
        name: String,
    },
    /// Anything else the source emits (reaction scheduling, errors, ...).
    Other { kind: String },
}

impl RawEvent {
    pub fn action(name: impl Into<String>) -> Self {
        RawEvent::Action {
            object: None,
            name: name.into(),
            arguments: None,
        }
    }

    pub fn update(object: impl Into<Value>, key: impl Into<String>, new_value: impl Into<Value>) -> Self {
        RawEvent::Update {
            object: Some(object.into()),
            key: key.into(),
            new_value: new_value.into(),
        }
    }

    pub fn compute(name: impl Into<String>) -> Self {
        RawEvent::Compute {
            object: None,
            name: name.into(),
        }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        RawEvent::Other { kind: kind.into() }
    }

    /// Attach the subject instance. No-op on `Other`.
    pub fn on(mut self, subject: impl Into<Value>) -> Self {
        match &mut self {
            RawEvent::Action { object, .. }
            | RawEvent::Update { object, .. }
            | RawEvent::Compute { object, .. } => *object = Some(subject.into()),
            RawEvent::Other { .. } => {}
        }
        self
    }

    /// Set action arguments. No-op on other variants.
    pub fn with_arguments(mut self, args: Vec<Value>) -> Self {
        if let RawEvent::Action { arguments, .. } = &mut self {
            *arguments = Some(args);
        }
        self
    }

    pub fn kind(&self) -> Option<EventKind> {
        match self {
            RawEvent::Action { .. } => Some(EventKind::Action),
            RawEvent::Update { .. } => Some(EventKind::Update),
            RawEvent::Compute { .. } => Some(EventKind::Compute),
            RawEvent::Other { .. } => None,
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            RawEvent::Other { kind } => kind.as_str(),
            known => known.kind().map(|k| k.tag()).unwrap_or_default(),
        }
    }

    pub fn object(&self) -> Option<&Value> {
        match self {
            RawEvent::Action { object, .. }
            | RawEvent::Update { object, .. }
            | RawEvent::Compute { object, .. } => object.as_ref(),
            RawEvent::Other { .. } => None,
        }
    }
}
