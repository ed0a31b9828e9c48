use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::identity::{guess_event_actor_id, guess_value_id};
use super::stringify::{stringify, stringify_arguments};
use crate::config::ParserConfig;
use crate::error::SpyLogError;
use crate::spy::event::RawEvent;
use crate::spy::value::{Value, REACTION_TYPE_NAME};

/// Actor used when nothing better is known.
pub const UNKNOWN_ACTOR: &str = "?";

/// `Actor@id.key`: actor stops at the first `@`, key starts after the last `.`.
const EVENT_NAME_PATTERN: &str = r"^([^@]+)@(.+)\.(.+)$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAction {
    pub actor: String,
    pub actor_id: String,
    pub action_name: String,
    pub event_arguments: String,
    pub is_reaction: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedUpdate {
    pub actor: String,
    pub actor_id: String,
    pub key: String,
    pub new_value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedComputed {
    pub actor: String,
    pub actor_id: String,
    pub key: String,
}

/// Parts of an `Actor@id.key` name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventName<'a> {
    pub actor: &'a str,
    pub id: &'a str,
    pub key: &'a str,
}

pub fn parse_event_name(name: &str) -> Result<EventName<'_>, SpyLogError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(EVENT_NAME_PATTERN).expect("event name pattern is valid"));

    let caps = re
        .captures(name)
        .ok_or_else(|| SpyLogError::MalformedEventName { name: name.to_string() })?;

    match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(actor), Some(id), Some(key)) => Ok(EventName {
            actor: actor.as_str(),
            id: id.as_str(),
            key: key.as_str(),
        }),
        _ => Err(SpyLogError::MalformedEventName { name: name.to_string() }),
    }
}

/// Turns raw events into flat records. Callers may swap in their own.
///
/// Each method expects the matching event variant; handing it another
/// variant yields an empty-ish record rather than a panic.
pub trait EventParsers: Send + Sync {
    fn parse_action(&self, event: &RawEvent) -> ParsedAction;
    fn parse_update(&self, event: &RawEvent) -> ParsedUpdate;
    fn parse_computed(&self, event: &RawEvent) -> Result<ParsedComputed, SpyLogError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParsers {
    config: ParserConfig,
}

impl DefaultParsers {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    fn reaction_actor(&self, arguments: Option<&[Value]>) -> String {
        if self.config.reaction_actor_from_observed {
            if let Some(Value::Reaction(reaction)) = arguments.and_then(|args| args.get(1)) {
                if let [only] = reaction.observing.as_slice() {
                    if let Ok(parsed) = parse_event_name(only) {
                        return format!("{}@{}", parsed.actor, parsed.id);
                    }
                }
            }
        }
        REACTION_TYPE_NAME.to_string()
    }
}

impl EventParsers for DefaultParsers {
    fn parse_action(&self, event: &RawEvent) -> ParsedAction {
        let (object, name, arguments) = match event {
            RawEvent::Action { object, name, arguments } => {
                (object.as_ref(), name.as_str(), arguments.as_deref())
            }
            other => (other.object(), "", None),
        };

        let is_reaction = arguments
            .and_then(|args| args.get(1))
            .map_or(false, Value::is_reaction);

        // A nullish subject counts as no subject.
        let actor = match object.filter(|o| o.is_truthy()) {
            Some(object) => object.type_name().unwrap_or_default().to_string(),
            None if is_reaction => self.reaction_actor(arguments),
            None => UNKNOWN_ACTOR.to_string(),
        };

        ParsedAction {
            actor,
            actor_id: guess_event_actor_id(event),
            action_name: name.to_string(),
            event_arguments: stringify_arguments(arguments),
            is_reaction,
        }
    }

    fn parse_update(&self, event: &RawEvent) -> ParsedUpdate {
        let (key, new_value) = match event {
            RawEvent::Update { key, new_value, .. } => (key.as_str(), new_value),
            _ => ("", &Value::Undefined),
        };

        let actor = event
            .object()
            .and_then(Value::type_name)
            .unwrap_or(UNKNOWN_ACTOR)
            .to_string();

        let mut rendered = stringify(new_value);
        if new_value.is_object() {
            let id = guess_value_id(new_value);
            if !id.is_empty() {
                rendered.push('#');
                rendered.push_str(&id);
            }
        }

        ParsedUpdate {
            actor,
            actor_id: guess_event_actor_id(event),
            key: key.to_string(),
            new_value: rendered,
        }
    }

    fn parse_computed(&self, event: &RawEvent) -> Result<ParsedComputed, SpyLogError> {
        let name = match event {
            RawEvent::Compute { name, .. } => name.as_str(),
            _ => "",
        };
        let parsed = parse_event_name(name)?;

        let guessed = guess_event_actor_id(event);
        let actor_id = if guessed.is_empty() { parsed.id.to_string() } else { guessed };

        Ok(ParsedComputed {
            actor: parsed.actor.to_string(),
            actor_id,
            key: parsed.key.to_string(),
        })
    }
}
