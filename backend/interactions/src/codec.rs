//! Component custom-id codec.
//!
//! Routing metadata for an interactive component is packed into its opaque
//! custom id as `plugin/kind/component/user[/payload]`. Decode is
//! all-or-nothing: a string that does not match the shape yields no identity.

use serde::{Deserialize, Serialize};

use plotforge_core::UserId;

/// Routing metadata parsed from a component custom id. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentId {
    /// Owning plugin; claims foreign to it are ignored by the forwarder.
    pub plugin: String,
    /// Component type within the plugin (e.g. a button class name).
    pub kind: String,
    /// Snowflake of the component's subject (tracking message, plot message).
    pub component: u64,
    /// The only user allowed to act on this component.
    pub user: UserId,
    /// Free-form extra routing data; may itself contain `/`.
    pub payload: Option<String>,
}

impl ComponentId {
    /// `plugin` and `kind` must not contain `/`; the codec does not escape.
    pub fn new(
        plugin: impl Into<String>,
        kind: impl Into<String>,
        component: u64,
        user: UserId,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            kind: kind.into(),
            component,
            user,
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Deterministic `/`-joined form; the payload segment is omitted when absent.
    pub fn encode(&self) -> String {
        match &self.payload {
            Some(payload) => format!(
                "{}/{}/{}/{}/{}",
                self.plugin, self.kind, self.component, self.user, payload
            ),
            None => format!(
                "{}/{}/{}/{}",
                self.plugin, self.kind, self.component, self.user
            ),
        }
    }

    /// Parse a custom id. Returns `None` unless the string has a non-empty
    /// plugin and kind, snowflake-numeric component and user segments, and
    /// at most one payload remainder. Everything after the fourth `/` is the
    /// payload, so payloads containing `/` survive the round trip.
    pub fn decode(raw: &str) -> Option<ComponentId> {
        let mut segments = raw.splitn(5, '/');
        let plugin = segments.next()?;
        let kind = segments.next()?;
        let component = segments.next()?.parse().ok()?;
        let user = segments.next()?.parse().ok()?;
        if plugin.is_empty() || kind.is_empty() {
            return None;
        }
        Some(ComponentId {
            plugin: plugin.to_string(),
            kind: kind.to_string(),
            component,
            user,
            payload: segments.next().map(str::to_string),
        })
    }

    /// True iff `actor` is the user this component was issued to. Call sites
    /// must branch on this before reaching any privileged handler.
    pub fn authorize(&self, actor: UserId) -> bool {
        self.user == actor
    }
}
