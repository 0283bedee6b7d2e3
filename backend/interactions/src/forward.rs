//! Forwarding layer: turns a raw component click into exactly one handler
//! invocation on the command instance that created the component.
//!
//! Flow: decode custom id → ownership check → optional acknowledgement →
//! cached payload lookup → bound handler. Malformed or foreign ids are
//! dropped silently; a wrong user is routed to the bad-owner callback.

use std::sync::Arc;

use tracing::{debug, warn};

use plotforge_core::UserId;

use crate::cache::InteractionCache;
use crate::codec::ComponentId;
use crate::error::InteractionError;

/// A user's click on an interactive component, as reported by the host.
#[derive(Debug, Clone)]
pub struct ComponentClick {
    /// Opaque custom id carried by the clicked component.
    pub custom_id: String,
    /// User who clicked.
    pub actor: UserId,
    /// Live interaction snowflake, keying the payload cache.
    pub interaction: u64,
}

/// How a click was disposed of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardDisposition {
    /// Malformed custom id or a component owned by another plugin/route.
    Ignored,
    /// Decoded fine but the actor is not the authorized user.
    BadOwner,
    /// Authorized, but no payload was cached for the interaction (expired).
    MissingPayload,
    /// The bound handler ran successfully.
    Forwarded,
    /// The bound handler returned an error (logged here).
    HandlerFailed,
}

type BadOwnerFn = Box<dyn Fn(&ComponentClick, &ComponentId) + Send + Sync>;
type AcknowledgeFn = Box<dyn Fn(&ComponentClick) + Send + Sync>;

/// Routes clicks on one component class to one handler of one command
/// instance. The handler is a pure resolution supplied at construction;
/// there is no runtime method lookup.
pub struct ButtonRoute<C, P> {
    plugin: String,
    kind: String,
    command: Arc<C>,
    cache: Arc<InteractionCache>,
    handler: fn(&C, &ComponentClick, Arc<P>) -> anyhow::Result<()>,
    bad_owner: Option<BadOwnerFn>,
    acknowledge: Option<AcknowledgeFn>,
}

impl<C, P> ButtonRoute<C, P>
where
    C: Send + Sync,
    P: Send + Sync + 'static,
{
    pub fn new(
        plugin: impl Into<String>,
        kind: impl Into<String>,
        command: Arc<C>,
        cache: Arc<InteractionCache>,
        handler: fn(&C, &ComponentClick, Arc<P>) -> anyhow::Result<()>,
    ) -> Self {
        Self {
            plugin: plugin.into(),
            kind: kind.into(),
            command,
            cache,
            handler,
            bad_owner: None,
            acknowledge: None,
        }
    }

    /// Callback for clicks by a user other than the encoded owner.
    /// No-op when unset.
    pub fn on_bad_owner<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ComponentClick, &ComponentId) + Send + Sync + 'static,
    {
        self.bad_owner = Some(Box::new(callback));
        self
    }

    /// UI acknowledgement side effect (e.g. disabling the clicked control),
    /// run after authorization and before the handler.
    pub fn with_acknowledge<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ComponentClick) + Send + Sync + 'static,
    {
        self.acknowledge = Some(Box::new(callback));
        self
    }

    /// Encode the custom id for a new component issued by this route.
    pub fn custom_id(&self, component: u64, user: UserId) -> ComponentId {
        ComponentId::new(self.plugin.clone(), self.kind.clone(), component, user)
    }

    /// Dispose of a click. Only a cached payload of the wrong type is an
    /// error; every expected path is a [`ForwardDisposition`].
    pub async fn handle(
        &self,
        click: &ComponentClick,
    ) -> Result<ForwardDisposition, InteractionError> {
        let Some(id) = ComponentId::decode(&click.custom_id) else {
            debug!(custom_id = %click.custom_id, "unparseable custom id ignored");
            return Ok(ForwardDisposition::Ignored);
        };
        if id.plugin != self.plugin || id.kind != self.kind {
            return Ok(ForwardDisposition::Ignored);
        }
        if !id.authorize(click.actor) {
            debug!(
                actor = click.actor,
                owner = id.user,
                kind = %id.kind,
                "click by non-owner"
            );
            if let Some(callback) = &self.bad_owner {
                callback(click, &id);
            }
            return Ok(ForwardDisposition::BadOwner);
        }

        if let Some(callback) = &self.acknowledge {
            callback(click);
        }

        let Some(payload) = self.cache.get_as::<P>(click.interaction).await? else {
            debug!(
                interaction = click.interaction,
                kind = %id.kind,
                "no cached payload for interaction"
            );
            return Ok(ForwardDisposition::MissingPayload);
        };

        match (self.handler)(&self.command, click, payload) {
            Ok(()) => Ok(ForwardDisposition::Forwarded),
            Err(error) => {
                warn!(
                    interaction = click.interaction,
                    kind = %id.kind,
                    %error,
                    "component handler failed"
                );
                Ok(ForwardDisposition::HandlerFailed)
            }
        }
    }
}
