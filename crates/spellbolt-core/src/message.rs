//! Outbound messages.
//!
//! The core never talks to the network. It enqueues [`OutboundMessage`]s
//! into an [`Outbox`] addressed either to one session or to everyone in
//! range, and the host drains the outbox after each call.

use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, SessionId};
use crate::projectile::{PhysicsFlags, ProjectileId};

/// Client-side visual scripts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayScript {
    /// Generic projectile contact effect.
    ProjectileCollision,
    /// Explosion effect.
    Explode,
    /// Lifestone protection shimmer.
    ShieldUpGrey,
}

/// Chat channel for text messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChatChannel {
    /// Spell effects on others and on oneself.
    Magic,
    /// Combat results.
    Combat,
    /// Area announcements.
    Broadcast,
}

/// Role-specific PK rejection codes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeenieError {
    /// Attacker side: you are not a player killer.
    YouFailToAffectYouAreNotPk,
    /// Attacker side: the defender is not a player killer.
    YouFailToAffectTheyAreNotPk,
    /// Attacker side: PK and PK-lite cannot fight.
    YouFailToAffectNotSamePkType,
    /// Defender side: the attacker is not a player killer.
    FailsToAffectYouTheyAreNotPk,
    /// Defender side: you are not a player killer.
    FailsToAffectYouYouAreNotPk,
    /// Defender side: PK and PK-lite cannot fight.
    FailsToAffectYouNotSamePkType,
}

impl WeenieError {
    /// Renders the error text with the other party's name.
    #[must_use]
    pub fn render(self, name: &str) -> String {
        match self {
            Self::YouFailToAffectYouAreNotPk => {
                format!("You fail to affect {name} because you are not a player killer!")
            }
            Self::YouFailToAffectTheyAreNotPk => {
                format!("You fail to affect {name} because they are not a player killer!")
            }
            Self::YouFailToAffectNotSamePkType => {
                format!("You fail to affect {name} because you are not the same sort of player killer as them!")
            }
            Self::FailsToAffectYouTheyAreNotPk => {
                format!("{name} fails to affect you because they are not a player killer!")
            }
            Self::FailsToAffectYouYouAreNotPk => {
                format!("{name} fails to affect you because you are not a player killer!")
            }
            Self::FailsToAffectYouNotSamePkType => {
                format!("{name} fails to affect you because they are not the same sort of player killer as you!")
            }
        }
    }
}

/// Thing a script plays on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScriptSubject {
    /// An actor.
    Actor(ActorId),
    /// A projectile.
    Projectile(ProjectileId),
}

/// Message to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OutboundMessage {
    /// Text in a chat channel.
    SystemChat {
        /// Rendered text.
        text: String,
        /// Channel.
        channel: ChatChannel,
    },
    /// Target health bar.
    UpdateHealth {
        /// Whose health.
        target: ActorId,
        /// Current over max.
        fraction: f32,
    },
    /// Rejection with a name parameter.
    ErrorWithString {
        /// Error code.
        code: WeenieError,
        /// Rendered text.
        text: String,
    },
    /// Visual script.
    PlayScript {
        /// Where it plays.
        subject: ScriptSubject,
        /// Which script.
        script: PlayScript,
        /// Strength in `[0, 1]`.
        intensity: f32,
    },
    /// Projectile physics state.
    PhysicsState {
        /// Projectile.
        projectile: ProjectileId,
        /// Current flags.
        flags: PhysicsFlags,
    },
    /// Someone died.
    DeathNotice {
        /// Who died.
        victim: ActorId,
        /// Who gets the kill.
        killer: Option<ActorId>,
        /// Rendered text.
        text: String,
    },
}

/// Delivery target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Recipient {
    /// One connected session.
    Session(SessionId),
    /// Everyone in range of the zone.
    Broadcast,
}

/// An addressed message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Who receives it.
    pub recipient: Recipient,
    /// What they receive.
    pub message: OutboundMessage,
}

/// Fire-and-forget message queue drained by the host.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    queue: Vec<Envelope>,
}

impl Outbox {
    /// Creates an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a message for one session.
    pub fn enqueue(&mut self, session: SessionId, message: OutboundMessage) {
        self.queue.push(Envelope {
            recipient: Recipient::Session(session),
            message,
        });
    }

    /// Queues a message for everyone in range.
    pub fn broadcast(&mut self, message: OutboundMessage) {
        self.queue.push(Envelope {
            recipient: Recipient::Broadcast,
            message,
        });
    }

    /// Takes everything queued so far.
    pub fn drain(&mut self) -> Vec<Envelope> {
        std::mem::take(&mut self.queue)
    }

    /// Queued envelopes in order.
    #[must_use]
    pub fn envelopes(&self) -> &[Envelope] {
        &self.queue
    }

    /// Messages queued for one session, in order.
    pub fn for_session(&self, session: SessionId) -> impl Iterator<Item = &OutboundMessage> + '_ {
        self.queue
            .iter()
            .filter(move |e| e.recipient == Recipient::Session(session))
            .map(|e| &e.message)
    }

    /// Chat texts queued for one session, in order.
    pub fn texts_for(&self, session: SessionId) -> impl Iterator<Item = &str> + '_ {
        self.for_session(session).filter_map(|m| match m {
            OutboundMessage::SystemChat { text, .. } | OutboundMessage::ErrorWithString { text, .. } => {
                Some(text.as_str())
            }
            _ => None,
        })
    }

    /// Number of queued envelopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
