//! Reaction event system
//!
//! The coordinator queues an event for every side effect it issues.
//! Observers register for the kinds they care about; a handler returns
//! `true` to consume an event and stop it reaching later handlers.

use crate::ecs::Entity;
use crate::elements::Outcome;
use crate::foundation::math::Transform;
use crate::physics::collision_system::CollisionPair;
use crate::reactions::ReactionError;
use std::collections::HashMap;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// A contact was resolved to a reacting outcome
    Reacted,
    /// An entity was destroyed by a reaction
    EntityDestroyed,
    /// A manifestation object was spawned
    ManifestationSpawned,
    /// A manifestation could not be spawned
    SpawnSkipped,
}

/// Reaction event
#[derive(Debug, Clone, PartialEq)]
pub enum ReactionEvent {
    /// A contact produced a reacting outcome
    Reacted {
        /// Contact pair
        pair: CollisionPair,
        /// Entity the table acted from
        actor: Entity,
        /// Resolved outcome
        outcome: Outcome,
        /// Simulation time (seconds)
        timestamp: f64,
    },
    /// An entity was destroyed
    EntityDestroyed {
        /// Destroyed entity
        entity: Entity,
        /// Simulation time (seconds)
        timestamp: f64,
    },
    /// A manifestation object was spawned
    ManifestationSpawned {
        /// New entity
        entity: Entity,
        /// Prefab it was spawned from
        prefab_id: String,
        /// Spawn transform
        transform: Transform,
        /// Simulation time (seconds)
        timestamp: f64,
    },
    /// Instantiation was skipped; both sources were still destroyed
    SpawnSkipped {
        /// Contact pair
        pair: CollisionPair,
        /// Why nothing was spawned
        error: ReactionError,
        /// Simulation time (seconds)
        timestamp: f64,
    },
}

impl ReactionEvent {
    /// Type of this event
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::Reacted { .. } => EventType::Reacted,
            Self::EntityDestroyed { .. } => EventType::EntityDestroyed,
            Self::ManifestationSpawned { .. } => EventType::ManifestationSpawned,
            Self::SpawnSkipped { .. } => EventType::SpawnSkipped,
        }
    }

    /// Simulation time the event was raised at
    pub const fn timestamp(&self) -> f64 {
        match self {
            Self::Reacted { timestamp, .. }
            | Self::EntityDestroyed { timestamp, .. }
            | Self::ManifestationSpawned { timestamp, .. }
            | Self::SpawnSkipped { timestamp, .. } => *timestamp,
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &ReactionEvent) -> bool;
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<ReactionEvent>,
    handlers: HashMap<EventType, Vec<Box<dyn EventHandler>>>,
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    /// Only handlers registered for this type will be notified
    pub fn register_handler(&mut self, event_type: EventType, handler: Box<dyn EventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: ReactionEvent) {
        self.queue.push(event);
    }

    /// Events waiting for dispatch
    pub fn pending(&self) -> &[ReactionEvent] {
        &self.queue
    }

    /// Dispatch all pending events and hand them back to the caller
    pub fn dispatch(&mut self) -> Vec<ReactionEvent> {
        let events = std::mem::take(&mut self.queue);
        for event in &events {
            self.dispatch_event(event);
        }
        events
    }

    /// Dispatch single event to registered handlers
    /// Stops on first handler that returns true (consumed)
    fn dispatch_event(&mut self, event: &ReactionEvent) {
        if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
            for handler in handlers.iter_mut() {
                if handler.on_event(event) {
                    break;
                }
            }
        }
    }}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("queued", &self.queue.len())
            .field("handler_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Handler that writes every event it sees to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl EventHandler for LoggingHandler {
    fn on_event(&mut self, event: &ReactionEvent) -> bool {
        match event {
            ReactionEvent::Reacted { pair, actor, outcome, timestamp } => {
                log::info!("[{timestamp:.3}] {actor} resolved {:?} -> {outcome:?}", pair);
            }
            ReactionEvent::EntityDestroyed { entity, timestamp } => {
                log::info!("[{timestamp:.3}] destroyed {entity}");
            }
            ReactionEvent::ManifestationSpawned { entity, prefab_id, transform, timestamp } => {
                let p = transform.position;
                log::info!(
                    "[{timestamp:.3}] spawned {entity} '{prefab_id}' at ({:.2}, {:.2}, {:.2})",
                    p.x,
                    p.y,
                    p.z
                );
            }
            ReactionEvent::SpawnSkipped { pair, error, timestamp } => {
                log::warn!("[{timestamp:.3}] no manifestation for {:?}: {error}", pair);
            }
        }
        false
    }
}
