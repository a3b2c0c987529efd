//! Collision coordinator
//!
//! Physics reports one contact-begin per participant, so every physical
//! contact arrives twice. The coordinator is the single authority that
//! turns those reports into exactly one reaction: it keys bookkeeping by
//! unordered [`CollisionPair`], evaluates the reaction table once with the
//! lower id as "self", and applies the side effects.
//!
//! Pair lifecycle:
//!
//! ```text
//! (absent) --begin--> Unresolved --resolve--> Resolved --prune/end/timeout--> (absent)
//! ```

use crate::config::ConfigError;
use crate::ecs::Entity;
use crate::elements::reaction::{Outcome, Perspective, ReactionTable};
use crate::elements::ElementBox;
use crate::events::{EventSystem, ReactionEvent};
use crate::foundation::math::utils;
use crate::manifestation::{place_manifestation, Body, PlacementSettings};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::collision_system::CollisionPair;
use crate::physics::geometry;
use crate::reactions::collaborators::{EntityLifecycle, PhysicsQueries};
use crate::reactions::ReactionError;
use log::{debug, error, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Coordinator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// How far below the contact midpoint to look for the floor
    pub floor_scan_distance: f32,
    /// Seconds after which a resolved pair is forgotten even if both boxes survive
    pub pair_timeout: f64,
    /// Layers ignored by the floor probe
    pub probe_exclude: CollisionLayers,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            floor_scan_distance: 2.0,
            pair_timeout: 5.0,
            probe_exclude: CollisionLayers::ELEMENT_BOX,
        }
    }
}

impl CoordinatorConfig {
    /// Load-time checks
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.floor_scan_distance.is_finite() || self.floor_scan_distance < 0.0 {
            return Err(ConfigError::Validation(format!(
                "floor_scan_distance must be a non-negative number, got {}",
                self.floor_scan_distance
            )));
        }
        if !self.pair_timeout.is_finite() || self.pair_timeout <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "pair_timeout must be positive, got {}",
                self.pair_timeout
            )));
        }
        Ok(())
    }
}

/// Bookkeeping state of one contact pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairState {
    /// Reported but not yet resolved
    Unresolved,
    /// Resolved; later reports of the same contact are no-ops
    Resolved {
        /// Simulation time of resolution
        resolved_at: f64,
    },
}

/// Side effects of one resolved contact
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    /// Contact pair
    pub pair: CollisionPair,
    /// Entity the table acted from ("self")
    pub actor: Entity,
    /// The other entity
    pub target: Entity,
    /// Resolved outcome
    pub outcome: Outcome,
    /// Entities destroyed, in order
    pub destroyed: Vec<Entity>,
    /// Manifestation entities spawned, in order
    pub spawned: Vec<Entity>,
    /// Recovered problems
    pub issues: Vec<ReactionError>,
}

/// Result of handling one contact report
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// An entity reported contact with itself
    Ignored,
    /// The pair was already resolved; nothing happened
    Duplicate,
    /// A participant no longer exists; nothing happened
    Stale(ReactionError),
    /// The contact was resolved
    Resolved(Reaction),
}

impl Resolution {
    /// The reaction, when the report was resolved
    pub const fn reaction(&self) -> Option<&Reaction> {
        match self {
            Self::Resolved(reaction) => Some(reaction),
            _ => None,
        }
    }

    /// The outcome, when the report was resolved
    pub fn outcome(&self) -> Option<Outcome> {
        self.reaction().map(|reaction| reaction.outcome)
    }
}

/// Single authority for reaction resolution
#[derive(Debug)]
pub struct CollisionCoordinator {
    table: ReactionTable,
    config: CoordinatorConfig,
    placement: PlacementSettings,
    pairs: HashMap<CollisionPair, PairState>,
    events: EventSystem,
    time: f64,
}

impl Default for CollisionCoordinator {
    fn default() -> Self {
        Self::new(ReactionTable::standard(), CoordinatorConfig::default(), PlacementSettings::default())
    }
}

impl CollisionCoordinator {
    /// Create a coordinator
    pub fn new(table: ReactionTable, config: CoordinatorConfig, placement: PlacementSettings) -> Self {
        Self {
            table,
            config,
            placement,
            pairs: HashMap::new(),
            events: EventSystem::new(),
            time: 0.0,
        }
    }

    /// Create a coordinator from a loaded engine configuration
    pub fn from_config(config: &crate::config::EngineConfig) -> Self {
        Self::new(config.reaction_table(), config.reactions.clone(), config.placement.clone())
    }

    /// Reaction table in use
    pub const fn table(&self) -> &ReactionTable {
        &self.table
    }

    /// Current simulation time (seconds)
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Event system, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Dispatch queued events to handlers and return them
    pub fn dispatch_events(&mut self) -> Vec<ReactionEvent> {
        self.events.dispatch()
    }

    /// State of the pair `{a, b}`, if tracked
    pub fn pair_state(&self, a: Entity, b: Entity) -> Option<PairState> {
        self.pairs.get(&CollisionPair::new(a, b)).copied()
    }

    /// Number of tracked pairs
    pub fn tracked_pairs(&self) -> usize {
        self.pairs.len()
    }

    /// Handle a contact-begin report from `reporter` about `other`
    ///
    /// Call once per report; the second report of the same contact is a
    /// no-op. Never fails: problems are logged and recorded on the result.
    pub fn on_contact_begin<W, P>(
        &mut self,
        reporter: Entity,
        other: Entity,
        world: &mut W,
        physics: &P,
    ) -> Resolution
    where
        W: EntityLifecycle + ?Sized,
        P: PhysicsQueries + ?Sized,
    {
        if reporter == other {
            return Resolution::Ignored;
        }

        let pair = CollisionPair::new(reporter, other);
        let state = self.pairs.entry(pair).or_insert(PairState::Unresolved);
        if matches!(state, PairState::Resolved { .. }) {
            trace!("{pair:?} already resolved; duplicate report from {reporter}");
            return Resolution::Duplicate;
        }

        let resolution = self.resolve_pair(pair, world, physics);
        self.pairs.insert(pair, PairState::Resolved { resolved_at: self.time });
        resolution
    }

    /// Handle a contact-end report; the pair is forgotten
    pub fn on_contact_end(&mut self, a: Entity, b: Entity) {
        self.pairs.remove(&CollisionPair::new(a, b));
    }

    /// Forget every pair involving an entity destroyed elsewhere
    pub fn on_entity_destroyed(&mut self, entity: Entity) {
        self.pairs.retain(|pair, _| !pair.involves(entity));
    }

    /// Advance simulation time and prune finished pairs
    ///
    /// Call once per physics step, after all of the step's reports.
    pub fn advance<W: EntityLifecycle + ?Sized>(&mut self, dt: f64, world: &W) {
        self.time += dt;
        self.prune(world);
    }

    /// Drop pairs with a destroyed member, and resolved pairs past the timeout
    pub fn prune<W: EntityLifecycle + ?Sized>(&mut self, world: &W) {
        let now = self.time;
        let timeout = self.config.pair_timeout;
        let before = self.pairs.len();

        self.pairs.retain(|pair, state| {
            if !world.is_alive(pair.entity_a) || !world.is_alive(pair.entity_b) {
                return false;
            }
            match state {
                PairState::Resolved { resolved_at } => now - *resolved_at < timeout,
                PairState::Unresolved => true,
            }
        });

        let evicted = before - self.pairs.len();
        if evicted > 0 {
            trace!("pruned {evicted} contact pairs at t={now:.3}");
        }
    }

    fn resolve_pair<W, P>(&mut self, pair: CollisionPair, world: &mut W, physics: &P) -> Resolution
    where
        W: EntityLifecycle + ?Sized,
        P: PhysicsQueries + ?Sized,
    {
        let Some(first) = world.element_box(pair.entity_a) else {
            return Self::stale(pair, pair.entity_a);
        };
        let Some(second) = world.element_box(pair.entity_b) else {
            return Self::stale(pair, pair.entity_b);
        };

        let (outcome, perspective) = self.table.resolve_contact(first.attributes.key(), second.attributes.key());
        let (actor, target) = match perspective {
            Perspective::First => (first, second),
            Perspective::Second => (second, first),
        };

        debug!(
            "{} ({}) vs {} ({}) -> {outcome:?}",
            actor.entity,
            actor.element(),
            target.entity,
            target.element()
        );

        let mut reaction = Reaction {
            pair,
            actor: actor.entity,
            target: target.entity,
            outcome,
            destroyed: Vec::new(),
            spawned: Vec::new(),
            issues: Vec::new(),
        };

        if outcome.is_reaction() {
            self.events.send(ReactionEvent::Reacted {
                pair,
                actor: actor.entity,
                outcome,
                timestamp: self.time,
            });
        }

        match outcome {
            Outcome::None => {}
            Outcome::DestroyOther => self.destroy(world, target.entity, &mut reaction),
            Outcome::DestroySelf => self.destroy(world, actor.entity, &mut reaction),
            Outcome::DestroyBoth => {
                self.destroy(world, actor.entity, &mut reaction);
                self.destroy(world, target.entity, &mut reaction);
            }
            Outcome::Manifest => {
                self.manifest(&actor, &target, world, physics, &mut reaction);
                self.destroy(world, actor.entity, &mut reaction);
                self.destroy(world, target.entity, &mut reaction);
            }
        }

        Resolution::Resolved(reaction)
    }

    fn manifest<W, P>(
        &mut self,
        actor: &ElementBox,
        target: &ElementBox,
        world: &mut W,
        physics: &P,
        reaction: &mut Reaction,
    ) where
        W: EntityLifecycle + ?Sized,
        P: PhysicsQueries + ?Sized,
    {
        let Some(spec) = actor.manifestation.as_ref().or(target.manifestation.as_ref()) else {
            let issue = ReactionError::MissingManifestationSpec {
                entity: actor.entity,
                element: actor.element(),
            };
            error!("{issue}; destroying both without spawning");
            self.skip_spawn(reaction, issue);
            return;
        };

        if let Err(err) = spec.validate() {
            let issue = ReactionError::InvalidManifestationSpec {
                entity: actor.entity,
                reason: err.to_string(),
            };
            error!("{issue}; destroying both without spawning");
            self.skip_spawn(reaction, issue);
            return;
        }

        let midpoint = utils::midpoint(&actor.position, &target.position);
        let floor = geometry::probe_floor(
            physics,
            &midpoint,
            self.config.floor_scan_distance,
            self.config.probe_exclude,
        );

        let placement = place_manifestation(
            &Body::new(actor.position, actor.velocity),
            &Body::new(target.position, target.velocity),
            spec,
            floor.as_ref(),
            &self.placement,
        );

        if placement.at_rest {
            let issue = ReactionError::DegenerateDirection {
                pair: reaction.pair,
                fallback: placement.direction,
            };
            warn!("{issue}");
            reaction.issues.push(issue);
        }

        for transform in &placement.transforms {
            let entity = world.instantiate(&spec.prefab_id, transform);
            reaction.spawned.push(entity);
            self.events.send(ReactionEvent::ManifestationSpawned {
                entity,
                prefab_id: spec.prefab_id.clone(),
                transform: *transform,
                timestamp: self.time,
            });
        }

        info!(
            "{} + {} manifested {} x '{}'{}",
            actor.entity,
            target.entity,
            reaction.spawned.len(),
            spec.prefab_id,
            if floor.is_some() { "" } else { " (no floor)" }
        );
    }

    fn skip_spawn(&mut self, reaction: &mut Reaction, issue: ReactionError) {
        self.events.send(ReactionEvent::SpawnSkipped {
            pair: reaction.pair,
            error: issue.clone(),
            timestamp: self.time,
        });
        reaction.issues.push(issue);
    }

    fn destroy<W: EntityLifecycle + ?Sized>(&mut self, world: &mut W, entity: Entity, reaction: &mut Reaction) {
        if !world.is_alive(entity) {
            return;
        }
        world.destroy(entity);
        reaction.destroyed.push(entity);
        self.events.send(ReactionEvent::EntityDestroyed {
            entity,
            timestamp: self.time,
        });
    }

    fn stale(pair: CollisionPair, missing: Entity) -> Resolution {
        trace!("{pair:?} references destroyed {missing}; ignoring");
        Resolution::Stale(ReactionError::StaleEntityReference(missing))
    }
}

/// Authoring-time check of a set of boxes
///
/// Every box whose element can manifest must carry a valid
/// manifestation spec, and any spec present must be valid.
pub fn validate_authoring<'a>(
    table: &ReactionTable,
    boxes: impl IntoIterator<Item = &'a ElementBox>,
) -> Result<(), ConfigError> {
    for element_box in boxes {
        match &element_box.manifestation {
            Some(spec) => spec.validate().map_err(|err| {
                ConfigError::Validation(format!("{}: {err}", element_box.entity))
            })?,
            None if table.can_manifest(element_box.element()) => {
                return Err(ConfigError::Validation(
                    ReactionError::MissingManifestationSpec {
                        entity: element_box.entity,
                        element: element_box.element(),
                    }
                    .to_string(),
                ));
            }
            None => {}
        }
    }
    Ok(())
}
