//! Element reaction table
//!
//! A fixed lookup from two `(Element, Category)` keys to an [`Outcome`].
//! Rules are checked in order and the first match wins:
//!
//! 1. Void erases any other box whose category is Order or Chaos.
//! 2. Balance never acts.
//! 3. Order and Chaos annihilate each other.
//! 4. The two members of an opposite pair annihilate each other.
//! 5. For pairs flagged as manifesting, the material member meeting Order,
//!    or the energy member meeting Chaos, manifests.
//! 6. Anything else is indifferent.
//!
//! The table is evaluated from one side ("self"). Which side gets to act is
//! decided by [`ReactionTable::resolve_contact`].

use super::{Category, Element};
use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of resolving one contact from the perspective of "self"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Mutual indifference
    None,
    /// Destroy the other box
    DestroyOther,
    /// Destroy the self box
    DestroySelf,
    /// Destroy both boxes
    DestroyBoth,
    /// Consume both boxes into a manifestation
    Manifest,
}

impl Outcome {
    /// Whether the outcome has any side effect
    pub const fn is_reaction(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One opposite-pair row of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OppositePair {
    /// Material member (manifests against Order)
    pub material: Element,
    /// Energy member (manifests against Chaos)
    pub energy: Element,
    /// Whether the row takes part in manifestation
    pub manifests: bool,
}

impl OppositePair {
    /// Create a row
    pub const fn new(material: Element, energy: Element, manifests: bool) -> Self {
        Self { material, energy, manifests }
    }

    /// Whether `element` is one of the two members
    pub fn contains(&self, element: Element) -> bool {
        self.material == element || self.energy == element
    }

    /// Whether the two elements are exactly this pair, in either order
    pub fn matches(&self, a: Element, b: Element) -> bool {
        (self.material == a && self.energy == b) || (self.material == b && self.energy == a)
    }
}

/// Which side of a contact the table acted from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// The first argument acted as "self"
    First,
    /// The first side was indifferent; the second argument acted as "self"
    Second,
}

/// Reaction lookup table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionTable {
    pairs: Vec<OppositePair>,
}

impl Default for ReactionTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl ReactionTable {
    /// Elements whose behaviour is fixed by rules 1-3 and cannot appear in a row
    const RESERVED: [Element; 4] = [Element::Void, Element::Balance, Element::Order, Element::Chaos];

    /// Table with custom opposite-pair rows
    pub fn new(pairs: Vec<OppositePair>) -> Self {
        Self { pairs }
    }

    /// The canonical five opposite pairs; the first three manifest
    pub fn standard() -> Self {
        Self::new(vec![
            OppositePair::new(Element::Stone, Element::Lightning, true),
            OppositePair::new(Element::Ice, Element::Fire, true),
            OppositePair::new(Element::Water, Element::Wind, true),
            OppositePair::new(Element::Shadow, Element::Light, false),
            OppositePair::new(Element::Death, Element::Life, false),
        ])
    }

    /// Opposite-pair rows
    pub fn pairs(&self) -> &[OppositePair] {
        &self.pairs
    }

    /// The row containing `element`, if any
    pub fn pair_for(&self, element: Element) -> Option<&OppositePair> {
        self.pairs.iter().find(|row| row.contains(element))
    }

    /// Whether a box of this element can ever produce a manifestation
    pub fn can_manifest(&self, element: Element) -> bool {
        self.pair_for(element).is_some_and(|row| row.manifests)
    }

    /// Reject rows that rules 1-3 would shadow, self-pairs and reused elements
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for row in &self.pairs {
            if row.material == row.energy {
                return Err(ConfigError::Validation(format!(
                    "opposite pair pairs {} with itself",
                    row.material
                )));
            }
            for element in [row.material, row.energy] {
                if Self::RESERVED.contains(&element) {
                    return Err(ConfigError::Validation(format!(
                        "{element} cannot appear in an opposite pair"
                    )));
                }
                if !seen.insert(element) {
                    return Err(ConfigError::Validation(format!(
                        "{element} appears in more than one opposite pair"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolve a contact from the perspective of `this`
    pub fn resolve(&self, this: (Element, Category), other: (Element, Category)) -> Outcome {
        let (element, _) = this;
        let (other_element, other_category) = other;

        match element {
            Element::Void => {
                return if other_category.is_erased_by_void() {
                    Outcome::DestroyOther
                } else {
                    Outcome::None
                };
            }
            Element::Balance => return Outcome::None,
            _ => {}
        }

        if matches!(
            (element, other_element),
            (Element::Order, Element::Chaos) | (Element::Chaos, Element::Order)
        ) {
            return Outcome::DestroyBoth;
        }

        let Some(row) = self.pair_for(element) else {
            return Outcome::None;
        };

        if row.matches(element, other_element) {
            return Outcome::DestroyBoth;
        }

        let manifests = row.manifests
            && ((element == row.material && other_element == Element::Order)
                || (element == row.energy && other_element == Element::Chaos));
        if manifests {
            Outcome::Manifest
        } else {
            Outcome::None
        }
    }

    /// Resolve a contact once for both boxes
    ///
    /// `first` acts as self. When it is indifferent, the table is read from
    /// `second`'s side instead, so a rule owned by either box fires no matter
    /// which one holds the lower id.
    pub fn resolve_contact(
        &self,
        first: (Element, Category),
        second: (Element, Category),
    ) -> (Outcome, Perspective) {
        match self.resolve(first, second) {
            Outcome::None => match self.resolve(second, first) {
                Outcome::None => (Outcome::None, Perspective::First),
                outcome => (outcome, Perspective::Second),
            },
            outcome => (outcome, Perspective::First),
        }
    }
}

/// Resolve with the standard table
pub fn resolve(this: (Element, Category), other: (Element, Category)) -> Outcome {
    ReactionTable::standard().resolve(this, other)
}
