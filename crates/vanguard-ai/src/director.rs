//! Faction to strategy registry.

use std::collections::BTreeMap;

use vanguard_core::enums::Faction;

use crate::factions::*;
use crate::strategy::FactionStrategy;

/// Maps a faction to its strategy, with a fallback for the rest.
pub struct Director {
    strategies: BTreeMap<Faction, Box<dyn FactionStrategy>>,
    fallback: Box<dyn FactionStrategy>,
}

impl Director {
    /// An empty registry; every faction uses the fallback.
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
            fallback: Box::new(DefaultStrategy),
        }
    }

    pub fn register(&mut self, faction: Faction, strategy: Box<dyn FactionStrategy>) {
        self.strategies.insert(faction, strategy);
    }

    pub fn is_registered(&self, faction: Faction) -> bool {
        self.strategies.contains_key(&faction)
    }

    pub fn strategy_for(&self, faction: Faction) -> &dyn FactionStrategy {
        self.strategies
            .get(&faction)
            .map(|s| s.as_ref())
            .unwrap_or(self.fallback.as_ref())
    }
}

impl Default for Director {
    fn default() -> Self {
        let mut director = Self::empty();
        director.register(Faction::Federation, Box::new(FederationStrategy));
        director.register(Faction::Klingon, Box::new(KlingonStrategy));
        director.register(Faction::Romulan, Box::new(RomulanStrategy));
        director.register(Faction::Pirate, Box::new(PirateStrategy));
        director.register(Faction::Independent, Box::new(IndependentStrategy));
        director
    }
}
