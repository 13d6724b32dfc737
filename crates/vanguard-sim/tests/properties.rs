use proptest::prelude::*;
use vanguard_core::commands::PlayerTurnActions;
use vanguard_core::components::{EnergyAllocation, Ship};
use vanguard_core::enums::{Allegiance, Faction, TorpedoType};
use vanguard_core::types::{Gauge, Position};
use vanguard_sim::combat::beam::{range_modifier, shield_leak_chance};
use vanguard_sim::combat::torpedo::torpedo_hit_chance;
use vanguard_sim::energy::dilithium_recharge_per_crystal;
use vanguard_sim::{ScenarioId, SimConfig, TurnEngine};

fn torpedo_type() -> impl Strategy<Value = TorpedoType> {
    prop_oneof![
        Just(TorpedoType::Photon),
        Just(TorpedoType::Quantum),
        Just(TorpedoType::Plasma),
        Just(TorpedoType::HeavyPlasma),
        Just(TorpedoType::HeavyPhoton),
    ]
}

fn in_range(g: &Gauge) -> bool {
    g.current >= 0.0 && g.current <= g.max
}

fn check_ship(ship: &Ship) -> Result<(), TestCaseError> {
    for (label, gauge) in [
        ("hull", &ship.hull),
        ("shields", &ship.shields),
        ("energy", &ship.energy),
        ("dilithium", &ship.dilithium),
        ("torpedoes", &ship.torpedoes),
        ("security", &ship.security_teams),
        ("reserves", &ship.life_support_reserves),
    ] {
        prop_assert!(in_range(gauge), "{} {} out of range: {:?}", ship.id, label, gauge);
    }
    for (subsystem, gauge) in ship.subsystems.iter() {
        prop_assert!(in_range(gauge), "{} {:?} out of range", ship.id, subsystem);
    }
    let a = ship.allocation;
    prop_assert_eq!(a.weapons() + a.shields() + a.engines(), 100);
    prop_assert!((0.0..=0.8).contains(&ship.cloak.instability));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: every gauge stays inside [0, max] whatever the dice do
    #[test]
    fn gauges_stay_clamped(seed in any::<u64>(), scenario in 0usize..3, turns in 1u32..8) {
        let state = ScenarioId::ALL[scenario].build().unwrap();
        let mut engine = TurnEngine::new(state, SimConfig { seed, ..Default::default() });
        let orders = PlayerTurnActions {
            red_alert: Some(true),
            navigation_target: Some(Position::new(6, 5)),
            ..Default::default()
        };
        for _ in 0..turns {
            engine.end_turn(&orders);
        }
        let state = engine.state();
        for ship in &state.sector.ships {
            check_ship(ship)?;
            prop_assert!(state.sector.size.contains(&ship.position));
        }
        // Cleanup removes the dead; only the player's wreck may remain.
        for ship in state.sector.ships.iter().filter(|s| s.is_destroyed()) {
            prop_assert_eq!(&ship.id, &state.player.ship_id);
        }
        prop_assert!(state.sector.torpedoes.iter().all(|t| !t.destroyed));
    }

    /// Property: the same seed always produces the same battle
    #[test]
    fn replay_is_deterministic(seed in any::<u64>()) {
        let run = || {
            let state = ScenarioId::PirateRaid.build().unwrap();
            let mut engine = TurnEngine::new(state, SimConfig { seed, ..Default::default() });
            for _ in 0..4 {
                engine.end_turn(&PlayerTurnActions::default());
            }
            engine.state().to_json().unwrap()
        };
        prop_assert_eq!(run(), run());
    }

    /// Property: torpedoes never hit beyond range 4
    #[test]
    fn torpedo_zero_beyond_four(range in 5i32..64, ty in torpedo_type()) {
        prop_assert_eq!(torpedo_hit_chance(range, ty), 0.0);
    }

    #[test]
    fn torpedo_chance_is_probability(range in -3i32..=4, ty in torpedo_type()) {
        let p = torpedo_hit_chance(range, ty);
        prop_assert!((0.0..=1.0).contains(&p));
    }

    /// Property: one crystal restores between 5% and 100% of max energy
    #[test]
    fn dilithium_recharge_bounds(engines in 0.0f64..=20.0, max_energy in 10.0f64..400.0) {
        let mut ship = Ship::new("s", "S", Faction::Federation, Allegiance::Player, Position::new(0, 0));
        ship.energy = Gauge::full(max_energy);
        ship.subsystems.engines.set(engines);
        let r = dilithium_recharge_per_crystal(&ship);
        prop_assert!(r >= max_energy * 0.05 - 1e-9);
        prop_assert!(r <= max_energy + 1e-9);
    }

    #[test]
    fn range_modifier_bounds(distance in 0i32..20, max_range in 1i32..12) {
        let m = range_modifier(distance, max_range);
        prop_assert!((0.2..=1.0).contains(&m));
    }

    #[test]
    fn leak_chance_bounds(fraction in 0.0f64..=1.0) {
        let p = shield_leak_chance(fraction);
        prop_assert!((0.05 - 1e-12..=1.0 + 1e-12).contains(&p));
    }

    /// Property: an allocation is accepted exactly when it sums to 100
    #[test]
    fn allocation_must_sum_to_100(w in 0u32..=100, s in 0u32..=100, e in 0u32..=100) {
        prop_assert_eq!(EnergyAllocation::new(w, s, e).is_ok(), w + s + e == 100);
    }
}
