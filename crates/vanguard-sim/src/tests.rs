#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use vanguard_ai::AiSession;
    use vanguard_ai::{CloakCommand, Director, TurnPlan};
    use vanguard_core::commands::{FireOrder, PlayerTurnActions};
    use vanguard_core::components::*;
    use vanguard_core::enums::*;
    use vanguard_core::events::CombatEffect;
    use vanguard_core::state::{GameState, SectorState};
    use vanguard_core::types::{Gauge, Position};

    use crate::boarding::{begin_boarding, process_capture};
    use crate::combat::beam::*;
    use crate::combat::resolve_fire_order;
    use crate::combat::torpedo::{apply_torpedo_damage, build_projectile, torpedo_hit_chance};
    use crate::config::SimConfig;
    use crate::energy::*;
    use crate::engine::{StepKind, TurnEngine};
    use crate::scenario::{by_name, ScenarioId, PLAYER_SHIP_ID};
    use crate::systems;

    /// Returns the same word forever: 0 makes every roll succeed,
    /// u64::MAX makes every roll fail.
    struct FixedRng(u64);

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.0 as u32
        }
        fn next_u64(&mut self) -> u64 {
            self.0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(self.0 as u8);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    const ALWAYS: u64 = 0;
    const NEVER: u64 = u64::MAX;

    fn phaser(base_damage: f64, range: i32) -> BeamWeapon {
        BeamWeapon {
            id: "phaser-1".into(),
            name: "Phaser Array".into(),
            kind: BeamKind::Phaser,
            base_damage,
            range,
        }
    }

    fn gunship(id: &str, faction: Faction, allegiance: Allegiance, x: i32, y: i32) -> Ship {
        let mut s = Ship::new(id, id, faction, allegiance, Position::new(x, y));
        s.allocation = EnergyAllocation::new(80, 10, 10).unwrap();
        s.weapons.push(Weapon::Beam(phaser(20.0, 6)));
        s
    }

    fn skirmish_engine(seed: u64) -> TurnEngine {
        let state = by_name("border_skirmish").unwrap();
        TurnEngine::new(
            state,
            SimConfig {
                seed,
                ..Default::default()
            },
        )
    }

    // ---- Beam weapons ----

    #[test]
    fn test_beam_damage_worked_example() {
        let attacker = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        let damage = beam_damage(&attacker, &phaser(20.0, 6), 3);
        assert!((base_beam_damage(&attacker, &phaser(20.0, 6)) - 16.0).abs() < 1e-9);
        assert!((damage - 9.6).abs() < 1e-9, "got {damage}");
    }

    #[test]
    fn test_range_modifier_bounds() {
        assert_eq!(range_modifier(1, 6), 1.0);
        assert!((range_modifier(6, 6) - RANGE_FLOOR).abs() < 1e-12);
        assert!((range_modifier(3, 6) - 0.6).abs() < 1e-12);
        assert_eq!(range_modifier(1, 1), 1.0);
    }

    const RANGE_FLOOR: f64 = vanguard_core::constants::RANGE_FALLOFF_FLOOR;

    #[test]
    fn test_focus_fire_bonus_progression() {
        assert_eq!(focus_fire_bonus(1), 0.0);
        assert_eq!(focus_fire_bonus(2), 0.25);
        assert_eq!(focus_fire_bonus(3), 0.5);
        assert_eq!(focus_fire_bonus(4), 0.75);
        assert_eq!(focus_fire_bonus(5), 1.0);
        assert_eq!(focus_fire_bonus(12), 1.0);
    }

    #[test]
    fn test_shield_leak_chance_range() {
        assert!((shield_leak_chance(1.0) - 0.05).abs() < 1e-12);
        assert!((shield_leak_chance(0.0) - 1.0).abs() < 1e-12);
        assert!((shield_leak_chance(0.5) - 0.2875).abs() < 1e-12);
    }

    #[test]
    fn test_beam_hit_chance_modifiers() {
        let mut klingon = gunship("k", Faction::Klingon, Allegiance::Enemy, 0, 0);
        let romulan = gunship("r", Faction::Romulan, Allegiance::Enemy, 0, 0);
        let mut target = gunship("p", Faction::Federation, Allegiance::Player, 1, 0);
        let mut disruptor = phaser(20.0, 6);
        disruptor.kind = BeamKind::Disruptor;
        let clear = FireSolution {
            distance: 1,
            target_in_nebula: false,
            target_in_asteroids: false,
        };
        assert!((beam_hit_chance(&romulan, &disruptor, &target, &clear) - 0.9).abs() < 1e-12);
        target.evasive = true;
        let chance = beam_hit_chance(&klingon, &disruptor, &target, &clear);
        assert!((chance - 0.9 * 0.95 * 0.6).abs() < 1e-12);
        klingon.evasive = true;
        let fogged = FireSolution {
            target_in_nebula: true,
            target_in_asteroids: true,
            ..clear
        };
        let chance = beam_hit_chance(&klingon, &disruptor, &target, &fogged);
        assert!((chance - 0.9 * 0.95 * 0.75 * 0.70 * 0.6 * 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_beam_miss_leaves_target_untouched() {
        let mut attacker = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        let mut target = gunship("k", Faction::Klingon, Allegiance::Enemy, 3, 0);
        let before = (target.hull, target.shields);
        let solution = FireSolution {
            distance: 3,
            target_in_nebula: false,
            target_in_asteroids: false,
        };
        let outcome = fire_beam_weapon(
            &mut attacker,
            &mut target,
            &phaser(20.0, 6),
            None,
            &solution,
            1,
            true,
            &mut FixedRng(NEVER),
        );
        assert!(!outcome.hit);
        assert_eq!((target.hull, target.shields), before);
        assert_eq!(target.transient.last_attacker_id.as_deref(), Some("p"));
    }

    #[test]
    fn test_beam_leak_and_absorption() {
        let mut attacker = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        let mut target = gunship("k", Faction::Klingon, Allegiance::Enemy, 3, 0);
        target.shields.set(25.0);
        let solution = FireSolution {
            distance: 3,
            target_in_nebula: false,
            target_in_asteroids: false,
        };
        let outcome = fire_beam_weapon(
            &mut attacker,
            &mut target,
            &phaser(20.0, 6),
            None,
            &solution,
            1,
            true,
            &mut FixedRng(ALWAYS),
        );
        assert!(outcome.hit);
        // 9.6 damage, 28.75% leak chance procs: 2.76 leaks, 6.84 absorbed.
        assert!((outcome.leaked - 2.76).abs() < 1e-9);
        assert!((target.shields.current - (25.0 - 6.84)).abs() < 1e-9);
        assert!((target.hull.current - (100.0 - 2.76)).abs() < 1e-9);
    }

    #[test]
    fn test_player_critical_on_sustained_lock() {
        let mut attacker = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        let mut target = gunship("k", Faction::Klingon, Allegiance::Enemy, 1, 0);
        target.shields.set(0.0);
        attacker.targeting = TargetingState {
            target_id: Some("k".into()),
            subsystem: Some(Subsystem::Weapons),
            consecutive_turns: 1,
            last_fired_turn: Some(1),
        };
        let solution = FireSolution {
            distance: 1,
            target_in_nebula: false,
            target_in_asteroids: false,
        };
        let outcome = fire_beam_weapon(
            &mut attacker,
            &mut target,
            &phaser(20.0, 6),
            Some(Subsystem::Weapons),
            &solution,
            2,
            true,
            &mut FixedRng(ALWAYS),
        );
        // 16 x 1.25 focus = 20, all penetrating; 90% to the subsystem, x1.5.
        assert!((outcome.damage - 20.0).abs() < 1e-9);
        assert!(outcome.critical);
        assert!(outcome.subsystem_destroyed);
        assert!(target.subsystems.weapons.is_empty());
        assert!((target.hull.current - 98.0).abs() < 1e-9);
    }

    #[test]
    fn test_ai_lock_never_crits() {
        let mut attacker = gunship("k", Faction::Klingon, Allegiance::Enemy, 0, 0);
        let mut target = gunship("p", Faction::Federation, Allegiance::Player, 1, 0);
        target.shields.set(0.0);
        attacker.targeting = TargetingState {
            target_id: Some("p".into()),
            subsystem: Some(Subsystem::Weapons),
            consecutive_turns: 1,
            last_fired_turn: Some(1),
        };
        let solution = FireSolution {
            distance: 1,
            target_in_nebula: false,
            target_in_asteroids: false,
        };
        let outcome = fire_beam_weapon(
            &mut attacker,
            &mut target,
            &phaser(20.0, 6),
            Some(Subsystem::Weapons),
            &solution,
            2,
            false,
            &mut FixedRng(ALWAYS),
        );
        assert!(!outcome.critical);
        assert!((target.subsystems.weapons.current - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_hit_during_cloak_transition_adds_instability() {
        let mut attacker = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        let mut target = gunship("w", Faction::Romulan, Allegiance::Enemy, 2, 0);
        target.cloak = CloakSystem::with_reliability(0.9);
        target.cloak.state = CloakState::Decloaking;
        let solution = FireSolution {
            distance: 2,
            target_in_nebula: false,
            target_in_asteroids: false,
        };
        fire_beam_weapon(
            &mut attacker,
            &mut target,
            &phaser(20.0, 6),
            None,
            &solution,
            1,
            true,
            &mut FixedRng(ALWAYS),
        );
        assert!((target.cloak.instability - 0.15).abs() < 1e-12);
    }

    // ---- Torpedoes ----

    #[test]
    fn test_torpedo_hit_table() {
        assert!((torpedo_hit_chance(1, TorpedoType::Photon) - 0.80).abs() < 1e-12);
        assert!((torpedo_hit_chance(1, TorpedoType::Quantum) - 0.95).abs() < 1e-12);
        assert!((torpedo_hit_chance(3, TorpedoType::Plasma) - 0.40).abs() < 1e-12);
        assert!((torpedo_hit_chance(4, TorpedoType::HeavyPhoton) - 0.05).abs() < 1e-12);
        for ty in [
            TorpedoType::Photon,
            TorpedoType::Quantum,
            TorpedoType::Plasma,
            TorpedoType::HeavyPlasma,
            TorpedoType::HeavyPhoton,
        ] {
            assert_eq!(torpedo_hit_chance(5, ty), 0.0);
            assert_eq!(torpedo_hit_chance(11, ty), 0.0);
        }
    }

    fn torpedo_launcher(torpedo_type: TorpedoType, damage: f64, special: Option<PlasmaBurn>) -> TorpedoLauncher {
        TorpedoLauncher {
            id: "tube".into(),
            name: "Tube".into(),
            torpedo_type,
            damage,
            speed: 3,
            special,
        }
    }

    #[test]
    fn test_quantum_bypass_lands_through_full_shields() {
        let shooter = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        let mut target = gunship("k", Faction::Klingon, Allegiance::Enemy, 1, 0);
        target.shields = Gauge::full(100.0);
        let torpedo = build_projectile(
            "t-1".into(),
            &shooter,
            &torpedo_launcher(TorpedoType::Quantum, 40.0, None),
            "k",
        );
        let outcome = apply_torpedo_damage(&torpedo, &mut target, 1, &mut FixedRng(ALWAYS));
        assert!(outcome.hit);
        assert_eq!(outcome.range, 1);
        assert_eq!(target.hull.current, 90.0);
        assert!((target.shields.current - 92.5).abs() < 1e-9);
    }

    #[test]
    fn test_plasma_applies_burn() {
        let shooter = gunship("w", Faction::Romulan, Allegiance::Enemy, 0, 0);
        let mut target = gunship("p", Faction::Federation, Allegiance::Player, 1, 1);
        let torpedo = build_projectile(
            "t-1".into(),
            &shooter,
            &torpedo_launcher(TorpedoType::Plasma, 60.0, Some(PlasmaBurn { damage: 5.0, turns: 3 })),
            "p",
        );
        let outcome = apply_torpedo_damage(&torpedo, &mut target, 1, &mut FixedRng(ALWAYS));
        assert!(outcome.plasma_burn);
        assert_eq!(
            target.status_effects,
            vec![StatusEffect::PlasmaBurn {
                damage: 5.0,
                turns_remaining: 3
            }]
        );
    }

    fn duel_state() -> GameState {
        let mut sector = SectorState::default();
        sector
            .ships
            .push(gunship(PLAYER_SHIP_ID, Faction::Federation, Allegiance::Player, 2, 2));
        sector
            .ships
            .push(gunship("k", Faction::Klingon, Allegiance::Enemy, 5, 2));
        GameState::new(PLAYER_SHIP_ID, sector).unwrap()
    }

    #[test]
    fn test_torpedo_homes_and_impacts() {
        let mut state = duel_state();
        let shooter = state.sector.ship(PLAYER_SHIP_ID).unwrap().clone();
        let torpedo = build_projectile(
            "t-1".into(),
            &shooter,
            &torpedo_launcher(TorpedoType::Photon, 30.0, None),
            "k",
        );
        state.sector.torpedoes.push(torpedo);
        assert!(systems::projectiles::run(&mut state, &mut FixedRng(ALWAYS)));
        let t = &state.sector.torpedoes[0];
        assert!(t.destroyed);
        assert_eq!(t.position, Position::new(5, 2));
        assert_eq!(t.travelled(), 3);
        assert!(state
            .combat_effects
            .iter()
            .any(|e| matches!(e, CombatEffect::TorpedoImpact { hit: true, .. })));
        assert!(state.sector.ship("k").unwrap().shields.current < 50.0);
    }

    #[test]
    fn test_torpedo_lost_when_target_cloaks() {
        let mut state = duel_state();
        let shooter = state.sector.ship(PLAYER_SHIP_ID).unwrap().clone();
        let torpedo = build_projectile(
            "t-1".into(),
            &shooter,
            &torpedo_launcher(TorpedoType::Photon, 30.0, None),
            "k",
        );
        state.sector.torpedoes.push(torpedo);
        state.sector.ship_mut("k").unwrap().cloak.state = CloakState::Cloaked;
        systems::projectiles::run(&mut state, &mut FixedRng(ALWAYS));
        let t = &state.sector.torpedoes[0];
        assert!(t.destroyed);
        assert_eq!(t.travelled(), 0);
        assert_eq!(state.sector.ship("k").unwrap().shields.current, 50.0);
    }

    #[test]
    fn test_torpedo_impact_mid_transition_destabilizes_cloak() {
        for cloak_state in [CloakState::Cloaking, CloakState::Decloaking] {
            let mut state = duel_state();
            let shooter = state.sector.ship(PLAYER_SHIP_ID).unwrap().clone();
            let torpedo = build_projectile(
                "t-1".into(),
                &shooter,
                &torpedo_launcher(TorpedoType::Photon, 30.0, None),
                "k",
            );
            state.sector.torpedoes.push(torpedo);
            let k = state.sector.ship_mut("k").unwrap();
            k.cloak = CloakSystem::with_reliability(0.9);
            k.cloak.state = cloak_state;
            systems::projectiles::run(&mut state, &mut FixedRng(ALWAYS));
            assert_eq!(state.sector.torpedoes[0].travelled(), 3);
            let k = state.sector.ship("k").unwrap();
            assert!((k.cloak.instability - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn test_beam_lock_held_through_decloak() {
        let mut state = duel_state();
        state.turn = 5;
        state.sector.ship_mut("k").unwrap().cloak = CloakSystem::with_reliability(0.9);
        state.sector.ship_mut("k").unwrap().cloak.state = CloakState::Decloaking;
        let order = FireOrder {
            weapon_id: "phaser-1".into(),
            target_id: "k".into(),
            subsystem: None,
        };

        // No earlier shot: nothing to track.
        let refused = resolve_fire_order(&mut state, PLAYER_SHIP_ID, &order, &mut FixedRng(ALWAYS));
        assert!(!refused.success);
        assert!(refused.logs[0].starts_with("No sensor lock"));

        state
            .sector
            .ship_mut(PLAYER_SHIP_ID)
            .unwrap()
            .targeting
            .register_fire("k", None, 4);
        let fired = resolve_fire_order(&mut state, PLAYER_SHIP_ID, &order, &mut FixedRng(ALWAYS));
        assert!(fired.success);
        let k = state.sector.ship("k").unwrap();
        assert!((k.cloak.instability - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_torpedo_burns_out() {
        let mut state = duel_state();
        state.sector.ship_mut("k").unwrap().position = Position::new(11, 9);
        let shooter = state.sector.ship(PLAYER_SHIP_ID).unwrap().clone();
        let mut torpedo = build_projectile(
            "t-1".into(),
            &shooter,
            &torpedo_launcher(TorpedoType::Photon, 30.0, None),
            "k",
        );
        torpedo.path = vec![Position::new(0, 0); 12];
        state.sector.torpedoes.push(torpedo);
        systems::projectiles::run(&mut state, &mut FixedRng(ALWAYS));
        let t = &state.sector.torpedoes[0];
        assert!(t.destroyed);
        assert_eq!(t.travelled(), 12);
        assert!(state.turn_events.iter().any(|e| e.starts_with("TORPEDO BURNOUT")));
    }

    // ---- Point defense ----

    #[test]
    fn test_point_defense_full_health_always_hits() {
        let mut state = duel_state();
        state.player_ship_mut().unwrap().point_defense_enabled = true;
        let shooter = state.sector.ship("k").unwrap().clone();
        let mut torpedo = build_projectile(
            "t-1".into(),
            &shooter,
            &torpedo_launcher(TorpedoType::Photon, 30.0, None),
            PLAYER_SHIP_ID,
        );
        torpedo.position = Position::new(3, 2);
        state.sector.torpedoes.push(torpedo);
        let player = state.player_ship().unwrap();
        assert_eq!(systems::point_defense::point_defense_hit_chance(player), 1.0);

        for seed in 0..20 {
            let mut trial = state.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            assert_eq!(systems::point_defense::run(&mut trial, &mut rng), 1);
            assert!(trial.sector.torpedoes[0].destroyed);
        }
    }

    // ---- Energy and life support ----

    #[test]
    fn test_dilithium_recharge_bounds() {
        let mut s = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        s.subsystems.engines.set(0.0);
        assert!((dilithium_recharge_per_crystal(&s) - 5.0).abs() < 1e-9);
        s.subsystems.engines.set(20.0);
        assert!((dilithium_recharge_per_crystal(&s) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_emergency_recharge_burns_crystals() {
        let mut s = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        s.energy.set(0.0);
        s.allocation = EnergyAllocation::new(100, 0, 0).unwrap();
        s.subsystems.engines.set(2.0);
        let mut rng = FixedRng(NEVER);
        let report = process_energy(&mut s, &mut rng);
        assert_eq!(report.crystals_used, 1);
        assert!(!report.starved);
        assert!(report.incidental_damage.is_none());
        assert_eq!(s.dilithium.current, 4.0);
        assert!(s.energy.current > 0.0);
    }

    #[test]
    fn test_emergency_recharge_can_damage_subsystem() {
        let mut s = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        s.energy.set(0.0);
        s.allocation = EnergyAllocation::new(100, 0, 0).unwrap();
        s.subsystems.engines.set(2.0);
        let report = process_energy(&mut s, &mut FixedRng(ALWAYS));
        let (subsystem, amount) = report.incidental_damage.unwrap();
        assert_ne!(subsystem, Subsystem::Engines);
        assert!((5.0..=10.0).contains(&amount));
    }

    #[test]
    fn test_life_support_failure_makes_derelict() {
        let mut s = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        assert!(!advance_life_support(&mut s, true));
        assert_eq!(s.life_support_failure_turns, Some(1));
        assert!(advance_life_support(&mut s, true));
        assert!(s.derelict);
        assert!(s.hull.current <= s.hull.max * 0.10);
        assert_eq!(s.shields.current, 0.0);
        assert!(s.subsystems.iter().all(|(_, g)| g.is_empty()));
        assert!(!s.can_act());
    }

    #[test]
    fn test_life_support_recovers_when_fixed() {
        let mut s = gunship("p", Faction::Federation, Allegiance::Player, 0, 0);
        advance_life_support(&mut s, true);
        assert!(!advance_life_support(&mut s, false));
        assert_eq!(s.life_support_failure_turns, None);
        assert!(!s.derelict);
    }

    // ---- Boarding ----

    #[test]
    fn test_player_boarding_takes_four_turns() {
        let mut state = duel_state();
        {
            let k = state.sector.ship_mut("k").unwrap();
            k.position = Position::new(3, 2);
            make_derelict(k);
        }
        let outcome = begin_boarding(&mut state, PLAYER_SHIP_ID, "k", 4);
        assert!(outcome.success, "{:?}", outcome.logs);
        assert_eq!(state.player_ship().unwrap().security_teams.current, 1.0);

        let start = state.turn;
        let k = state.sector.ship_mut("k").unwrap();
        assert!(!k.can_act());
        assert!(process_capture(k, start + 3).is_none());
        assert!(process_capture(k, start + 4).is_some());
        assert_eq!(k.allegiance, Allegiance::Player);
        assert_eq!(k.faction, Faction::Federation);
        assert!(!k.derelict);
        assert!(k.hull.fraction() >= 0.30 - 1e-12);
        assert!(k.subsystems.iter().all(|(_, g)| g.fraction() >= 0.30 - 1e-12));
        assert!(k.dilithium.current >= 2.0);
        assert!(k.can_act());
    }

    #[test]
    fn test_boarding_requires_adjacent_derelict() {
        let mut state = duel_state();
        let outcome = begin_boarding(&mut state, PLAYER_SHIP_ID, "k", 4);
        assert!(!outcome.success);
        make_derelict(state.sector.ship_mut("k").unwrap());
        let outcome = begin_boarding(&mut state, PLAYER_SHIP_ID, "k", 4);
        assert!(!outcome.success);
        assert!(state.sector.ship("k").unwrap().capture_info.is_none());
    }

    #[test]
    fn test_ai_capture_completes_same_turn() {
        let mut state = duel_state();
        {
            let p = state.player_ship_mut().unwrap();
            p.position = Position::new(4, 2);
            make_derelict(p);
        }
        assert!(begin_boarding(&mut state, "k", PLAYER_SHIP_ID, 0).success);
        let turn = state.turn;
        let p = state.player_ship_mut().unwrap();
        assert!(process_capture(p, turn).is_some());
        assert_eq!(p.allegiance, Allegiance::Enemy);
    }

    // ---- Squadron coordination through the engine's AI phase ----

    #[test]
    fn test_squadron_fires_on_one_target() {
        let mut sector = SectorState::default();
        let mut player = gunship(PLAYER_SHIP_ID, Faction::Federation, Allegiance::Player, 2, 3);
        player.hull.set(60.0);
        sector.ships.push(player);
        sector
            .ships
            .push(gunship("ally", Faction::Federation, Allegiance::Ally, 2, 7));
        for (id, y) in [("k1", 1), ("k2", 5), ("k3", 8)] {
            let mut k = gunship(id, Faction::Klingon, Allegiance::Enemy, 9, y);
            k.weapons = vec![Weapon::Beam(BeamWeapon {
                id: format!("{id}-disruptor"),
                name: "Disruptor".into(),
                kind: BeamKind::Disruptor,
                base_damage: 15.0,
                range: 12,
            })];
            sector.ships.push(k);
        }
        let state = GameState::new(PLAYER_SHIP_ID, sector).unwrap();
        let mut session = AiSession::new();
        let chosen = session
            .coordinate(Allegiance::Enemy, &state.sector)
            .expect("squadron target");
        assert_eq!(chosen, PLAYER_SHIP_ID);

        let director = Director::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for id in ["k1", "k2", "k3"] {
            let plan = systems::ai_turn::plan_for(&state, id, &session, &director, &mut rng).unwrap();
            assert!(!plan.beams.is_empty(), "{id} held fire");
            assert!(plan.beams.iter().all(|o| o.target_id == chosen), "{id} broke formation");
        }
    }

    // ---- AI plan application ----

    fn beam_at_player() -> FireOrder {
        FireOrder {
            weapon_id: "phaser-1".into(),
            target_id: PLAYER_SHIP_ID.into(),
            subsystem: None,
        }
    }

    #[test]
    fn test_idle_plan_changes_nothing() {
        let mut state = duel_state();
        let before = state.clone();
        systems::ai_turn::apply_plan(&mut state, &TurnPlan::new("k"), &mut FixedRng(ALWAYS));
        assert_eq!(state, before);
    }

    #[test]
    fn test_consumed_turn_skips_movement_and_weapons() {
        let mut state = duel_state();
        state.sector.ship_mut("k").unwrap().cloak = CloakSystem::with_reliability(0.9);
        let mut plan = TurnPlan::new("k");
        plan.movement = Some(Position::new(5, 3));
        plan.beams.push(beam_at_player());
        plan.cloak = CloakCommand::Engage;
        plan.consumed_turn = true;
        systems::ai_turn::apply_plan(&mut state, &plan, &mut FixedRng(ALWAYS));

        let k = state.sector.ship("k").unwrap();
        assert_eq!(k.position, Position::new(5, 2));
        assert_eq!(k.cloak.state, CloakState::Cloaking);
        assert_eq!(state.player_ship().unwrap().shields.current, 50.0);
    }

    #[test]
    fn test_ai_move_limited_to_one_cell() {
        let mut state = duel_state();
        let mut plan = TurnPlan::new("k");
        plan.movement = Some(Position::new(7, 2));
        systems::ai_turn::apply_plan(&mut state, &plan, &mut FixedRng(ALWAYS));
        assert_eq!(state.sector.ship("k").unwrap().position, Position::new(5, 2));
        assert!(!state.logs.iter().any(|l| l.message.starts_with("Helm:")));

        plan.movement = Some(Position::new(6, 2));
        systems::ai_turn::apply_plan(&mut state, &plan, &mut FixedRng(ALWAYS));
        assert_eq!(state.sector.ship("k").unwrap().position, Position::new(6, 2));
    }

    // ---- Engine ----

    #[test]
    fn test_determinism_same_seed() {
        let mut engine_a = skirmish_engine(12345);
        let mut engine_b = skirmish_engine(12345);
        for _ in 0..8 {
            let actions = PlayerTurnActions::navigate(Position::new(5, 5));
            engine_a.end_turn(&actions);
            engine_b.end_turn(&actions);
            let json_a = serde_json::to_string(engine_a.state()).unwrap();
            let json_b = serde_json::to_string(engine_b.state()).unwrap();
            assert_eq!(json_a, json_b, "States diverged with same seed");
        }
    }

    #[test]
    fn test_steps_are_ordered() {
        let mut engine = skirmish_engine(42);
        let steps = engine.end_turn(&PlayerTurnActions::default());
        assert_eq!(steps.first().unwrap().kind, StepKind::Player);
        assert_eq!(steps[1].kind, StepKind::AiShip("lexington".into()));
        assert_eq!(steps[2].kind, StepKind::AiShip("mercator".into()));
        let last = steps.last().unwrap();
        assert_eq!(last.kind, StepKind::Final);
        assert_eq!(&last.state, engine.state());
        assert_eq!(engine.state().turn, 2);
        assert_eq!(engine.state().turn_events.first().map(String::as_str), Some("TURN 1"));
        let eot = steps.iter().position(|s| s.kind == StepKind::EndOfTurn).unwrap();
        assert_eq!(eot, steps.len() - 2);
    }

    #[test]
    fn test_player_moves_three_cells() {
        let mut engine = skirmish_engine(42);
        let steps = engine.end_turn(&PlayerTurnActions::navigate(Position::new(4, 5)));
        let player = steps[0].state.player_ship().unwrap();
        assert_eq!(player.position, Position::new(4, 5));
        assert_eq!(player.energy.current, 117.0);
        assert_eq!(steps[0].state.player.navigation_target, None);
        assert!(steps[0]
            .state
            .turn_events
            .iter()
            .any(|e| e == "MOVE: 'USS Enterprise' from (1,5) to (4,5)"));
    }

    #[test]
    fn test_red_alert_slows_to_one_cell() {
        let mut engine = skirmish_engine(42);
        let actions = PlayerTurnActions {
            red_alert: Some(true),
            navigation_target: Some(Position::new(4, 5)),
            ..Default::default()
        };
        let steps = engine.end_turn(&actions);
        let state = &steps[0].state;
        assert_eq!(state.player_ship().unwrap().position, Position::new(2, 5));
        assert_eq!(state.player.navigation_target, Some(Position::new(4, 5)));
    }

    #[test]
    fn test_hidden_mine_detonates() {
        let state = ScenarioId::NebulaAmbush.build().unwrap();
        let mut engine = TurnEngine::new(state, SimConfig::default());
        let steps = engine.end_turn(&PlayerTurnActions::navigate(Position::new(4, 5)));
        let state = &steps[0].state;
        let player = state.player_ship().unwrap();
        assert_eq!(player.position, Position::new(4, 5));
        assert_eq!(player.shields.current, 80.0 - 25.0);
        assert!(state.sector.mines.is_empty());
    }

    #[test]
    fn test_step_back_replays_identically() {
        let mut engine = skirmish_engine(7);
        let actions = PlayerTurnActions::navigate(Position::new(4, 4));
        engine.end_turn(&actions);
        let first = serde_json::to_string(engine.state()).unwrap();
        assert!(engine.step_back());
        assert_eq!(engine.state().turn, 1);
        engine.end_turn(&actions);
        assert_eq!(serde_json::to_string(engine.state()).unwrap(), first);
        assert!(engine.step_back());
        assert!(!engine.step_back());
    }

    #[test]
    fn test_history_limit() {
        let state = by_name("border_skirmish").unwrap();
        let mut engine = TurnEngine::new(
            state,
            SimConfig {
                history_limit: 2,
                ..Default::default()
            },
        );
        for _ in 0..4 {
            engine.end_turn(&PlayerTurnActions::default());
        }
        assert_eq!(engine.history_len(), 2);
    }

    #[test]
    fn test_victory_when_no_enemies() {
        let mut state = by_name("border_skirmish").unwrap();
        state.sector.ships.retain(|s| s.allegiance != Allegiance::Enemy);
        let mut engine = TurnEngine::new(state, SimConfig::default());
        engine.end_turn(&PlayerTurnActions::default());
        assert!(engine.state().game_over);
        assert!(engine.state().game_won);

        let turn = engine.state().turn;
        let steps = engine.end_turn(&PlayerTurnActions::default());
        assert_eq!(steps.len(), 1);
        assert_eq!(engine.state().turn, turn);
    }

    #[test]
    fn test_defeat_when_player_derelict() {
        let mut state = by_name("border_skirmish").unwrap();
        make_derelict(state.player_ship_mut().unwrap());
        let mut engine = TurnEngine::new(state, SimConfig::default());
        engine.end_turn(&PlayerTurnActions::default());
        assert!(engine.state().game_over);
        assert!(!engine.state().game_won);
    }

    #[test]
    fn test_invalid_allocation_rejected_in_turn() {
        let mut engine = skirmish_engine(42);
        let bad: EnergyAllocation =
            serde_json::from_str(r#"{"weapons":90,"shields":30,"engines":30}"#).unwrap();
        let actions = PlayerTurnActions {
            allocation: Some(bad),
            ..Default::default()
        };
        let steps = engine.end_turn(&actions);
        let player = steps[0].state.player_ship().unwrap();
        assert_eq!(player.allocation, EnergyAllocation::BALANCED);
        assert!(steps[0]
            .state
            .logs
            .iter()
            .any(|l| l.message.starts_with("Allocation rejected")));
    }

    #[test]
    fn test_out_of_range_fire_is_noop() {
        let mut engine = skirmish_engine(42);
        let actions = PlayerTurnActions::fire_at("enterprise-phaser", "gorkon", None);
        let steps = engine.end_turn(&actions);
        let state = &steps[0].state;
        assert_eq!(state.player_ship().unwrap().energy.current, 120.0);
        assert!(state.logs.iter().any(|l| l.message.contains("out of range")));
        assert!(!state.turn_events.iter().any(|e| e.starts_with("FIRE")));
    }

    #[test]
    fn test_scenarios_build() {
        for id in ScenarioId::ALL {
            let state = id.build().unwrap();
            assert!(state.player_ship().is_some(), "{}", id.name());
            assert!(state.sector.ships_of(Allegiance::Enemy).count() > 0);
        }
        assert!(by_name("nowhere").is_err());
    }
}
