//! Simulation constants and tuning parameters.

// --- Grids ---

/// Tactical sector width in cells.
pub const SECTOR_WIDTH: i32 = 12;

/// Tactical sector height in cells.
pub const SECTOR_HEIGHT: i32 = 10;

/// Strategic quadrant grid is QUADRANT_SIZE x QUADRANT_SIZE.
pub const QUADRANT_SIZE: i32 = 8;

// --- Movement ---

/// Player cells per turn at normal condition.
pub const PLAYER_SPEED: u32 = 3;

/// Player cells per turn under red alert.
pub const PLAYER_RED_ALERT_SPEED: u32 = 1;

/// AI ships move at most this many cells per turn.
pub const AI_SPEED: u32 = 1;

/// Energy spent per cell moved.
pub const MOVE_ENERGY_COST: f64 = 1.0;

// --- Beam weapons ---

/// Hit chance before any modifier.
pub const BEAM_BASE_HIT_CHANCE: f64 = 0.90;

/// Accuracy multiplier for non-Romulan disruptors.
pub const DISRUPTOR_ACCURACY: f64 = 0.95;

/// Target inside a nebula cell.
pub const NEBULA_TARGET_ACCURACY: f64 = 0.75;

/// Target inside an asteroid field cell.
pub const ASTEROID_TARGET_ACCURACY: f64 = 0.70;

/// Target flying evasively.
pub const EVASIVE_TARGET_ACCURACY: f64 = 0.60;

/// Attacker flying evasively.
pub const EVASIVE_ATTACKER_ACCURACY: f64 = 0.75;

/// Beam output multiplier while point defense is enabled.
pub const POINT_DEFENSE_BEAM_PENALTY: f64 = 0.6;

/// Beam range reduction while point defense is enabled.
pub const POINT_DEFENSE_RANGE_PENALTY: i32 = 1;

/// Damage multiplier at a weapon's maximum range.
pub const RANGE_FALLOFF_FLOOR: f64 = 0.20;

/// Focus-fire bonus per consecutive turn beyond the first.
pub const FOCUS_FIRE_STEP: f64 = 0.25;

/// Maximum focus-fire bonus.
pub const FOCUS_FIRE_CAP: f64 = 1.0;

/// Shield leak chance at full shields.
pub const SHIELD_LEAK_FLOOR: f64 = 0.05;

/// Scale applied to (1 - shield_fraction)^2 in the leak chance.
pub const SHIELD_LEAK_SCALE: f64 = 0.95;

/// Share of penetrating damage routed to a targeted subsystem.
pub const SUBSYSTEM_DAMAGE_SHARE: f64 = 0.70;

/// Share routed to the subsystem when the target's shields are down.
pub const SUBSYSTEM_DAMAGE_SHARE_SHIELDS_DOWN: f64 = 0.90;

/// Shield fraction at or below which shields count as down.
pub const SHIELDS_DOWN_THRESHOLD: f64 = 0.20;

/// Multiplier on subsystem damage for a sustained player lock.
pub const CRITICAL_HIT_MULTIPLIER: f64 = 1.5;

/// Consecutive lock turns needed before critical hits apply.
pub const CRITICAL_HIT_MIN_TURNS: u32 = 2;

/// Energy drawn per beam shot.
pub const BEAM_ENERGY_COST: f64 = 10.0;

// --- Torpedoes ---

/// Hit chance by launch-to-impact range 1..=4. Anything further is 0.
pub const TORPEDO_HIT_BY_RANGE: [f64; 4] = [0.80, 0.70, 0.50, 0.25];

/// Share of quantum torpedo damage that ignores shields.
pub const QUANTUM_BYPASS_FRACTION: f64 = 0.25;

/// Damage absorbed per point of shield by a torpedo warhead.
pub const TORPEDO_SHIELD_RATIO: f64 = 4.0;

/// Cells a torpedo may travel before it burns out.
pub const TORPEDO_MAX_TRAVEL: usize = 12;

/// Energy drawn per torpedo launch.
pub const TORPEDO_ENERGY_COST: f64 = 5.0;

/// Maximum launch range the AI considers for torpedoes.
pub const TORPEDO_MAX_LAUNCH_RANGE: i32 = 4;

// --- Cloak ---

/// Turns spent in Cloaking or Decloaking.
pub const CLOAK_TRANSITION_TURNS: u32 = 2;

/// Instability added when hit by a beam mid-transition.
pub const CLOAK_INSTABILITY_BEAM: f64 = 0.15;

/// Instability added when hit by a torpedo mid-transition.
pub const CLOAK_INSTABILITY_TORPEDO: f64 = 0.25;

/// Instability cap.
pub const CLOAK_INSTABILITY_MAX: f64 = 0.80;

/// Instability bled off per turn while stably cloaked.
pub const CLOAK_INSTABILITY_DECAY: f64 = 0.05;

/// Reliability multiplier inside a nebula.
pub const CLOAK_NEBULA_MODIFIER: f64 = 0.75;

/// Reliability multiplier inside an asteroid field.
pub const CLOAK_ASTEROID_MODIFIER: f64 = 0.90;

/// Cooldown after a cloak failure.
pub const CLOAK_FAILURE_COOLDOWN: u32 = 2;

/// Turns shields stay offline after a cloak failure.
pub const CLOAK_SHIELD_REACTIVATION_DELAY: u32 = 2;

// --- Energy ---

/// Reactor output at full engine health and 33% engine allocation (~1.0x).
pub const ENERGY_BASE_GENERATION: f64 = 25.0;

/// Fixed per-turn draw.
pub const ENERGY_BASE_CONSUMPTION: f64 = 5.0;

/// Draw per subsystem with health above zero.
pub const ENERGY_PER_SUBSYSTEM: f64 = 1.0;

pub const ENERGY_SHIELDS_ACTIVE_COST: f64 = 4.0;
pub const ENERGY_EVASIVE_COST: f64 = 5.0;
pub const ENERGY_POINT_DEFENSE_COST: f64 = 3.0;
pub const ENERGY_REPAIR_COST: f64 = 4.0;
pub const ENERGY_CLOAK_COST: f64 = 8.0;

/// Dilithium recharge at 0% engine health, as a fraction of max energy.
pub const DILITHIUM_MIN_RECHARGE: f64 = 0.05;

/// Cumulative chance per crystal of incidental subsystem damage.
pub const DILITHIUM_DAMAGE_CHANCE_PER_CRYSTAL: f64 = 0.25;

/// Incidental damage range before scaling by crystals used.
pub const DILITHIUM_DAMAGE_MIN: f64 = 5.0;
pub const DILITHIUM_DAMAGE_MAX: f64 = 10.0;

// --- Shields ---

/// Regen per turn as a fraction of max shields at baseline allocation.
pub const SHIELD_REGEN_FRACTION: f64 = 0.10;

/// Shield allocation percentage that yields a 1.0x regen multiplier.
pub const SHIELD_REGEN_BASELINE_ALLOCATION: f64 = 33.0;

// --- Life support ---

/// Turns of life-support failure before the crew abandons ship.
pub const LIFE_SUPPORT_FAILURE_TURNS: u32 = 2;

/// Hull ceiling for a derelict, as a fraction of max hull.
pub const DERELICT_HULL_FRACTION: f64 = 0.10;

/// Reserve drained per turn while the life-support subsystem is down.
pub const LIFE_SUPPORT_RESERVE_DRAIN: f64 = 1.0;

// --- Repairs ---

pub const REPAIR_HULL_FRACTION: f64 = 0.05;
pub const REPAIR_SUBSYSTEM_FRACTION: f64 = 0.15;

// --- Point defense ---

/// Interception reach in cells.
pub const POINT_DEFENSE_RANGE: i32 = 1;

// --- Boarding ---

/// Turns a prize crew needs to restore a captured derelict.
pub const CAPTURE_REPAIR_TURNS: u32 = 4;

/// Minimum operational fraction restored on capture.
pub const CAPTURE_RESTORE_FRACTION: f64 = 0.30;

/// Dilithium crystals carried by a boarding party.
pub const BOARDING_PARTY_DILITHIUM: f64 = 2.0;

// --- Desperation ---

/// Hull fraction below which desperation moves become possible.
pub const DESPERATION_HULL_THRESHOLD: f64 = 0.30;

/// Enemy proximity that triggers desperation.
pub const DESPERATION_RANGE: i32 = 3;

/// Ramming damage as a fraction of the rammer's max hull.
pub const RAM_DAMAGE_FRACTION: f64 = 0.6;

/// Self-destruct splash damage to adjacent ships.
pub const SELF_DESTRUCT_DAMAGE: f64 = 40.0;

/// Chance a Romulan escape attempt ends in a warp-core breach.
pub const ROMULAN_ESCAPE_FAILURE: f64 = 0.30;

/// Turns a retreating ship needs before it can jump out.
pub const RETREAT_TURNS: u32 = 2;

// --- Squadron targeting ---

/// Persistence bonus granted to a freshly chosen squadron target.
pub const PERSISTENCE_BONUS_INITIAL: f64 = 150.0;

/// Persistence bonus lost per turn.
pub const PERSISTENCE_BONUS_DECAY: f64 = 50.0;

/// Comm blackout requires every cell within this radius to be nebula.
pub const COMM_BLACKOUT_RADIUS: i32 = 2;

// --- Threat display ---

/// Contributors kept in a threat summary.
pub const THREAT_TOP_CONTRIBUTORS: usize = 3;

/// Turns a lost contact is remembered.
pub const HIDDEN_CONTACT_MEMORY_TURNS: u32 = 3;

// --- Display ---

/// Default animation delay per step kind (milliseconds).
pub const STEP_DELAY_PLAYER_MS: u64 = 400;
pub const STEP_DELAY_AI_MS: u64 = 350;
pub const STEP_DELAY_POINT_DEFENSE_MS: u64 = 250;
pub const STEP_DELAY_PROJECTILE_MS: u64 = 300;
pub const STEP_DELAY_END_OF_TURN_MS: u64 = 200;
