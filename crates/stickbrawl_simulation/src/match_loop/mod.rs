//! Match loop: спавн двух бойцов, проверка победителя, награды.
//!
//! Порядок кадра задаётся FightSet (см. lib.rs):
//! Decide → Tick → Resolve → Outcome. Здесь живёт только Outcome и setup.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{AiController, BossController, Difficulty, FighterBrain, HumanPolicy};
use crate::combat::{Combatant, FighterStats};
use crate::components::{Facing, FighterSlot, Opponent};
use crate::config::{ArchetypeRegistry, ArenaConfig, ConfigError, EquipmentCatalog};
use crate::input::InputSnapshot;
use crate::progress::Progress;
use crate::FightSet;

/// Coins for beating a regular opponent.
pub const VICTORY_REWARD: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    VsAi(Difficulty),
    VsPlayer,
    /// Same opponent as VsAi, no rewards.
    Training(Difficulty),
    /// Boss archetype id.
    Boss(String),
}

impl GameMode {
    pub fn label(&self) -> String {
        match self {
            GameMode::VsAi(difficulty) => format!("vs_ai/{}", difficulty.name()),
            GameMode::VsPlayer => "vs_player".to_string(),
            GameMode::Training(difficulty) => format!("training/{}", difficulty.name()),
            GameMode::Boss(id) => format!("boss/{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSetup {
    pub mode: GameMode,
    pub player_one: String,
    /// Ignored in boss mode.
    pub player_two: String,
}

impl MatchSetup {
    pub fn new(mode: GameMode, player_one: &str, player_two: &str) -> Self {
        Self {
            mode,
            player_one: player_one.to_string(),
            player_two: player_two.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchEntities {
    pub player_one: Entity,
    pub player_two: Entity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: FighterSlot,
    pub winner_entity: Entity,
    /// Coins paid to the winner (only player one is ever paid).
    pub reward: u32,
    pub mode: GameMode,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MatchState {
    pub mode: GameMode,
    /// Frames simulated since the match started.
    pub frame: u64,
    /// Paid out if player one wins.
    pub victory_reward: u32,
    pub outcome: Option<MatchOutcome>,
}

impl MatchState {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Матч закончился (ровно одно событие на матч)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct MatchEnded {
    pub outcome: MatchOutcome,
}

/// Run condition for every fight system.
pub fn match_in_progress(state: Option<Res<MatchState>>) -> bool {
    state.is_some_and(|state| !state.is_finished())
}

// ============================================================================
// Setup
// ============================================================================

/// Spawns both fighters and (re)starts the match state.
///
/// Player one gets the equipment listed by the `Progress` store. Unknown ids
/// fail here, before any frame runs, and leave the current match untouched.
/// On success fighters of the previous match are despawned.
pub fn spawn_match(world: &mut World, setup: &MatchSetup) -> Result<MatchEntities, ConfigError> {
    let arena = world.get_resource::<ArenaConfig>().cloned().unwrap_or_default();
    let registry = world
        .get_resource::<ArchetypeRegistry>()
        .cloned()
        .unwrap_or_default();
    let catalog = world
        .get_resource::<EquipmentCatalog>()
        .cloned()
        .unwrap_or_default();
    let equipped = world
        .get_resource::<Progress>()
        .map(|progress| progress.0.equipped_items())
        .unwrap_or_default();

    // Player one
    let mut p1 = Combatant::new(registry.character(&setup.player_one)?, &arena, arena.spawn_margin);
    for item in catalog.resolve(equipped.iter().map(String::as_str))? {
        p1.equip(item);
    }

    // Player two
    let p2_x = arena.screen_width - arena.spawn_margin;
    let (mut p2, p2_brain, victory_reward) = match &setup.mode {
        GameMode::VsAi(difficulty) | GameMode::Training(difficulty) => {
            let archetype = registry.character(&setup.player_two)?;
            let mut stats = FighterStats::from_archetype(archetype);
            difficulty.apply_overrides(&mut stats);
            let reward = match setup.mode {
                GameMode::Training(_) => 0,
                _ => VICTORY_REWARD,
            };
            (
                Combatant::with_stats(&archetype.id, stats, &arena, p2_x),
                FighterBrain::Ai(AiController::new(*difficulty)),
                reward,
            )
        }
        GameMode::VsPlayer => (
            Combatant::new(registry.character(&setup.player_two)?, &arena, p2_x),
            FighterBrain::Human(HumanPolicy),
            VICTORY_REWARD,
        ),
        GameMode::Boss(id) => {
            let boss = registry.boss(id)?;
            (
                Combatant::with_stats(
                    boss.id(),
                    FighterStats::from_archetype(&boss.fighter),
                    &arena,
                    p2_x,
                ),
                FighterBrain::Boss(Box::new(BossController::new(boss))),
                boss.reward,
            )
        }
    };
    p2.face(Facing::Left);

    clear_fighters(world);

    let p1_name = p1.archetype_id.clone();
    let p2_name = p2.archetype_id.clone();

    let player_one = world
        .spawn((
            p1,
            FighterSlot::PlayerOne,
            FighterBrain::Human(HumanPolicy),
            InputSnapshot::default(),
        ))
        .id();

    let mut p2_entity = world.spawn((
        p2,
        FighterSlot::PlayerTwo,
        p2_brain,
        Opponent(player_one),
    ));
    if setup.mode == GameMode::VsPlayer {
        p2_entity.insert(InputSnapshot::default());
    }
    let player_two = p2_entity.id();

    world.entity_mut(player_one).insert(Opponent(player_two));

    world.insert_resource(MatchState {
        mode: setup.mode.clone(),
        frame: 0,
        victory_reward,
        outcome: None,
    });

    crate::logger::log_info(&format!(
        "⚔️ Match start [{}]: {} vs {} (equipped: {:?})",
        setup.mode.label(),
        p1_name,
        p2_name,
        equipped
    ));

    Ok(MatchEntities {
        player_one,
        player_two,
    })
}

/// Despawns every fighter left from a previous match.
fn clear_fighters(world: &mut World) {
    let mut fighters = world.query_filtered::<Entity, With<FighterSlot>>();
    let stale: Vec<Entity> = fighters.iter(world).collect();
    for entity in stale {
        world.despawn(entity);
    }
}

// ============================================================================
// Outcome
// ============================================================================

/// System: победитель проверяется один раз за кадр, после коллизий
///
/// Player one проверяется первым: если оба упали в одном кадре,
/// побеждает player two.
pub fn check_match_outcome(
    fighters: Query<(Entity, &FighterSlot, &Combatant)>,
    mut state: ResMut<MatchState>,
    progress: Option<ResMut<Progress>>,
    mut ended_events: EventWriter<MatchEnded>,
) {
    state.frame += 1;

    let mut p1 = None;
    let mut p2 = None;
    for (entity, slot, combatant) in fighters.iter() {
        match slot {
            FighterSlot::PlayerOne => p1 = Some((entity, combatant.is_alive())),
            FighterSlot::PlayerTwo => p2 = Some((entity, combatant.is_alive())),
        }
    }
    let (Some((p1_entity, p1_alive)), Some((p2_entity, p2_alive))) = (p1, p2) else {
        return;
    };

    let (winner, winner_entity) = if !p1_alive {
        (FighterSlot::PlayerTwo, p2_entity)
    } else if !p2_alive {
        (FighterSlot::PlayerOne, p1_entity)
    } else {
        return;
    };

    let reward = match winner {
        FighterSlot::PlayerOne => state.victory_reward,
        FighterSlot::PlayerTwo => 0,
    };
    let outcome = MatchOutcome {
        winner,
        winner_entity,
        reward,
        mode: state.mode.clone(),
    };

    if let Some(mut progress) = progress {
        progress.0.record_outcome(&outcome);
    }

    crate::logger::log_info(&format!(
        "🏁 Match over after {} frames: {} wins (reward {})",
        state.frame,
        winner.label(),
        reward
    ));

    ended_events.write(MatchEnded {
        outcome: outcome.clone(),
    });
    state.outcome = Some(outcome);
}

/// Match Plugin
///
/// check_match_outcome в FightSet::Outcome (последний шаг кадра).
pub struct MatchPlugin;

impl Plugin for MatchPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MatchEnded>()
            .add_systems(FixedUpdate, check_match_outcome.in_set(FightSet::Outcome));
    }
}
