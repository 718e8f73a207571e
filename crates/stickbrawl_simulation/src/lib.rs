//! Stickbrawl Simulation Core
//!
//! Headless ECS-симуляция 2D файтинга на Bevy 0.16.
//!
//! Кадр (FixedUpdate, 60Hz), строго по порядку:
//! 1. FightSet::Decide — DecisionPolicy (human input / AI / boss) → intents
//! 2. FightSet::Tick — Combatant state machine, физика, таймеры
//! 3. FightSet::Resolve — hitbox ↔ hurtbox в обе стороны, звуки, смерти
//! 4. FightSet::Outcome — проверка победителя, награды
//!
//! Рендер, аудио-синтез, маппинг клавиш и сохранение прогресса — снаружи.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod audio;
pub mod combat;
pub mod components;
pub mod config;
pub mod input;
pub mod logger;
pub mod match_loop;
pub mod progress;

// Re-export основных типов
pub use ai::{
    AIPlugin, AiController, BehaviorState, BossAbilityUsed, BossController, DecisionContext,
    DecisionPolicy, Difficulty, DifficultyProfile, FighterBrain, HumanPolicy, OpponentView,
    RageTriggered,
};
pub use audio::{AudioCue, SoundCue};
pub use combat::{
    AttackKind, AttackPhase, Combatant, CombatPlugin, DamageDealt, DamageOutcome, Dead,
    EntityDied, FighterStats,
};
pub use components::*;
pub use config::{
    ArchetypeRegistry, ArenaConfig, AttackTable, ConfigError, EquipmentCatalog, StackingRule,
};
pub use input::InputSnapshot;
pub use logger::*;
pub use match_loop::{
    match_in_progress, spawn_match, GameMode, MatchEnded, MatchEntities, MatchOutcome,
    MatchPlugin, MatchSetup, MatchState,
};
pub use progress::{InMemoryProgress, Progress, ProgressError, ProgressStore};

/// Ordered per-frame stages.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FightSet {
    Decide,
    Tick,
    Resolve,
    Outcome,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Static data (arena, archetypes, equipment) ставится только если хост
/// не вставил свою версию заранее.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz: все таймеры считаются в кадрах
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<ArenaConfig>()
            .init_resource::<ArchetypeRegistry>()
            .init_resource::<EquipmentCatalog>()
            .init_resource::<Progress>();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.configure_sets(
            FixedUpdate,
            (
                FightSet::Decide,
                FightSet::Tick,
                FightSet::Resolve,
                FightSet::Outcome,
            )
                .chain()
                .run_if(match_in_progress),
        )
        // Подсистемы
        .add_plugins((CombatPlugin, AIPlugin, MatchPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Прогоняет FixedUpdate ровно `frames` раз (без wall-clock накопителя)
pub fn step_frames(app: &mut App, frames: u32) {
    for _ in 0..frames {
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
