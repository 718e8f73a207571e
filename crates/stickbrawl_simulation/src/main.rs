//! Headless матч Stickbrawl
//!
//! Warrior (P1, простой скриптовый input) против normal AI, до 60 секунд
//! симуляции. Печатает исход в лог.

use bevy::prelude::*;
use stickbrawl_simulation::{
    create_headless_app, log_error, log_info, spawn_match, step_frames, Combatant, Difficulty,
    FighterSlot, GameMode, InputSnapshot, MatchSetup, MatchState,
};

const SEED: u64 = 42;
const MAX_FRAMES: u32 = 60 * 60;

/// Подходим и бьём: punch вблизи, kick на средней дистанции.
fn scripted_input(me: &Combatant, target_x: f32) -> InputSnapshot {
    let offset = target_x - me.center_x();
    let distance = offset.abs();
    InputSnapshot {
        left: offset < 0.0 && distance > 45.0,
        right: offset > 0.0 && distance > 45.0,
        punch: distance <= 50.0,
        kick: distance <= 65.0,
        special: distance <= 85.0 && me.health_ratio() < 0.5,
        ..default()
    }
}

fn drive_player_one(world: &mut World) {
    let mut fighters = world.query::<(&FighterSlot, &Combatant)>();
    let Some(target_x) = fighters
        .iter(world)
        .find(|(slot, _)| **slot == FighterSlot::PlayerTwo)
        .map(|(_, combatant)| combatant.center_x())
    else {
        return;
    };

    let mut players = world.query::<(&FighterSlot, &Combatant, &mut InputSnapshot)>();
    for (slot, combatant, mut input) in players.iter_mut(world) {
        if *slot == FighterSlot::PlayerOne {
            *input = scripted_input(combatant, target_x);
        }
    }
}

fn main() {
    let mut app = create_headless_app(SEED);
    log_info(&format!("Starting Stickbrawl headless match (seed: {})", SEED));

    let setup = MatchSetup::new(GameMode::VsAi(Difficulty::Normal), "warrior", "warrior");
    if let Err(err) = spawn_match(app.world_mut(), &setup) {
        log_error(&format!("Failed to start match: {}", err));
        return;
    }

    for frame in 0..MAX_FRAMES {
        drive_player_one(app.world_mut());
        step_frames(&mut app, 1);

        let state = app.world().resource::<MatchState>();
        if state.is_finished() {
            break;
        }
        if frame % 600 == 0 {
            let mut fighters = app.world_mut().query::<(&FighterSlot, &Combatant)>();
            for (slot, combatant) in fighters.iter(app.world()) {
                log_info(&format!(
                    "Frame {}: {} hp {}/{} energy {:.0}",
                    frame,
                    slot.label(),
                    combatant.health.current,
                    combatant.health.max,
                    combatant.energy.current
                ));
            }
        }
    }

    match &app.world().resource::<MatchState>().outcome {
        Some(outcome) => log_info(&format!(
            "Winner: {} (reward {} coins)",
            outcome.winner.label(),
            outcome.reward
        )),
        None => log_info(&format!("Time over after {} frames, no winner", MAX_FRAMES)),
    }
}
