//! Per-frame fighter update systems.

use bevy::prelude::*;

use crate::audio::AudioCue;
use crate::combat::Combatant;

/// System: один кадр state machine для каждого бойца
///
/// Timers → movement → gravity/ground/bounds → attack frame + hitbox → cooldowns.
pub fn tick_combatants(mut fighters: Query<&mut Combatant>) {
    for mut combatant in fighters.iter_mut() {
        combatant.tick();
    }
}

/// System: outbox звуков бойца → `AudioCue` события
pub fn emit_audio_cues(
    mut fighters: Query<(Entity, &mut Combatant)>,
    mut audio_events: EventWriter<AudioCue>,
) {
    for (entity, mut combatant) in fighters.iter_mut() {
        if !combatant.has_pending_cues() {
            continue;
        }
        for cue in combatant.drain_cues() {
            audio_events.write(AudioCue { fighter: entity, cue });
        }
    }
}
