//! Fire-and-forget sound cues для аудио-коллаборатора.
//!
//! Combatant копит cues в outbox, `emit_audio_cues` превращает их в `AudioCue`
//! события. Синтез звука живёт снаружи симуляции.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SoundCue {
    Punch,
    Kick,
    Special,
    Ultimate,
    Block,
    Hit,
    Jump,
}

impl SoundCue {
    /// Wire name understood by the audio collaborator.
    pub fn name(&self) -> &'static str {
        match self {
            SoundCue::Punch => "punch",
            SoundCue::Kick => "kick",
            SoundCue::Special => "special",
            SoundCue::Ultimate => "ultimate",
            SoundCue::Block => "block",
            SoundCue::Hit => "hit",
            SoundCue::Jump => "jump",
        }
    }
}

/// Событие: боец издал звук
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AudioCue {
    pub fighter: Entity,
    pub cue: SoundCue,
}
