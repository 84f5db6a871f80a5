//! Audio command and notification messages.
//!
//! Sounds and music tracks are addressed by typed ids. Levels write
//! [`AudioCmd`]s into their world; the commands are forwarded to the audio
//! thread, which answers with [`AudioMessage`]s.

use bevy_ecs::message::Message;

/// Short sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    SshShort,
    Ssh,
    Fire,
    Fire2,
    Boom,
    Blopp,
    Pickup,
    Woew,
    Spawn,
    Death,
    Door,
    Shoot,
    Select,
    MenuOption,
    EnemyDeath,
    BossDeath,
}

impl SoundId {
    pub const ALL: [SoundId; 16] = [
        SoundId::SshShort,
        SoundId::Ssh,
        SoundId::Fire,
        SoundId::Fire2,
        SoundId::Boom,
        SoundId::Blopp,
        SoundId::Pickup,
        SoundId::Woew,
        SoundId::Spawn,
        SoundId::Death,
        SoundId::Door,
        SoundId::Shoot,
        SoundId::Select,
        SoundId::MenuOption,
        SoundId::EnemyDeath,
        SoundId::BossDeath,
    ];

    pub const fn code(self) -> u16 {
        match self {
            SoundId::SshShort => 100,
            SoundId::Ssh => 101,
            SoundId::Fire => 102,
            SoundId::Fire2 => 103,
            SoundId::Boom => 104,
            SoundId::Blopp => 105,
            SoundId::Pickup => 106,
            SoundId::Woew => 107,
            SoundId::Spawn => 108,
            SoundId::Death => 109,
            SoundId::Door => 110,
            SoundId::Shoot => 111,
            SoundId::Select => 112,
            SoundId::MenuOption => 113,
            SoundId::EnemyDeath => 114,
            SoundId::BossDeath => 215,
        }
    }

    /// File name under `sound/sfx/`.
    pub const fn file_name(self) -> &'static str {
        match self {
            SoundId::SshShort => "ssh_short_mono_8bit.wav",
            SoundId::Ssh => "ssh_mono_8bit.wav",
            SoundId::Fire => "fire_mono_8bit.wav",
            SoundId::Fire2 => "fire2_mono_8bit.wav",
            SoundId::Boom => "boom_mono_8bit.wav",
            SoundId::Blopp => "blopp_mono_8bit.wav",
            SoundId::Pickup => "pickup_mono_8bit.wav",
            SoundId::Woew => "woew_mono_8bit.wav",
            SoundId::Spawn => "spawn_mono_8bit.wav",
            SoundId::Death => "death_mono_8bit.wav",
            SoundId::Door => "door_mono_8bit.wav",
            SoundId::Shoot => "shoot_mono_8bit.wav",
            SoundId::Select => "select_mono_8bit.wav",
            SoundId::MenuOption => "menuoption_mono_8bit.wav",
            SoundId::EnemyDeath => "enemydeath_mono_8bit.wav",
            SoundId::BossDeath => "boss_death_mono_8bit.wav",
        }
    }
}

/// Looping music tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MusicId {
    MainMenu,
    Overworld,
    Underworld,
    Boss,
    End,
}

impl MusicId {
    pub const ALL: [MusicId; 5] = [
        MusicId::MainMenu,
        MusicId::Overworld,
        MusicId::Underworld,
        MusicId::Boss,
        MusicId::End,
    ];

    pub const fn code(self) -> u16 {
        match self {
            MusicId::MainMenu => 200,
            MusicId::Overworld => 201,
            MusicId::Underworld => 202,
            MusicId::Boss => 203,
            MusicId::End => 204,
        }
    }

    /// File name under `sound/msx/`.
    pub const fn file_name(self) -> &'static str {
        match self {
            MusicId::MainMenu => "Nature-Absinth_mono_8bit.wav",
            MusicId::Overworld => "esau-RideHome_mono_8bit.wav",
            MusicId::Underworld => "underworld_mono_8bit.wav",
            MusicId::Boss => "boss_mono_8bit.wav",
            MusicId::End => "Esau - Puzzle Master_mono_8bit.wav",
        }
    }
}

/// Commands sent *to* the audio thread.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioCmd {
    LoadFx { id: SoundId, path: String },
    LoadMusic { id: MusicId, path: String },
    /// Play from the start, restarting the effect if it is already playing.
    PlayFx { id: SoundId },
    /// Start looping `id` at `start_at` seconds unless it is already playing.
    PlayMusic { id: MusicId, start_at: f32 },
    StopFx { id: SoundId },
    StopMusic { id: MusicId },
    Shutdown,
}

impl AudioCmd {
    pub fn fx(id: SoundId) -> Self {
        AudioCmd::PlayFx { id }
    }

    pub fn music(id: MusicId) -> Self {
        AudioCmd::PlayMusic { id, start_at: 0.0 }
    }

    pub fn stop_music(id: MusicId) -> Self {
        AudioCmd::StopMusic { id }
    }
}

/// Notifications sent *back* from the audio thread.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum AudioMessage {
    FxLoaded { id: SoundId },
    FxLoadFailed { id: SoundId, error: String },
    MusicLoaded { id: MusicId },
    MusicLoadFailed { id: MusicId, error: String },
    MusicPlayStarted { id: MusicId },
    MusicStopped { id: MusicId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let mut codes: Vec<u16> = SoundId::ALL.iter().map(|s| s.code()).collect();
        codes.extend(MusicId::ALL.iter().map(|m| m.code()));
        let len = codes.len();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), len);
    }

    #[test]
    fn boss_death_keeps_its_code() {
        assert_eq!(SoundId::BossDeath.code(), 215);
        assert_eq!(SoundId::BossDeath.file_name(), "boss_death_mono_8bit.wav");
    }
}
