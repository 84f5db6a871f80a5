//! Resources that connect the worlds with the background audio thread.
//!
//! [`setup_audio`] spawns the thread once at startup and stores the
//! [`AudioBridge`] in the frontend world; [`shutdown_audio`] stops and joins
//! it. Level worlds only ever see an [`AudioSender`], a clone of the command
//! end of the bridge.

use std::path::Path;

use bevy_ecs::prelude::*;
use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::events::audio::{AudioCmd, AudioMessage, MusicId, SoundId};
use crate::systems::audio::audio_thread;

/// Both ends of the audio thread's channels plus its join handle.
#[derive(Resource)]
pub struct AudioBridge {
    /// ECS -> audio thread.
    pub tx_cmd: Sender<AudioCmd>,
    /// Audio thread -> ECS.
    pub rx_msg: Receiver<AudioMessage>,
    pub handle: std::thread::JoinHandle<()>,
}

/// Command sender held by a level world.
#[derive(Resource, Clone)]
pub struct AudioSender(pub Sender<AudioCmd>);

/// Spawn the audio thread and register the bridge and its message queue.
pub fn setup_audio(world: &mut World) {
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || audio_thread(rx_cmd, tx_msg));

    world.insert_resource(AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    });
    world.insert_resource(Messages::<AudioMessage>::default());
}

/// Ask the audio thread to stop and wait for it.
pub fn shutdown_audio(world: &mut World) {
    if let Some(bridge) = world.remove_resource::<AudioBridge>() {
        let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
        let _ = bridge.handle.join();
    }
}

/// Load commands for every sound effect and music track under `assets`.
pub fn preload_commands(assets: &Path) -> Vec<AudioCmd> {
    let sfx = assets.join("sound").join("sfx");
    let msx = assets.join("sound").join("msx");
    let mut cmds: Vec<AudioCmd> = SoundId::ALL
        .iter()
        .map(|&id| AudioCmd::LoadFx {
            id,
            path: sfx.join(id.file_name()).to_string_lossy().into_owned(),
        })
        .collect();
    cmds.extend(MusicId::ALL.iter().map(|&id| AudioCmd::LoadMusic {
        id,
        path: msx.join(id.file_name()).to_string_lossy().into_owned(),
    }));
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preload_covers_every_id() {
        let cmds = preload_commands(Path::new("assets"));
        assert_eq!(cmds.len(), SoundId::ALL.len() + MusicId::ALL.len());
        assert!(cmds.contains(&AudioCmd::LoadFx {
            id: SoundId::Boom,
            path: Path::new("assets")
                .join("sound")
                .join("sfx")
                .join("boom_mono_8bit.wav")
                .to_string_lossy()
                .into_owned(),
        }));
        assert!(cmds.iter().any(|c| matches!(
            c,
            AudioCmd::LoadMusic {
                id: MusicId::End,
                ..
            }
        )));
    }
}
