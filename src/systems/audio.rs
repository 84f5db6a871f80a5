//! Audio thread and the systems that bridge it with the ECS worlds.
//!
//! - [`audio_thread`] runs on its own OS thread, owns the raylib audio device
//!   and executes [`AudioCmd`]s, answering with [`AudioMessage`]s.
//! - [`forward_audio_cmds`] runs at the end of every level update and hands
//!   the level's queued commands to the thread.
//! - [`poll_audio_messages`] and [`log_audio_messages`] run in the frontend
//!   world and surface the thread's answers.
//!
//! Raylib audio calls stay on the audio thread; everything else talks to it
//! through `crossbeam_channel`.
//!
//! See also: [`crate::events::audio`] and [`crate::resources::audio`].

use bevy_ecs::prelude::{MessageReader, MessageWriter, Messages, Res, ResMut};
use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, error, info, warn};
use raylib::core::audio::{Music, RaylibAudio, Sound};
use rustc_hash::FxHashMap;

use crate::events::audio::{AudioCmd, AudioMessage, MusicId, SoundId};
use crate::resources::audio::{AudioBridge, AudioSender};

/// Drain the audio thread's answers into the frontend message queue.
pub fn poll_audio_messages(bridge: Res<AudioBridge>, mut writer: MessageWriter<AudioMessage>) {
    writer.write_batch(bridge.rx_msg.try_iter());
}

/// Report failed loads; a missing sound is otherwise silent.
pub fn log_audio_messages(mut reader: MessageReader<AudioMessage>) {
    for msg in reader.read() {
        match msg {
            AudioMessage::FxLoadFailed { id, error } => {
                warn!("Sound {:?} unavailable: {}", id, error)
            }
            AudioMessage::MusicLoadFailed { id, error } => {
                warn!("Music {:?} unavailable: {}", id, error)
            }
            other => debug!("Audio: {:?}", other),
        }
    }
}

pub fn update_bevy_audio_messages(mut msgs: ResMut<Messages<AudioMessage>>) {
    msgs.update();
}

/// Send the level's queued [`AudioCmd`]s to the audio thread.
pub fn forward_audio_cmds(sender: Res<AudioSender>, mut reader: MessageReader<AudioCmd>) {
    for cmd in reader.read() {
        // the thread may already be gone during shutdown
        let _ = sender.0.send(cmd.clone());
    }
}

/// Advance the level's [`AudioCmd`] queue.
pub fn update_bevy_audio_cmds(mut msgs: ResMut<Messages<AudioCmd>>) {
    msgs.update();
}

/// A looping track and where each loop restarts.
struct Track<'aud> {
    music: Music<'aud>,
    loop_start: f32,
    playing: bool,
}

/// Entry point of the dedicated audio thread.
///
/// Blocks until [`AudioCmd::Shutdown`] arrives or the command channel closes.
/// Without an audio device the thread exits at once and every later command
/// is dropped.
pub fn audio_thread(rx_cmd: Receiver<AudioCmd>, tx_evt: Sender<AudioMessage>) {
    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            error!("Failed to initialize audio device: {}", e);
            return;
        }
    };

    info!("Audio thread starting (id={:?})", std::thread::current().id());

    let mut tracks: FxHashMap<MusicId, Track> = FxHashMap::default();
    let mut sounds: FxHashMap<SoundId, Sound> = FxHashMap::default();

    'run: loop {
        loop {
            let cmd = match rx_cmd.try_recv() {
                Ok(cmd) => cmd,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break 'run,
            };
            match cmd {
                AudioCmd::LoadMusic { id, path } => match audio.new_music(&path) {
                    Ok(music) => {
                        debug!("Loaded music {:?} from '{}'", id, path);
                        tracks.insert(
                            id,
                            Track {
                                music,
                                loop_start: 0.0,
                                playing: false,
                            },
                        );
                        let _ = tx_evt.send(AudioMessage::MusicLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_evt.send(AudioMessage::MusicLoadFailed {
                            id,
                            error: format!("{}: {}", path, e),
                        });
                    }
                },
                AudioCmd::PlayMusic { id, start_at } => {
                    if let Some(track) = tracks.get_mut(&id) {
                        if track.playing {
                            continue;
                        }
                        debug!("Music {:?} looping from {}s", id, start_at);
                        track.loop_start = start_at;
                        track.music.seek_stream(start_at);
                        track.music.play_stream();
                        track.playing = true;
                        let _ = tx_evt.send(AudioMessage::MusicPlayStarted { id });
                    }
                }
                AudioCmd::StopMusic { id } => {
                    if let Some(track) = tracks.get_mut(&id) {
                        if !track.playing {
                            continue;
                        }
                        debug!("Music {:?} stopped", id);
                        track.music.stop_stream();
                        track.playing = false;
                        let _ = tx_evt.send(AudioMessage::MusicStopped { id });
                    }
                }
                AudioCmd::LoadFx { id, path } => match audio.new_sound(&path) {
                    Ok(sound) => {
                        debug!("Loaded sound {:?} from '{}'", id, path);
                        sounds.insert(id, sound);
                        let _ = tx_evt.send(AudioMessage::FxLoaded { id });
                    }
                    Err(e) => {
                        let _ = tx_evt.send(AudioMessage::FxLoadFailed {
                            id,
                            error: format!("{}: {}", path, e),
                        });
                    }
                },
                AudioCmd::PlayFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        if sound.is_playing() {
                            sound.stop();
                        }
                        sound.play();
                    }
                }
                AudioCmd::StopFx { id } => {
                    if let Some(sound) = sounds.get(&id) {
                        if sound.is_playing() {
                            sound.stop();
                        }
                    }
                }
                AudioCmd::Shutdown => {
                    info!("Audio shutdown requested");
                    break 'run;
                }
            }
        }

        // Streams must be pumped while playing; finished tracks loop again.
        for track in tracks.values_mut().filter(|t| t.playing) {
            if track.music.is_stream_playing() {
                track.music.update_stream();
            } else {
                let len = track.music.get_time_length();
                let played = track.music.get_time_played();
                if played >= len - 0.01 {
                    track.music.seek_stream(track.loop_start);
                    track.music.play_stream();
                }
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    tracks.clear();
    sounds.clear();
    info!("Audio thread exiting (id={:?})", std::thread::current().id());
}
