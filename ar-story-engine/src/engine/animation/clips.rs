use bevy::animation::graph::AnimationNodeIndex;
use bevy::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    Loop,
    Once,
}

/// Advance a clip clock by `delta` seconds.
///
/// Looping clips wrap; one-shot clips clamp to their final pose. Returns the new
/// time and whether a one-shot clip has reached its end.
pub fn advance_clip_time(time: f32, delta: f32, duration: f32, mode: ClipMode) -> (f32, bool) {
    if duration <= 0.0 {
        return (0.0, mode == ClipMode::Once);
    }
    match mode {
        ClipMode::Loop => ((time + delta).rem_euclid(duration), false),
        ClipMode::Once => {
            let time = (time + delta).min(duration);
            (time, time >= duration)
        }
    }
}

/// Animation player a track drives once the model's glTF scene has spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerBinding {
    pub player: Entity,
    pub node: AnimationNodeIndex,
}

#[derive(Debug, Clone)]
pub struct ClipTrack {
    pub clip: Handle<AnimationClip>,
    pub mode: ClipMode,
    pub time: f32,
    /// Known once the clip asset is available.
    pub duration: Option<f32>,
    pub finished: bool,
    pub binding: Option<PlayerBinding>,
}

/// Clip clocks per model root, advanced by the frame delta.
#[derive(Resource, Default, Debug)]
pub struct ClipMixer {
    tracks: HashMap<Entity, ClipTrack>,
}

impl ClipMixer {
    /// Start `clip` on `root` from the beginning, replacing any current clip.
    /// The player is rebound to the new clip's graph on the next bind pass.
    pub fn play(&mut self, root: Entity, clip: Handle<AnimationClip>, mode: ClipMode) {
        self.tracks.insert(
            root,
            ClipTrack {
                clip,
                mode,
                time: 0.0,
                duration: None,
                finished: false,
                binding: None,
            },
        );
    }

    /// Advance every clip with a known duration. Returns roots whose one-shot
    /// clip finished during this step.
    pub fn advance(&mut self, delta: f32) -> Vec<Entity> {
        let mut finished = Vec::new();
        for (&root, track) in &mut self.tracks {
            let Some(duration) = track.duration else {
                continue;
            };
            if track.finished {
                continue;
            }
            let (time, done) = advance_clip_time(track.time, delta, duration, track.mode);
            track.time = time;
            if done {
                track.finished = true;
                finished.push(root);
            }
        }
        finished
    }

    pub fn get(&self, root: Entity) -> Option<&ClipTrack> {
        self.tracks.get(&root)
    }

    pub fn tracks(&self) -> impl Iterator<Item = (Entity, &ClipTrack)> {
        self.tracks.iter().map(|(&root, track)| (root, track))
    }

    pub fn tracks_mut(&mut self) -> impl Iterator<Item = (Entity, &mut ClipTrack)> {
        self.tracks.iter_mut().map(|(&root, track)| (root, track))
    }

    /// Players currently driven by a track.
    pub fn bound_players(&self) -> Vec<Entity> {
        self.tracks
            .values()
            .filter_map(|track| track.binding.map(|binding| binding.player))
            .collect()
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn find_player(
    root: Entity,
    children: &Query<&Children>,
    players: &Query<&mut AnimationPlayer>,
) -> Option<Entity> {
    let mut stack = vec![root];
    while let Some(entity) = stack.pop() {
        if players.contains(entity) {
            return Some(entity);
        }
        if let Ok(kids) = children.get(entity) {
            stack.extend_from_slice(kids);
        }
    }
    None
}

/// Attach each unbound track to the animation player spawned under its model.
pub fn bind_clip_players(
    mut commands: Commands,
    mut mixer: ResMut<ClipMixer>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    clips: Res<Assets<AnimationClip>>,
    children: Query<&Children>,
    mut players: Query<&mut AnimationPlayer>,
) {
    for (root, track) in mixer.tracks_mut() {
        if track.duration.is_none() {
            track.duration = clips.get(&track.clip).map(|clip| clip.duration());
        }
        if track.binding.is_some() {
            continue;
        }
        // glTF scenes spawn asynchronously; try again next frame.
        let Some(player_entity) = find_player(root, &children, &players) else {
            continue;
        };
        let Ok(mut player) = players.get_mut(player_entity) else {
            continue;
        };

        let (graph, node) = AnimationGraph::from_clip(track.clip.clone());
        commands
            .entity(player_entity)
            .insert(AnimationGraphHandle(graphs.add(graph)));
        player.stop_all();
        player.play(node).pause();
        track.binding = Some(PlayerBinding {
            player: player_entity,
            node,
        });
    }
}

/// Advance clip clocks and pose the bound players at the accumulated time.
pub fn drive_clip_players(
    time: Res<Time>,
    mut mixer: ResMut<ClipMixer>,
    mut players: Query<&mut AnimationPlayer>,
) {
    for root in mixer.advance(time.delta_secs()) {
        debug!("Clip finished on {:?}", root);
    }

    for (_, track) in mixer.tracks() {
        let Some(binding) = track.binding else {
            continue;
        };
        let Ok(mut player) = players.get_mut(binding.player) else {
            continue;
        };
        if let Some(active) = player.animation_mut(binding.node) {
            active.seek_to(track.time);
        }
    }
}
