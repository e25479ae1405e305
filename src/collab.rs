//! Capabilities the simulation core calls into
//!
//! Physics integration, audio, rendering, UI and input belong to the host.
//! The core only sees these traits, wired once at setup.

use glam::Vec3;

use crate::error::ConfigError;

/// Handle to a loaded visual model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelHandle(pub u32);

/// Handle to a scene object (spawned obstacle, decor member)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectHandle(pub u64);

/// Handle to a sound event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundId(pub u32);

/// Locked degrees of freedom on the player body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AxisLocks {
    pub x: bool,
    pub y: bool,
    pub z: bool,
    pub pitch: bool,
    pub roll: bool,
    pub yaw: bool,
}

impl AxisLocks {
    /// Everything locked (menu / between runs)
    pub const ALL: AxisLocks = AxisLocks {
        x: true,
        y: true,
        z: true,
        pitch: true,
        roll: true,
        yaw: true,
    };

    /// Running: free along the track and vertically, lateral and rotation locked
    pub const RUNNING: AxisLocks = AxisLocks {
        x: true,
        y: false,
        z: false,
        pitch: true,
        roll: true,
        yaw: true,
    };
}

pub trait PlayerBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, pos: Vec3);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, vel: Vec3);
    fn apply_force(&mut self, force: Vec3);
    fn set_locking(&mut self, locks: AxisLocks);
}

/// A single sound emitter: assign a sound, then play it
pub trait AudioTrigger {
    fn assign(&mut self, sound: SoundId);
    fn play(&mut self);
}

/// The player's renderable model slot
pub trait ModelRenderer {
    fn load_model(&mut self, path: &str) -> ModelHandle;
    fn set_model(&mut self, model: ModelHandle);
}

/// Object instantiation and mutation in the host scene
pub trait SceneObjects {
    fn load_model(&mut self, path: &str) -> ModelHandle;
    fn clone_prefab(&mut self, prefab: &str, position: Vec3) -> ObjectHandle;
    fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle>;
    fn set_model(&mut self, object: ObjectHandle, model: ModelHandle);
    fn set_enabled(&mut self, object: ObjectHandle, enabled: bool);
    fn destroy(&mut self, object: ObjectHandle);
}

/// Fire-and-forget achievement backend
pub trait AchievementSink {
    fn unlock(&mut self, id: &str);
}

/// Named scalar attributes on the renderer
pub trait RenderParams {
    fn set_scalar(&mut self, name: &str, value: f32);
}

pub trait UiPanels {
    fn set_score_visible(&mut self, visible: bool);
    fn set_menu_visible(&mut self, visible: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Jump,
}

pub trait InputState {
    fn is_down(&self, action: InputAction) -> bool;
}

/// Everything the game state machine needs, as handed over by the host
#[derive(Default)]
pub struct Wiring {
    pub body: Option<Box<dyn PlayerBody>>,
    pub audio: Option<Box<dyn AudioTrigger>>,
    pub scene: Option<Box<dyn SceneObjects>>,
    pub achievements: Option<Box<dyn AchievementSink>>,
    pub render: Option<Box<dyn RenderParams>>,
    pub ui: Option<Box<dyn UiPanels>>,
    /// Where the player is put back on restart
    pub start_anchor: Option<Vec3>,
    pub hit_sound: Option<SoundId>,
    pub jump_sound: Option<SoundId>,
    pub stars: Vec<ObjectHandle>,
    pub constellations: Vec<ObjectHandle>,
}

/// Validated collaborators
pub struct Collaborators {
    pub body: Box<dyn PlayerBody>,
    pub audio: Box<dyn AudioTrigger>,
    pub scene: Box<dyn SceneObjects>,
    pub achievements: Box<dyn AchievementSink>,
    pub render: Box<dyn RenderParams>,
    pub ui: Box<dyn UiPanels>,
    pub start_anchor: Vec3,
    pub hit_sound: Option<SoundId>,
    pub jump_sound: Option<SoundId>,
}

impl Wiring {
    /// Check every required reference once; split off the decor groups
    pub fn validate(
        self,
    ) -> Result<(Collaborators, Vec<ObjectHandle>, Vec<ObjectHandle>), ConfigError> {
        let scene = self
            .scene
            .ok_or(ConfigError::MissingCollaborator("obstacle scene"))?;
        let body = self
            .body
            .ok_or(ConfigError::MissingCollaborator("player body"))?;
        let audio = self
            .audio
            .ok_or(ConfigError::MissingCollaborator("player sound point"))?;
        let ui = self
            .ui
            .ok_or(ConfigError::MissingCollaborator("score and menu panels"))?;
        let achievements = self
            .achievements
            .ok_or(ConfigError::MissingCollaborator("achievement service"))?;
        let render = self
            .render
            .ok_or(ConfigError::MissingCollaborator("render attributes"))?;
        let start_anchor = self
            .start_anchor
            .ok_or(ConfigError::MissingCollaborator("player start position"))?;

        if self.hit_sound.is_none() || self.jump_sound.is_none() {
            log::warn!("Not all player sounds were configured");
        }

        Ok((
            Collaborators {
                body,
                audio,
                scene,
                achievements,
                render,
                ui,
                start_anchor,
                hit_sound: self.hit_sound,
                jump_sound: self.jump_sound,
            },
            self.stars,
            self.constellations,
        ))
    }
}
