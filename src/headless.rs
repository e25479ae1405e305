//! In-memory host world
//!
//! Implements every collaborator trait over one shared state so the core can
//! run without an engine: the headless binary drives it, and tests inspect
//! what the core asked the host to do.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use glam::Vec3;

use crate::collab::{
    AchievementSink, AudioTrigger, AxisLocks, InputAction, InputState, ModelHandle,
    ModelRenderer, ObjectHandle, PlayerBody, RenderParams, SceneObjects, SoundId, UiPanels,
    Wiring,
};

/// Downward acceleration applied by `step_physics` (units/s²)
const GRAVITY: f32 = 900.0;
/// Force-to-velocity factor for jump impulses
const INV_MASS: f32 = 0.02;

#[derive(Debug, Clone)]
struct SceneObject {
    prefab: String,
    position: Vec3,
    children: Vec<ObjectHandle>,
    model: Option<ModelHandle>,
    enabled: bool,
    root: bool,
}

#[derive(Debug, Default)]
struct WorldState {
    next_object: u64,
    models: HashMap<String, ModelHandle>,
    objects: BTreeMap<ObjectHandle, SceneObject>,
    decor: Vec<ObjectHandle>,
    prefab_children: HashMap<String, usize>,

    start_anchor: Vec3,
    position: Vec3,
    velocity: Vec3,
    forces: Vec<Vec3>,
    pending_force: Vec3,
    locks: Option<AxisLocks>,

    assigned_sound: Option<SoundId>,
    played: Vec<Option<SoundId>>,
    unlocks: Vec<String>,
    scalars: HashMap<String, f32>,
    score_visible: bool,
    menu_visible: bool,
    player_model: Option<ModelHandle>,
}

impl WorldState {
    fn load_model(&mut self, path: &str) -> ModelHandle {
        let next = ModelHandle(self.models.len() as u32 + 1);
        *self.models.entry(path.to_string()).or_insert(next)
    }

    fn add_object(&mut self, prefab: &str, position: Vec3, root: bool) -> ObjectHandle {
        self.next_object += 1;
        let handle = ObjectHandle(self.next_object);
        self.objects.insert(
            handle,
            SceneObject {
                prefab: prefab.to_string(),
                position,
                children: Vec::new(),
                model: None,
                enabled: true,
                root,
            },
        );
        handle
    }
}

/// Shared host world; hand out collaborator views with the accessor methods
#[derive(Debug, Clone)]
pub struct HeadlessWorld {
    inner: Rc<RefCell<WorldState>>,
}

impl Default for HeadlessWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessWorld {
    pub fn new() -> Self {
        let start_anchor = Vec3::new(0.0, 0.0, 60.0);
        let mut state = WorldState {
            start_anchor,
            position: start_anchor,
            score_visible: true,
            ..Default::default()
        };
        state
            .prefab_children
            .insert("prefabs/two_cactus.prefab".into(), 2);
        state
            .prefab_children
            .insert("prefabs/three_cactus.prefab".into(), 3);
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    /// Create `count` disabled decor objects (stars, constellations)
    pub fn spawn_decor(&self, count: usize) -> Vec<ObjectHandle> {
        let mut state = self.inner.borrow_mut();
        (0..count)
            .map(|_| {
                let handle = state.add_object("decor", Vec3::ZERO, false);
                if let Some(obj) = state.objects.get_mut(&handle) {
                    obj.enabled = false;
                }
                state.decor.push(handle);
                handle
            })
            .collect()
    }

    /// Full wiring with `stars` and `constellations` decor members
    pub fn wiring(&self, stars: usize, constellations: usize) -> Wiring {
        Wiring {
            body: Some(Box::new(self.body())),
            audio: Some(Box::new(self.audio())),
            scene: Some(Box::new(self.scene())),
            achievements: Some(Box::new(self.achievements())),
            render: Some(Box::new(self.render())),
            ui: Some(Box::new(self.ui_panels())),
            start_anchor: Some(self.start_anchor()),
            hit_sound: Some(SoundId(1)),
            jump_sound: Some(SoundId(2)),
            stars: self.spawn_decor(stars),
            constellations: self.spawn_decor(constellations),
        }
    }

    pub fn body(&self) -> HeadlessBody {
        HeadlessBody(self.inner.clone())
    }

    pub fn audio(&self) -> HeadlessAudio {
        HeadlessAudio(self.inner.clone())
    }

    pub fn scene(&self) -> HeadlessScene {
        HeadlessScene(self.inner.clone())
    }

    pub fn achievements(&self) -> HeadlessAchievements {
        HeadlessAchievements(self.inner.clone())
    }

    pub fn render(&self) -> HeadlessRender {
        HeadlessRender(self.inner.clone())
    }

    pub fn ui_panels(&self) -> HeadlessUi {
        HeadlessUi(self.inner.clone())
    }

    pub fn renderer(&self) -> HeadlessRenderer {
        HeadlessRenderer(self.inner.clone())
    }

    /// Integrate the body for `dt` seconds; returns true on touching down
    pub fn step_physics(&self, dt: f32) -> bool {
        let mut state = self.inner.borrow_mut();
        let ground = state.start_anchor.z;
        let impulse = std::mem::take(&mut state.pending_force) * INV_MASS;
        state.velocity += impulse;

        let locks = state.locks.unwrap_or(AxisLocks::ALL);
        if locks.z {
            state.velocity.z = 0.0;
        } else {
            state.velocity.z -= GRAVITY * dt;
        }
        if locks.y {
            state.velocity.y = 0.0;
        }
        if locks.x {
            state.velocity.x = 0.0;
        }

        let airborne = state.position.z > ground;
        let velocity = state.velocity;
        state.position += velocity * dt;
        if state.position.z <= ground {
            state.position.z = ground;
            state.velocity.z = state.velocity.z.max(0.0);
            return airborne;
        }
        false
    }

    /// Player is on the ground level with a live obstacle
    pub fn touching_obstacle(&self, reach: f32) -> bool {
        let state = self.inner.borrow();
        let player = state.position;
        if player.z > state.start_anchor.z + reach {
            return false;
        }
        state
            .objects
            .values()
            .filter(|o| o.root && o.prefab != "decor")
            .any(|o| (o.position.y - player.y).abs() < reach)
    }

    pub fn start_anchor(&self) -> Vec3 {
        self.inner.borrow().start_anchor
    }

    pub fn body_position(&self) -> Vec3 {
        self.inner.borrow().position
    }

    pub fn locks(&self) -> Option<AxisLocks> {
        self.inner.borrow().locks
    }

    pub fn forces(&self) -> Vec<Vec3> {
        self.inner.borrow().forces.clone()
    }

    pub fn sounds_played(&self) -> usize {
        self.inner.borrow().played.len()
    }

    pub fn last_sound(&self) -> Option<SoundId> {
        self.inner.borrow().played.last().copied().flatten()
    }

    pub fn unlock_count(&self, id: &str) -> usize {
        self.inner.borrow().unlocks.iter().filter(|u| *u == id).count()
    }

    pub fn last_scalar(&self, name: &str) -> Option<f32> {
        self.inner.borrow().scalars.get(name).copied()
    }

    /// (score panel visible, menu visible)
    pub fn ui(&self) -> (bool, bool) {
        let state = self.inner.borrow();
        (state.score_visible, state.menu_visible)
    }

    pub fn player_model(&self) -> Option<ModelHandle> {
        self.inner.borrow().player_model
    }

    pub fn model_of(&self, object: ObjectHandle) -> Option<ModelHandle> {
        self.inner.borrow().objects.get(&object).and_then(|o| o.model)
    }

    /// Spawned (non-decor) root objects still alive
    pub fn live_object_count(&self) -> usize {
        self.inner
            .borrow()
            .objects
            .values()
            .filter(|o| o.root && o.prefab != "decor")
            .count()
    }

    pub fn enabled_count(&self, objects: &[ObjectHandle]) -> usize {
        let state = self.inner.borrow();
        objects
            .iter()
            .filter(|h| state.objects.get(*h).is_some_and(|o| o.enabled))
            .count()
    }

    /// Enabled members across every decor object created so far
    pub fn enabled_decor(&self) -> usize {
        let decor = self.inner.borrow().decor.clone();
        self.enabled_count(&decor)
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessBody(Rc<RefCell<WorldState>>);

impl PlayerBody for HeadlessBody {
    fn position(&self) -> Vec3 {
        self.0.borrow().position
    }

    fn set_position(&mut self, pos: Vec3) {
        self.0.borrow_mut().position = pos;
    }

    fn velocity(&self) -> Vec3 {
        self.0.borrow().velocity
    }

    fn set_velocity(&mut self, vel: Vec3) {
        self.0.borrow_mut().velocity = vel;
    }

    fn apply_force(&mut self, force: Vec3) {
        let mut state = self.0.borrow_mut();
        state.forces.push(force);
        state.pending_force += force;
    }

    fn set_locking(&mut self, locks: AxisLocks) {
        self.0.borrow_mut().locks = Some(locks);
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessAudio(Rc<RefCell<WorldState>>);

impl AudioTrigger for HeadlessAudio {
    fn assign(&mut self, sound: SoundId) {
        self.0.borrow_mut().assigned_sound = Some(sound);
    }

    fn play(&mut self) {
        let mut state = self.0.borrow_mut();
        let sound = state.assigned_sound;
        state.played.push(sound);
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessScene(Rc<RefCell<WorldState>>);

impl SceneObjects for HeadlessScene {
    fn load_model(&mut self, path: &str) -> ModelHandle {
        self.0.borrow_mut().load_model(path)
    }

    fn clone_prefab(&mut self, prefab: &str, position: Vec3) -> ObjectHandle {
        let mut state = self.0.borrow_mut();
        let root = state.add_object(prefab, position, true);
        let count = state.prefab_children.get(prefab).copied().unwrap_or(0);
        let children: Vec<ObjectHandle> = (0..count)
            .map(|_| state.add_object(prefab, position, false))
            .collect();
        if let Some(obj) = state.objects.get_mut(&root) {
            obj.children = children;
        }
        root
    }

    fn children(&self, object: ObjectHandle) -> Vec<ObjectHandle> {
        self.0
            .borrow()
            .objects
            .get(&object)
            .map(|o| o.children.clone())
            .unwrap_or_default()
    }

    fn set_model(&mut self, object: ObjectHandle, model: ModelHandle) {
        if let Some(obj) = self.0.borrow_mut().objects.get_mut(&object) {
            obj.model = Some(model);
        }
    }

    fn set_enabled(&mut self, object: ObjectHandle, enabled: bool) {
        if let Some(obj) = self.0.borrow_mut().objects.get_mut(&object) {
            obj.enabled = enabled;
        }
    }

    fn destroy(&mut self, object: ObjectHandle) {
        let mut state = self.0.borrow_mut();
        if let Some(obj) = state.objects.remove(&object) {
            for child in obj.children {
                state.objects.remove(&child);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessAchievements(Rc<RefCell<WorldState>>);

impl AchievementSink for HeadlessAchievements {
    fn unlock(&mut self, id: &str) {
        self.0.borrow_mut().unlocks.push(id.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessRender(Rc<RefCell<WorldState>>);

impl RenderParams for HeadlessRender {
    fn set_scalar(&mut self, name: &str, value: f32) {
        self.0.borrow_mut().scalars.insert(name.to_string(), value);
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessUi(Rc<RefCell<WorldState>>);

impl UiPanels for HeadlessUi {
    fn set_score_visible(&mut self, visible: bool) {
        self.0.borrow_mut().score_visible = visible;
    }

    fn set_menu_visible(&mut self, visible: bool) {
        self.0.borrow_mut().menu_visible = visible;
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessRenderer(Rc<RefCell<WorldState>>);

impl ModelRenderer for HeadlessRenderer {
    fn load_model(&mut self, path: &str) -> ModelHandle {
        self.0.borrow_mut().load_model(path)
    }

    fn set_model(&mut self, model: ModelHandle) {
        self.0.borrow_mut().player_model = Some(model);
    }
}

/// Fixed input snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct Keys {
    pub jump: bool,
}

impl Keys {
    pub fn jump() -> Self {
        Self { jump: true }
    }

    pub fn none() -> Self {
        Self { jump: false }
    }
}

impl InputState for Keys {
    fn is_down(&self, action: InputAction) -> bool {
        match action {
            InputAction::Jump => self.jump,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_load_once() {
        let world = HeadlessWorld::new();
        let mut scene = world.scene();
        let a = scene.load_model("models/vmdl/cactus.vmdl");
        let b = scene.load_model("models/vmdl/cactus2.vmdl");
        assert_ne!(a, b);
        assert_eq!(scene.load_model("models/vmdl/cactus.vmdl"), a);
    }

    #[test]
    fn test_jump_lands_again() {
        let world = HeadlessWorld::new();
        let mut body = world.body();
        body.set_locking(AxisLocks::RUNNING);
        body.apply_force(Vec3::new(0.0, 0.0, 29000.0));

        let mut landed = false;
        for _ in 0..200 {
            if world.step_physics(0.02) {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(world.body_position().z, world.start_anchor().z);
    }
}
