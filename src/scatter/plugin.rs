//! Scatter plugin wiring (glue).
//! - Panel state + request queue + history
//! - Exclusive system draining the queue through the runner
//! - Preset asset/loader and startup load

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::ScatterConfig;
use super::instancing::EcsSceneHost;
use super::queue::{ScatterHistory, ScatterOutcome, ScatterQueue, ScatterRequest};
use super::registry::{ScatterPresets, ScatterPresetsAssetPlugin};
use super::runner::run_scatter;
use super::shapes::{PrimitiveKind, Subdivisions};

/// Seed used when neither the request nor the panel sets one.
pub const DEFAULT_SEED: u64 = 1234;

/// User-facing panel state. Read when building requests; passes never mutate it.
#[derive(Resource, Clone, Debug)]
pub struct ScatterPanel {
    pub shape: PrimitiveKind,
    pub subdivisions: Subdivisions,
    pub config: ScatterConfig,
    pub default_seed: u64,
    /// Index of the last applied preset, if any.
    pub preset: Option<usize>,
}

impl Default for ScatterPanel {
    fn default() -> Self {
        Self {
            shape: PrimitiveKind::Cube,
            subdivisions: PrimitiveKind::Cube.default_subdivisions(),
            config: ScatterConfig::default(),
            default_seed: DEFAULT_SEED,
            preset: None,
        }
    }
}

impl ScatterPanel {
    /// Switch shape and reset subdivisions to that shape's defaults.
    pub fn select_shape(&mut self, kind: PrimitiveKind) {
        self.shape = kind;
        self.subdivisions = kind.default_subdivisions();
    }

    /// Snapshot the current config into a request.
    pub fn request(&self, source: Entity, target: Entity) -> ScatterRequest {
        ScatterRequest { source, target, config: self.config.clone() }
    }

    /// Apply the preset after the current one (wrapping). Returns its name.
    pub fn cycle_preset<'p>(&mut self, presets: &'p ScatterPresets) -> Option<&'p str> {
        if presets.presets.is_empty() {
            return None;
        }
        let next = self.preset.map_or(0, |i| (i + 1) % presets.presets.len());
        let preset = &presets.presets[next];
        self.preset = Some(next);
        self.config = preset.config.clone();
        Some(preset.name.as_str())
    }
}

/// Per-pass RNG: the request's seed if set, otherwise mixed from the panel seed and pass number.
pub fn pass_rng(config: &ScatterConfig, default_seed: u64, pass: u64) -> ChaCha8Rng {
    let seed = config.seed.unwrap_or_else(|| {
        default_seed ^ pass.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ 0xA5A5_5A5A_D3F0_1234u64
    });
    ChaCha8Rng::seed_from_u64(seed)
}

pub struct ScatterPlugin;
impl Plugin for ScatterPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScatterPanel>()
            .init_resource::<ScatterQueue>()
            .init_resource::<ScatterHistory>()
            .add_systems(Update, process_scatter_queue);
    }
}

/// Exclusive: drain queued requests, one synchronous pass each.
pub fn process_scatter_queue(world: &mut World) {
    let requests = match world.get_resource_mut::<ScatterQueue>() {
        Some(mut queue) if !queue.items.is_empty() => std::mem::take(&mut queue.items),
        _ => return,
    };
    let default_seed = world
        .get_resource::<ScatterPanel>()
        .map_or(DEFAULT_SEED, |p| p.default_seed);

    for req in requests {
        let pass = {
            let mut history = world.get_resource_or_insert_with(ScatterHistory::default);
            history.passes += 1;
            history.passes
        };
        let mut rng = pass_rng(&req.config, default_seed, pass);

        let result = {
            let mut host = EcsSceneHost::new(world, req.target, pass);
            run_scatter(&mut host, req.source, &req.config, &mut rng)
        };

        let outcome = match result {
            Ok(report) => {
                info!(
                    "Scatter pass {}: placed {} of {} candidates on {:?}",
                    pass,
                    report.placed.len(),
                    report.candidates,
                    req.target
                );
                ScatterOutcome::Placed {
                    pass,
                    group: report.group,
                    candidates: report.candidates,
                    placed: report.placed.len(),
                }
            }
            Err(abort) => {
                warn!(
                    "Scatter pass {} aborted after {} instances: {}",
                    pass,
                    abort.partial.placed.len(),
                    abort.error
                );
                ScatterOutcome::Failed {
                    pass,
                    error: abort.error,
                    group: abort.partial.group,
                    placed: abort.partial.placed.len(),
                }
            }
        };

        world
            .get_resource_or_insert_with(ScatterHistory::default)
            .record(outcome);
    }
}

// ---------- Presets ----------

/// Where the preset file lives (relative to the asset folder).
#[derive(Resource, Clone)]
pub struct ScatterSettings {
    pub presets_path: String,
}
impl Default for ScatterSettings {
    fn default() -> Self {
        Self { presets_path: "scatter/presets.scatter.ron".to_string() }
    }
}

/// Handle to the loaded ScatterPresets asset.
#[derive(Resource, Default)]
pub struct ScatterPresetsHandle(pub Handle<ScatterPresets>);

pub struct ScatterPresetsPlugin;
impl Plugin for ScatterPresetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(ScatterPresetsAssetPlugin)
            .init_resource::<ScatterSettings>()
            .init_resource::<ScatterPresetsHandle>()
            .add_systems(Startup, load_presets)
            .add_systems(Update, monitor_presets_ready);
    }
}

/// Startup: request loading the preset file, store handle.
fn load_presets(
    mut handle_res: ResMut<ScatterPresetsHandle>,
    settings: Res<ScatterSettings>,
    assets: Res<AssetServer>,
) {
    if handle_res.0.is_strong() { return; }
    handle_res.0 = assets.load(settings.presets_path.as_str());
    info!("Scatter: loading presets from '{}'", settings.presets_path);
}

/// Update: log once when presets become available.
fn monitor_presets_ready(
    handle_res: Res<ScatterPresetsHandle>,
    presets: Res<Assets<ScatterPresets>>,
    mut logged: Local<bool>,
) {
    if *logged { return; }
    if let Some(p) = presets.get(&handle_res.0) {
        *logged = true;
        info!("Scatter: {} presets ready", p.presets.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_seed_wins() {
        use rand::Rng;
        let cfg = ScatterConfig::default().with_seed(5);
        let a: u64 = pass_rng(&cfg, 1, 1).random();
        let b: u64 = pass_rng(&cfg, 99, 7).random();
        assert_eq!(a, b);
    }

    #[test]
    fn passes_get_distinct_streams() {
        use rand::Rng;
        let cfg = ScatterConfig::default();
        let a: u64 = pass_rng(&cfg, DEFAULT_SEED, 1).random();
        let b: u64 = pass_rng(&cfg, DEFAULT_SEED, 2).random();
        assert_ne!(a, b);
    }

    #[test]
    fn selecting_a_shape_resets_subdivisions() {
        let mut panel = ScatterPanel::default();
        panel.subdivisions = Subdivisions::new(30, 30, 30);
        panel.select_shape(PrimitiveKind::Cone);
        assert_eq!(panel.subdivisions, Subdivisions::new(8, 3, 0));
    }

    #[test]
    fn presets_cycle_and_wrap() {
        let presets = ScatterPresets::from_ron_bytes(
            br#"[(name: "a", config: (density: 0.1)), (name: "b", config: (density: 0.2))]"#,
        )
        .unwrap();
        let mut panel = ScatterPanel::default();
        assert_eq!(panel.cycle_preset(&presets), Some("a"));
        assert_eq!(panel.config.density, 0.1);
        assert_eq!(panel.cycle_preset(&presets), Some("b"));
        assert_eq!(panel.cycle_preset(&presets), Some("a"));
    }
}
