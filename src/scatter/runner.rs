// src/scatter/runner.rs
//! One scatter pass: query, sample, instance, orient, group.

use bevy::prelude::*;
use rand::Rng;

use super::config::ScatterConfig;
use super::core::{euler_degrees_to_quat, AffineTransform, InstancePlacement, PlacementPoint, ScatterError};
use super::host::SceneHost;
use super::placement::{align_to_surface, sample};

/// One instance committed during a pass.
#[derive(Clone, Debug)]
pub struct PlacedInstance<I> {
    pub instance: I,
    pub point: PlacementPoint,
    pub transform: Transform,
}

/// Outcome of a pass.
#[derive(Debug)]
pub struct ScatterReport<I, G> {
    /// Selected points before density sampling.
    pub candidates: usize,
    pub placed: Vec<PlacedInstance<I>>,
    /// `None` when nothing was placed.
    pub group: Option<G>,
}

impl<I, G> ScatterReport<I, G> {
    fn empty(candidates: usize) -> Self {
        Self { candidates, placed: Vec::new(), group: None }
    }
}

/// A pass stopped by an error. Instances committed before the failure are
/// grouped in `partial` so they can be cleared with the rest.
#[derive(Debug)]
pub struct ScatterAbort<I, G> {
    pub error: ScatterError,
    pub partial: ScatterReport<I, G>,
}

impl<I, G> From<ScatterError> for ScatterAbort<I, G> {
    fn from(error: ScatterError) -> Self {
        Self { error, partial: ScatterReport::empty(0) }
    }
}

/// Local rotation and scale drawn for one instance.
fn perturbation<R: Rng>(config: &ScatterConfig, rng: &mut R) -> (Vec3, Vec3) {
    let rotation_deg = config.rotation.draw(rng);
    let scale = config.scale.draw(rng);
    (rotation_deg, scale)
}

/// Everything that can fail about a point's orientation, resolved before the
/// host is asked for an instance.
fn resolve_placement<H: SceneHost>(
    host: &H,
    point: &PlacementPoint,
    config: &ScatterConfig,
    rotation_deg: Vec3,
    scale: Vec3,
) -> Result<InstancePlacement, ScatterError> {
    if !config.align_to_normal {
        return Ok(InstancePlacement::Trs { translation: point.position, rotation_deg, scale });
    }
    let normal = host.query_vertex_normal(point)?;
    let aligned = align_to_surface(point.position, normal)?;
    let local = Mat4::from_scale_rotation_translation(scale, euler_degrees_to_quat(rotation_deg), Vec3::ZERO);
    Ok(InstancePlacement::Matrix(AffineTransform(aligned.matrix() * local)))
}

/// Group what the pass managed to create, then hand back the error.
fn abort<H: SceneHost>(
    host: &mut H,
    mut partial: ScatterReport<H::Instance, H::Group>,
    unplaced: Option<H::Instance>,
    error: ScatterError,
) -> ScatterAbort<H::Instance, H::Group> {
    let mut handles: Vec<H::Instance> = partial.placed.iter().map(|p| p.instance.clone()).collect();
    handles.extend(unplaced);
    if !handles.is_empty() {
        match host.group(&handles) {
            Ok(group) => partial.group = Some(group),
            Err(e) => warn!("Scatter: could not group {} stranded instances: {}", handles.len(), e),
        }
    }
    ScatterAbort { error, partial }
}

/// Instance `source` over a density-sampled subset of the host's selection.
///
/// A point's placement is resolved before its instance exists, so an error
/// never leaves a half-built instance. Whatever was committed earlier is still
/// grouped and returned in [`ScatterAbort::partial`].
pub fn run_scatter<H: SceneHost, R: Rng>(
    host: &mut H,
    source: H::Source,
    config: &ScatterConfig,
    rng: &mut R,
) -> Result<ScatterReport<H::Instance, H::Group>, ScatterAbort<H::Instance, H::Group>> {
    config.validate()?;

    let candidates = host.query_selected_points()?;
    if candidates.is_empty() {
        debug!("Scatter: empty selection, nothing to do");
        return Ok(ScatterReport::empty(0));
    }

    let picked = sample(&candidates, config.density, rng)?;
    let mut report = ScatterReport::empty(candidates.len());
    report.placed.reserve(picked.len());

    for point in picked {
        let (rotation_deg, scale) = perturbation(config, rng);
        let placement = match resolve_placement(host, &point, config, rotation_deg, scale) {
            Ok(p) => p,
            Err(e) => return Err(abort(host, report, None, e)),
        };
        let instance = match host.create_instance(source) {
            Ok(i) => i,
            Err(e) => return Err(abort(host, report, None, e)),
        };
        match host.apply_transform(&instance, placement) {
            Ok(transform) => report.placed.push(PlacedInstance { instance, point, transform }),
            Err(e) => return Err(abort(host, report, Some(instance), e)),
        }
    }

    if !report.placed.is_empty() {
        let handles: Vec<H::Instance> = report.placed.iter().map(|p| p.instance.clone()).collect();
        match host.group(&handles) {
            Ok(group) => report.group = Some(group),
            Err(error) => return Err(ScatterAbort { error, partial: report }),
        }
    }

    debug!(
        "Scatter: placed {} of {} candidates (density {})",
        report.placed.len(),
        report.candidates,
        config.density
    );

    Ok(report)
}
