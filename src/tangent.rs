//! Per-vertex tangents for normal mapping.
//!
//! Each triangle yields one tangent from its position and UV deltas. The
//! tangent is added to all three of its vertices, and a vertex's final
//! tangent is the plain mean of everything it collected.

use log::{debug, warn};

use crate::config::{DegenerateUvPolicy, LoadOptions};
use crate::error::{Error, Result};
use crate::model::{IndexedVertex, Vec3};

/// What happened during one [`compute_tangents`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TangentStats {
    pub triangles: usize,
    /// Triangles whose UV mapping has no area.
    pub degenerate: usize,
    /// Vertices that collected no tangent and were given a zero tangent.
    pub without_samples: usize,
}

fn triangle_tangent(
    v0: &IndexedVertex,
    v1: &IndexedVertex,
    v2: &IndexedVertex,
    options: &LoadOptions,
) -> (Option<Vec3>, bool) {
    let delta_pos1 = v1.position - v0.position;
    let delta_pos2 = v2.position - v0.position;
    let delta_uv1 = v1.tex_coord - v0.tex_coord;
    let delta_uv2 = v2.tex_coord - v0.tex_coord;

    let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
    // Relative to the UV edge lengths, so tiny but well-formed mappings pass.
    let scale = delta_uv1.norm() * delta_uv2.norm();
    let degenerate = det.is_nan() || det.abs() <= options.degenerate_epsilon * scale;
    if !degenerate || options.degenerate_uv == DegenerateUvPolicy::Propagate {
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        return (Some(tangent), degenerate);
    }

    match options.degenerate_uv {
        DegenerateUvPolicy::Fallback => (delta_pos1.try_normalize(f32::EPSILON), true),
        _ => (None, true),
    }
}

/// Accumulates and averages tangents onto `vertices` for the triangle list
/// `indices`.
///
/// Fails only when `indices` is not a triangle list over `vertices`.
pub fn compute_tangents(
    vertices: &mut [IndexedVertex],
    indices: &[u32],
    options: &LoadOptions,
) -> Result<TangentStats> {
    if indices.len() % 3 != 0 {
        return Err(Error::InvalidState(format!(
            "index list of length {} is not a triangle list",
            indices.len()
        )));
    }
    if let Some(&index) = indices.iter().find(|&&index| index as usize >= vertices.len()) {
        return Err(Error::InvalidState(format!(
            "index {} names one of only {} vertices",
            index,
            vertices.len()
        )));
    }

    let mut stats = TangentStats::default();
    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        stats.triangles += 1;

        let (tangent, degenerate) =
            triangle_tangent(&vertices[i0], &vertices[i1], &vertices[i2], options);
        if degenerate {
            stats.degenerate += 1;
        }
        if let Some(tangent) = tangent {
            for i in [i0, i1, i2] {
                vertices[i].add_tangent(tangent);
            }
        }
    }

    for vertex in vertices.iter_mut() {
        if vertex.finalize_tangent() == 0 {
            stats.without_samples += 1;
        }
    }

    if stats.degenerate > 0 {
        warn!(
            "{} of {} triangles have degenerate texture coordinates ({:?})",
            stats.degenerate, stats.triangles, options.degenerate_uv
        );
    }
    if stats.without_samples > 0 {
        warn!(
            "{} vertices received no tangent and were given a zero tangent",
            stats.without_samples
        );
    }
    debug!("computed tangents for {} triangles", stats.triangles);

    Ok(stats)
}
