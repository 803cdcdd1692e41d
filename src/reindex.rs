//! Deduplication of face corners into a single indexed vertex buffer.
//!
//! A model file indexes positions, texture coordinates and normals
//! separately, while a GPU index buffer addresses whole vertices. Every
//! distinct [`VertexRef`] becomes one [`IndexedVertex`]; refs sharing a
//! position but differing in UV or normal stay distinct.

use std::collections::HashMap;

use log::debug;

use crate::error::{Attribute, Error, Result};
use crate::model::{IndexedVertex, RawFace, RawGeometry, VertexRef};

fn checked<T: Copy>(items: &[T], index: usize, attribute: Attribute) -> Result<T> {
    items.get(index).copied().ok_or(Error::IndexOutOfRange {
        attribute,
        index,
        len: items.len(),
    })
}

fn build_vertex(geometry: &RawGeometry, r: VertexRef, output_index: u32) -> Result<IndexedVertex> {
    let position = checked(&geometry.positions, r.position(), Attribute::Position)?;
    let tex_coord = checked(&geometry.tex_coords, r.tex_coord(), Attribute::TexCoord)?;
    let normal = match r.normal() {
        Some(index) => Some(checked(&geometry.normals, index, Attribute::Normal)?),
        None => None,
    };

    Ok(IndexedVertex::new(position, tex_coord, normal, output_index))
}

/// Builds the unique vertex list and a triangle index list from `faces`.
///
/// Faces are fan-triangulated in file order, so reading the indices in
/// groups of three reproduces the source triangles. Vertices are numbered
/// in order of first use.
pub fn reindex(
    geometry: &RawGeometry,
    faces: &[RawFace],
) -> Result<(Vec<IndexedVertex>, Vec<u32>)> {
    let mut lookup: HashMap<VertexRef, u32> = HashMap::new();
    let mut vertices = Vec::new();
    let mut indices = Vec::with_capacity(faces.iter().map(|f| (f.len() - 2) * 3).sum());

    for face in faces {
        for triangle in face.triangles() {
            for r in triangle {
                let index = match lookup.get(&r) {
                    Some(&index) => index,
                    None => {
                        let index = u32::try_from(vertices.len()).map_err(|_| {
                            Error::InvalidState("too many vertices for 32-bit indices".to_string())
                        })?;
                        vertices.push(build_vertex(geometry, r, index)?);
                        lookup.insert(r, index);
                        index
                    }
                };
                indices.push(index);
            }
        }
    }

    debug!(
        "reindexed {} faces into {} vertices and {} triangles",
        faces.len(),
        vertices.len(),
        indices.len() / 3
    );
    Ok((vertices, indices))
}
