use log::debug;

use crate::model::{IndexedVertex, MaterialReference, TranslatedModel, VertexLayout};

/// The layout every vertex in `vertices` can fill.
pub fn layout_of(vertices: &[IndexedVertex]) -> VertexLayout {
    let all = |has: fn(&IndexedVertex) -> bool| !vertices.is_empty() && vertices.iter().all(has);
    VertexLayout {
        normals: all(|v| v.normal.is_some()),
        tangents: all(|v| v.tangent().is_some()),
    }
}

/// Interleaves `vertices` as position, UV, then normal and tangent when every
/// vertex has one, and pairs the buffers with the material's texture paths.
pub fn assemble(
    vertices: &[IndexedVertex],
    indices: &[u32],
    material: &MaterialReference,
) -> TranslatedModel {
    let layout = layout_of(vertices);
    let mut vertex_data = Vec::with_capacity(vertices.len() * layout.stride());

    for vertex in vertices {
        vertex_data.extend_from_slice(vertex.position.as_slice());
        vertex_data.extend_from_slice(vertex.tex_coord.as_slice());
        if let (true, Some(normal)) = (layout.normals, vertex.normal) {
            vertex_data.extend_from_slice(normal.as_slice());
        }
        if let (true, Some(tangent)) = (layout.tangents, vertex.tangent()) {
            vertex_data.extend_from_slice(tangent.as_slice());
        }
    }

    debug!(
        "assembled {} vertices of {} floats and {} indices",
        vertices.len(),
        layout.stride(),
        indices.len()
    );

    TranslatedModel {
        name: None,
        vertex_data,
        index_data: indices.to_vec(),
        layout,
        vertex_stride: layout.stride() as u32,
        diffuse_map_path: material.diffuse_map_path().map(|path| path.to_path_buf()),
        normal_map_path: material.normal_map_path().map(|path| path.to_path_buf()),
    }
}
