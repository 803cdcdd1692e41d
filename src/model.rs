use std::path::{Path, PathBuf};

use nalgebra::{Vector2, Vector3};

use crate::texture::TextureInfo;

pub type Vec2 = Vector2<f32>;
pub type Vec3 = Vector3<f32>;

/// Geometry exactly as listed in a model file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
}

/// One corner of a face: 0-based indices into [`RawGeometry`].
///
/// Two dialects exist, with and without a normal index. Equal refs always
/// name the same output vertex, so a ref doubles as its own dedup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexRef {
    WithNormal {
        position: usize,
        tex_coord: usize,
        normal: usize,
    },
    WithoutNormal {
        position: usize,
        tex_coord: usize,
    },
}

impl VertexRef {
    pub fn position(&self) -> usize {
        match *self {
            VertexRef::WithNormal { position, .. } | VertexRef::WithoutNormal { position, .. } => {
                position
            }
        }
    }

    pub fn tex_coord(&self) -> usize {
        match *self {
            VertexRef::WithNormal { tex_coord, .. }
            | VertexRef::WithoutNormal { tex_coord, .. } => tex_coord,
        }
    }

    pub fn normal(&self) -> Option<usize> {
        match *self {
            VertexRef::WithNormal { normal, .. } => Some(normal),
            VertexRef::WithoutNormal { .. } => None,
        }
    }

    pub fn has_normal(&self) -> bool {
        self.normal().is_some()
    }
}

/// A polygon of three or more vertex refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFace {
    refs: Vec<VertexRef>,
}

impl RawFace {
    /// Returns `None` for fewer than three refs.
    pub fn new(refs: Vec<VertexRef>) -> Option<Self> {
        if refs.len() < 3 {
            None
        } else {
            Some(RawFace { refs })
        }
    }

    pub fn triangle(a: VertexRef, b: VertexRef, c: VertexRef) -> Self {
        RawFace {
            refs: vec![a, b, c],
        }
    }

    pub fn refs(&self) -> &[VertexRef] {
        &self.refs
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// The fan triangulation around the first ref; a triangle yields itself.
    pub fn triangles(&self) -> impl Iterator<Item = [VertexRef; 3]> + '_ {
        let first = self.refs[0];
        self.refs[1..]
            .windows(2)
            .map(move |pair| [first, pair[0], pair[1]])
    }
}

/// Texture maps declared by a model's material library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialReference {
    pub diffuse_map: Option<TextureInfo>,
    pub normal_map: Option<TextureInfo>,
}

impl MaterialReference {
    pub fn diffuse_map_path(&self) -> Option<&Path> {
        self.diffuse_map.as_ref().map(|map| map.path.as_path())
    }

    pub fn normal_map_path(&self) -> Option<&Path> {
        self.normal_map.as_ref().map(|map| map.path.as_path())
    }

    /// Takes every map `later` declares, keeping ours where it declares none.
    pub fn merge(&mut self, later: MaterialReference) {
        if later.diffuse_map.is_some() {
            self.diffuse_map = later.diffuse_map;
        }
        if later.normal_map.is_some() {
            self.normal_map = later.normal_map;
        }
    }
}

/// Everything a successful model load produces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub name: Option<String>,
    pub geometry: RawGeometry,
    pub faces: Vec<RawFace>,
    pub material: MaterialReference,
}

/// A deduplicated output vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedVertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
    pub normal: Option<Vec3>,
    pub output_index: u32,
    tangent_samples: Vec<Vec3>,
    tangent: Option<Vec3>,
}

impl IndexedVertex {
    pub fn new(position: Vec3, tex_coord: Vec2, normal: Option<Vec3>, output_index: u32) -> Self {
        IndexedVertex {
            position,
            tex_coord,
            normal,
            output_index,
            tangent_samples: Vec::new(),
            tangent: None,
        }
    }

    pub fn add_tangent(&mut self, tangent: Vec3) {
        self.tangent_samples.push(tangent);
    }

    pub fn tangent_samples(&self) -> &[Vec3] {
        &self.tangent_samples
    }

    /// Averages the accumulated samples into the final tangent and returns
    /// how many samples went into it. With no samples the tangent is zero.
    pub fn finalize_tangent(&mut self) -> usize {
        let count = self.tangent_samples.len();
        let tangent = if count == 0 {
            Vec3::zeros()
        } else {
            let sum: Vec3 = self.tangent_samples.iter().sum();
            sum / count as f32
        };
        self.tangent = Some(tangent);
        count
    }

    pub fn tangent(&self) -> Option<Vec3> {
        self.tangent
    }
}

/// Which optional attributes are interleaved after position and UV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexLayout {
    pub normals: bool,
    pub tangents: bool,
}

impl VertexLayout {
    /// Floats per vertex.
    pub fn stride(&self) -> usize {
        let normals = if self.normals { 3 } else { 0 };
        let tangents = if self.tangents { 3 } else { 0 };
        3 + 2 + normals + tangents
    }

    pub fn uv_offset(&self) -> usize {
        3
    }

    pub fn normal_offset(&self) -> Option<usize> {
        if self.normals {
            Some(5)
        } else {
            None
        }
    }

    pub fn tangent_offset(&self) -> Option<usize> {
        if self.tangents {
            Some(if self.normals { 8 } else { 5 })
        } else {
            None
        }
    }
}

/// Flat buffers ready to upload, plus the texture maps to bind with them.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedModel {
    pub name: Option<String>,
    pub vertex_data: Vec<f32>,
    pub index_data: Vec<u32>,
    pub layout: VertexLayout,
    pub vertex_stride: u32,
    pub diffuse_map_path: Option<PathBuf>,
    pub normal_map_path: Option<PathBuf>,
}

impl TranslatedModel {
    pub fn vertex_count(&self) -> usize {
        self.vertex_data.len() / self.layout.stride()
    }

    pub fn triangle_count(&self) -> usize {
        self.index_data.len() / 3
    }

    /// The interleaved floats of vertex `i`.
    pub fn vertex(&self, i: usize) -> Option<&[f32]> {
        let stride = self.layout.stride();
        self.vertex_data.get(i * stride..(i + 1) * stride)
    }

    pub fn diffuse_map_path(&self) -> Option<&Path> {
        self.diffuse_map_path.as_deref()
    }

    pub fn normal_map_path(&self) -> Option<&Path> {
        self.normal_map_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(position: usize, tex_coord: usize, normal: usize) -> VertexRef {
        VertexRef::WithNormal {
            position,
            tex_coord,
            normal,
        }
    }

    #[test]
    fn test_face_needs_three_refs() {
        assert!(RawFace::new(vec![r(0, 0, 0), r(1, 1, 0)]).is_none());
        assert!(RawFace::new(vec![r(0, 0, 0), r(1, 1, 0), r(2, 2, 0)]).is_some());
    }

    #[test]
    fn test_fan_triangulation() {
        let face = RawFace::new(vec![r(0, 0, 0), r(1, 1, 0), r(2, 2, 0), r(3, 3, 0), r(4, 4, 0)])
            .unwrap();
        let triangles: Vec<_> = face.triangles().collect();

        assert_eq!(
            triangles,
            vec![
                [r(0, 0, 0), r(1, 1, 0), r(2, 2, 0)],
                [r(0, 0, 0), r(2, 2, 0), r(3, 3, 0)],
                [r(0, 0, 0), r(3, 3, 0), r(4, 4, 0)],
            ]
        );
    }

    #[test]
    fn test_triangle_is_its_own_fan() {
        let face = RawFace::triangle(r(0, 0, 0), r(1, 1, 0), r(2, 2, 0));
        assert_eq!(face.triangles().count(), 1);
    }

    #[test]
    fn test_vertex_ref_dialects() {
        let without = VertexRef::WithoutNormal {
            position: 4,
            tex_coord: 2,
        };
        assert_eq!(without.position(), 4);
        assert_eq!(without.tex_coord(), 2);
        assert_eq!(without.normal(), None);
        assert_ne!(
            without,
            VertexRef::WithNormal {
                position: 4,
                tex_coord: 2,
                normal: 0
            }
        );
    }

    #[test]
    fn test_finalize_averages_samples() {
        let mut v = IndexedVertex::new(Vec3::zeros(), Vec2::zeros(), None, 0);
        v.add_tangent(Vec3::new(1.0, 0.0, 0.0));
        v.add_tangent(Vec3::new(0.0, 1.0, 0.0));

        assert_eq!(v.finalize_tangent(), 2);
        assert_eq!(v.tangent(), Some(Vec3::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn test_finalize_without_samples_is_zero() {
        let mut v = IndexedVertex::new(Vec3::zeros(), Vec2::zeros(), None, 0);

        assert_eq!(v.finalize_tangent(), 0);
        assert_eq!(v.tangent(), Some(Vec3::zeros()));
    }

    #[test]
    fn test_layout_offsets() {
        let full = VertexLayout {
            normals: true,
            tangents: true,
        };
        assert_eq!(full.stride(), 11);
        assert_eq!(full.normal_offset(), Some(5));
        assert_eq!(full.tangent_offset(), Some(8));

        let textured = VertexLayout {
            normals: false,
            tangents: false,
        };
        assert_eq!(textured.stride(), 5);
        assert_eq!(textured.normal_offset(), None);

        let no_normals = VertexLayout {
            normals: false,
            tangents: true,
        };
        assert_eq!(no_normals.stride(), 8);
        assert_eq!(no_normals.tangent_offset(), Some(5));
    }

    #[test]
    fn test_merge_keeps_undeclared_maps() {
        let diffuse = TextureInfo {
            path: PathBuf::from("a.ppm"),
            width: 2,
            height: 2,
        };
        let normal = TextureInfo {
            path: PathBuf::from("b.ppm"),
            width: 2,
            height: 2,
        };
        let mut material = MaterialReference {
            diffuse_map: Some(diffuse.clone()),
            normal_map: None,
        };
        material.merge(MaterialReference {
            diffuse_map: None,
            normal_map: Some(normal),
        });

        assert_eq!(material.diffuse_map, Some(diffuse));
        assert_eq!(material.normal_map_path(), Some(Path::new("b.ppm")));
    }
}
