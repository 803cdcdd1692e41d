//! Loads `.obj` models with their `.mtl` texture maps and turns them into
//! indexed, tangent-augmented vertex buffers ready for a renderer.
//!
//! ```no_run
//! let model = modelloader::translate_obj_file("assets/cube_uv.obj").unwrap();
//! assert_eq!(model.vertex_stride, 11);
//! ```

mod assemble;
mod config;
mod error;
mod mtl;
mod obj;
mod reindex;
mod tangent;
mod texture;
pub mod model;
pub mod tokenize;

use std::path::Path;

use log::debug;

pub use self::assemble::{assemble, layout_of};
pub use self::config::{DegenerateUvPolicy, FacePolicy, LoadOptions};
pub use self::error::{Attribute, Error, ErrorKind, Result};
pub use self::model::{
    IndexedVertex, MaterialReference, ObjData, RawFace, RawGeometry, TranslatedModel, VertexLayout,
    VertexRef,
};
pub use self::mtl::MtlLoader;
pub use self::obj::ObjLoader;
pub use self::reindex::reindex;
pub use self::tangent::{compute_tangents, TangentStats};
pub use self::texture::{
    parse_ppm_header, ExistenceResolver, PpmHeader, PpmHeaderResolver, TextureInfo,
    TextureResolver,
};

impl ObjData {
    /// Reindexes, computes tangents when `options` ask for them, and flattens
    /// the result.
    ///
    /// A model without faces has no vertices, so its layout follows the
    /// declared normals and the tangent option instead.
    pub fn translate(&self, options: &LoadOptions) -> Result<TranslatedModel> {
        let (mut vertices, indices) = reindex(&self.geometry, &self.faces)?;
        if options.compute_tangents {
            compute_tangents(&mut vertices, &indices, options)?;
        }

        let mut model = assemble(&vertices, &indices, &self.material);
        if vertices.is_empty() {
            // No vertex to derive the layout from; describe what the file declares.
            model.layout = VertexLayout {
                normals: !self.geometry.normals.is_empty(),
                tangents: options.compute_tangents,
            };
            model.vertex_stride = model.layout.stride() as u32;
        }
        model.name = self.name.clone();
        Ok(model)
    }
}

/// Loads a model descriptor without translating it.
pub fn load_obj<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<ObjData> {
    ObjLoader::new(options.clone()).load(path.as_ref())
}

/// Loads a material library on its own, resolving textures the way a model
/// load with the same `options` would.
pub fn load_mtl<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<MaterialReference> {
    let resolver: &dyn TextureResolver = if options.verify_textures {
        &PpmHeaderResolver
    } else {
        &ExistenceResolver
    };
    MtlLoader::new(options, resolver).load(path.as_ref())
}

pub fn translate_obj_file<P: AsRef<Path>>(path: P) -> Result<TranslatedModel> {
    translate_obj_file_with(path, &LoadOptions::default())
}

/// Runs the whole pipeline on one model file: load, reindex, tangents,
/// assembly. Nothing is shared with any other call.
pub fn translate_obj_file_with<P: AsRef<Path>>(
    path: P,
    options: &LoadOptions,
) -> Result<TranslatedModel> {
    let path = path.as_ref();
    let model = load_obj(path, options)?.translate(options)?;
    debug!(
        "translated {}: {} vertices, {} triangles",
        path.display(),
        model.vertex_count(),
        model.triangle_count()
    );
    Ok(model)
}
