//! Options controlling a single model load.
//!
//! A `LoadOptions` value is immutable once a load starts; each call to
//! [`crate::ObjLoader::load`] reads it but never keeps anything between loads.

/// How face lines with more than three vertex references are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacePolicy {
    /// Every face must have exactly three references.
    TrianglesOnly,
    /// Faces with three or more references are split into a triangle fan
    /// around their first reference.
    Fan,
}

/// What a triangle whose texture coordinates span no area contributes to
/// the tangents of its vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateUvPolicy {
    /// Contribute nothing.
    Skip,
    /// Contribute the direction of the triangle's first edge.
    Fallback,
    /// Divide anyway, letting infinities and NaNs through.
    Propagate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub face_policy: FacePolicy,
    /// Extension (without the dot) every texture map must carry.
    pub texture_extension: String,
    /// Read each texture's header rather than only checking that it opens.
    pub verify_textures: bool,
    pub compute_tangents: bool,
    pub degenerate_uv: DegenerateUvPolicy,
    /// A triangle is degenerate when its UV determinant is at most this
    /// fraction of the product of its two UV edge lengths.
    pub degenerate_epsilon: f32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            face_policy: FacePolicy::Fan,
            texture_extension: "ppm".to_string(),
            verify_textures: true,
            compute_tangents: true,
            degenerate_uv: DegenerateUvPolicy::Skip,
            degenerate_epsilon: 1e-6,
        }
    }
}

impl LoadOptions {
    pub fn with_face_policy(mut self, face_policy: FacePolicy) -> Self {
        self.face_policy = face_policy;
        self
    }

    pub fn with_texture_extension(mut self, extension: impl Into<String>) -> Self {
        self.texture_extension = extension.into();
        self
    }

    pub fn with_verify_textures(mut self, verify: bool) -> Self {
        self.verify_textures = verify;
        self
    }

    pub fn with_tangents(mut self, compute: bool) -> Self {
        self.compute_tangents = compute;
        self
    }

    pub fn with_degenerate_uv(mut self, policy: DegenerateUvPolicy) -> Self {
        self.degenerate_uv = policy;
        self
    }

    pub fn with_degenerate_epsilon(mut self, epsilon: f32) -> Self {
        self.degenerate_epsilon = epsilon;
        self
    }

    /// Smallest number of vertex references a face line may carry.
    pub fn min_face_refs(&self) -> usize {
        3
    }

    /// Largest number of vertex references a face line may carry, if bounded.
    pub fn max_face_refs(&self) -> Option<usize> {
        match self.face_policy {
            FacePolicy::TrianglesOnly => Some(3),
            FacePolicy::Fan => None,
        }
    }
}
