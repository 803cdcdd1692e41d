//! Material library (`.mtl`) parsing.
//!
//! Only the texture map declarations matter here. Colors, shininess and every
//! other statement are skipped.

use std::fs;
use std::path::Path;

use log::debug;

use crate::config::LoadOptions;
use crate::error::{Error, Result};
use crate::model::MaterialReference;
use crate::texture::{TextureInfo, TextureResolver};
use crate::tokenize::{fields, strip_bom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MapKind {
    Diffuse,
    Normal,
}

impl MapKind {
    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "map_Kd" => Some(MapKind::Diffuse),
            "map_Bump" | "map_bump" | "bump" => Some(MapKind::Normal),
            _ => None,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            MapKind::Diffuse => "diffuse map",
            MapKind::Normal => "normal map",
        }
    }
}

/// Loads one material library. Borrowed from the model load that found the
/// `mtllib` line; holds nothing between calls.
pub struct MtlLoader<'a> {
    options: &'a LoadOptions,
    resolver: &'a dyn TextureResolver,
}

impl<'a> MtlLoader<'a> {
    pub fn new(options: &'a LoadOptions, resolver: &'a dyn TextureResolver) -> Self {
        MtlLoader { options, resolver }
    }

    pub fn load(&self, path: &Path) -> Result<MaterialReference> {
        debug!("loading material library {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| Error::unavailable(path, e.to_string()))?;
        self.parse(&text, path)
    }

    /// Parses material text as if it had been read from `path`. Texture maps
    /// resolve relative to the directory containing `path`.
    pub fn parse(&self, text: &str, path: &Path) -> Result<MaterialReference> {
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let mut material = MaterialReference::default();

        for (number, line) in text.lines().enumerate() {
            let line = strip_bom(number + 1, line);
            let tokens = fields(line);
            let kind = match tokens.first().and_then(|tag| MapKind::from_tag(tag)) {
                Some(kind) => kind,
                None => continue,
            };

            if tokens.len() != 2 {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    line: number + 1,
                    text: line.to_string(),
                    message: format!(
                        "expected exactly one {} file name, found {}",
                        kind.describe(),
                        tokens.len() - 1
                    ),
                });
            }

            let map = self.resolve_map(base_dir, tokens[1], kind)?;
            match kind {
                MapKind::Diffuse => material.diffuse_map = Some(map),
                MapKind::Normal => material.normal_map = Some(map),
            }
        }

        Ok(material)
    }

    fn resolve_map(&self, base_dir: &Path, name: &str, kind: MapKind) -> Result<TextureInfo> {
        let expected = &self.options.texture_extension;
        let matches = Path::new(name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map_or(false, |extension| extension.eq_ignore_ascii_case(expected));
        if !matches {
            return Err(Error::unavailable(
                name,
                format!("the {} must be a .{} file", kind.describe(), expected),
            ));
        }

        self.resolver.resolve(&base_dir.join(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use std::path::PathBuf;

    fn fake(path: &Path) -> Result<TextureInfo> {
        Ok(TextureInfo {
            path: path.to_path_buf(),
            width: 8,
            height: 8,
        })
    }

    fn parse(text: &str) -> Result<MaterialReference> {
        let options = LoadOptions::default();
        MtlLoader::new(&options, &fake).parse(text, Path::new("models/cube.mtl"))
    }

    #[test]
    fn test_parse_maps() {
        let material = parse(
            "newmtl Material\nNs 96.078431\nKd 0.640000 0.640000 0.640000\nmap_Kd bricks.ppm\nmap_Bump bricks_n.ppm\n",
        )
        .unwrap();

        assert_eq!(
            material.diffuse_map_path(),
            Some(Path::new("models/bricks.ppm"))
        );
        assert_eq!(
            material.normal_map_path(),
            Some(Path::new("models/bricks_n.ppm"))
        );
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let material = parse("\u{FEFF}map_Kd bricks.ppm\n").unwrap();
        assert_eq!(
            material.diffuse_map_path(),
            Some(Path::new("models/bricks.ppm"))
        );
    }

    #[test]
    fn test_no_maps() {
        let material = parse("newmtl Material\nKd 1 1 1\n").unwrap();
        assert_eq!(material, MaterialReference::default());
    }

    #[test]
    fn test_later_map_overrides() {
        let material = parse("map_Kd first.ppm\nmap_Kd second.ppm\n").unwrap();
        assert_eq!(
            material.diffuse_map_path(),
            Some(Path::new("models/second.ppm"))
        );
    }

    #[test]
    fn test_bump_alias() {
        let material = parse("bump normals.PPM # uppercase extension\n").unwrap();
        assert_eq!(
            material.normal_map_path(),
            Some(Path::new("models/normals.PPM"))
        );
    }

    #[test]
    fn test_reject_wrong_extension() {
        let err = parse("map_Kd bricks.png\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);

        let err = parse("map_Bump bricks\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceUnavailable);
    }

    #[test]
    fn test_reject_field_count() {
        let err = parse("map_Kd\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);

        match parse("Kd 1 1 1\nmap_Kd -s 1 1 1 bricks.ppm\n").unwrap_err() {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_resolver_failure_propagates() {
        let options = LoadOptions::default();
        let missing = |path: &Path| -> Result<TextureInfo> {
            Err(Error::unavailable(path, "no such file"))
        };
        let err = MtlLoader::new(&options, &missing)
            .parse("map_Kd bricks.ppm", Path::new("cube.mtl"))
            .unwrap_err();

        match err {
            Error::ResourceUnavailable { path, .. } => assert_eq!(path, PathBuf::from("bricks.ppm")),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_custom_extension() {
        let options = LoadOptions::default().with_texture_extension("png");
        let material = MtlLoader::new(&options, &fake)
            .parse("map_Kd bricks.png", Path::new("cube.mtl"))
            .unwrap();
        assert_eq!(material.diffuse_map_path(), Some(Path::new("bricks.png")));
    }
}
