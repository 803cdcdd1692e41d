use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use log::debug;
use nom::character::complete::{char, digit1};
use nom::combinator::{all_consuming, map, map_res, opt, verify};
use nom::number::complete::float;
use nom::sequence::{preceded, tuple};
use nom::{Finish, IResult};

use crate::config::LoadOptions;
use crate::error::{Error, Result};
use crate::model::*;
use crate::mtl::MtlLoader;
use crate::texture::{ExistenceResolver, PpmHeaderResolver, TextureResolver};
use crate::tokenize::{fields, strip_bom};

/*
    Field grammars
*/

fn number(input: &str) -> IResult<&str, f32> {
    float(input)
}

fn one_based_index(input: &str) -> IResult<&str, usize> {
    map(
        verify(
            map_res(digit1, |digits: &str| digits.parse::<usize>()),
            |index: &usize| *index > 0,
        ),
        |index| index - 1,
    )(input)
}

fn vertex_ref(input: &str) -> IResult<&str, VertexRef> {
    map(
        tuple((
            one_based_index,
            preceded(char('/'), one_based_index),
            opt(preceded(char('/'), one_based_index)),
        )),
        |(position, tex_coord, normal)| match normal {
            Some(normal) => VertexRef::WithNormal {
                position,
                tex_coord,
                normal,
            },
            None => VertexRef::WithoutNormal {
                position,
                tex_coord,
            },
        },
    )(input)
}

fn parse_number(field: &str) -> std::result::Result<f32, String> {
    match all_consuming(number)(field).finish() {
        Ok((_, value)) if value.is_finite() => Ok(value),
        Ok(_) => Err(format!("`{}` is not a finite number", field)),
        Err(_) => Err(format!("`{}` is not a number", field)),
    }
}

fn parse_numbers<const N: usize>(args: &[&str]) -> std::result::Result<[f32; N], String> {
    if args.len() != N {
        return Err(format!(
            "expected {} numeric fields, found {}",
            N,
            args.len()
        ));
    }

    let mut values = [0.0; N];
    for (value, field) in values.iter_mut().zip(args) {
        *value = parse_number(field)?;
    }
    Ok(values)
}

fn parse_vertex_ref(field: &str) -> std::result::Result<VertexRef, String> {
    all_consuming(vertex_ref)(field)
        .finish()
        .map(|(_, r)| r)
        .map_err(|_| {
            format!(
                "malformed vertex reference `{}` (expected 1-based `p/t` or `p/t/n`)",
                field
            )
        })
}

/*
    Loader
*/

/// Loads model descriptor (`.obj`) files.
///
/// A loader owns only its options and texture resolver. Every call to
/// [`ObjLoader::load`] starts from empty state, so one loader can be reused
/// for unrelated models.
pub struct ObjLoader {
    options: LoadOptions,
    resolver: Box<dyn TextureResolver>,
}

impl ObjLoader {
    pub fn new(options: LoadOptions) -> Self {
        let resolver: Box<dyn TextureResolver> = if options.verify_textures {
            Box::new(PpmHeaderResolver)
        } else {
            Box::new(ExistenceResolver)
        };
        ObjLoader { options, resolver }
    }

    pub fn with_resolver(options: LoadOptions, resolver: Box<dyn TextureResolver>) -> Self {
        ObjLoader { options, resolver }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn load(&self, path: &Path) -> Result<ObjData> {
        debug!("loading model {}", path.display());
        let io_error = |source| Error::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(io_error)?;
        let mut builder = ObjBuilder::new(self, path);
        for (number, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(io_error)?;
            builder.process_line(number + 1, &line)?;
        }

        Ok(builder.finish())
    }

    /// Parses model text as if it had been read from `path`. The `mtllib`
    /// reference resolves relative to the directory containing `path`.
    pub fn parse(&self, text: &str, path: &Path) -> Result<ObjData> {
        let mut builder = ObjBuilder::new(self, path);
        for (number, line) in text.lines().enumerate() {
            builder.process_line(number + 1, line)?;
        }

        Ok(builder.finish())
    }
}

/// Per-load accumulation state. Dropped on the first error so no partial
/// model escapes.
struct ObjBuilder<'a> {
    loader: &'a ObjLoader,
    path: &'a Path,
    base_dir: PathBuf,
    data: ObjData,
    dialect: Option<bool>,
    ignored: HashSet<String>,
}

impl<'a> ObjBuilder<'a> {
    fn new(loader: &'a ObjLoader, path: &'a Path) -> Self {
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        ObjBuilder {
            loader,
            path,
            base_dir,
            data: ObjData::default(),
            dialect: None,
            ignored: HashSet::new(),
        }
    }

    fn process_line(&mut self, number: usize, line: &str) -> Result<()> {
        let line = strip_bom(number, line);
        let tokens = fields(line);
        let (tag, args) = match tokens.split_first() {
            Some((tag, args)) => (*tag, args),
            None => return Ok(()),
        };

        let outcome = match tag {
            "v" => parse_numbers::<3>(args).map(|[x, y, z]| {
                self.data.geometry.positions.push(Vec3::new(x, y, z));
            }),
            "vn" => parse_numbers::<3>(args).map(|[x, y, z]| {
                self.data.geometry.normals.push(Vec3::new(x, y, z));
            }),
            "vt" => parse_numbers::<2>(args).map(|[u, v]| {
                self.data.geometry.tex_coords.push(Vec2::new(u, v));
            }),
            "f" => self.face(args),
            "o" => {
                if self.data.name.is_none() && !args.is_empty() {
                    self.data.name = Some(args.join(" "));
                }
                Ok(())
            }
            "mtllib" => return self.material_library(number, line, args),
            _ => {
                if self.ignored.insert(tag.to_string()) {
                    debug!(
                        "{}:{}: ignoring `{}` lines",
                        self.path.display(),
                        number,
                        tag
                    );
                }
                Ok(())
            }
        };

        outcome.map_err(|message| Error::Parse {
            path: self.path.to_path_buf(),
            line: number,
            text: line.to_string(),
            message,
        })
    }

    fn face(&mut self, args: &[&str]) -> std::result::Result<(), String> {
        let options = &self.loader.options;
        if args.len() < options.min_face_refs() {
            return Err(format!(
                "a face needs at least {} vertex references, found {}",
                options.min_face_refs(),
                args.len()
            ));
        }
        if let Some(max) = options.max_face_refs() {
            if args.len() > max {
                return Err(format!(
                    "a face may have at most {} vertex references, found {}",
                    max,
                    args.len()
                ));
            }
        }

        let refs = args
            .iter()
            .map(|field| parse_vertex_ref(field))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for r in &refs {
            match self.dialect {
                None => self.dialect = Some(r.has_normal()),
                Some(with_normals) if with_normals != r.has_normal() => {
                    return Err(format!(
                        "vertex reference dialect changes here (expected {})",
                        if with_normals { "`p/t/n`" } else { "`p/t`" }
                    ));
                }
                Some(_) => {}
            }
        }

        let face = RawFace::new(refs)
            .ok_or_else(|| "a face needs at least 3 vertex references".to_string())?;
        self.data.faces.push(face);
        Ok(())
    }

    fn material_library(&mut self, number: usize, line: &str, args: &[&str]) -> Result<()> {
        if args.len() != 1 {
            return Err(Error::Parse {
                path: self.path.to_path_buf(),
                line: number,
                text: line.to_string(),
                message: format!(
                    "expected exactly one material library, found {}",
                    args.len()
                ),
            });
        }

        let loader = MtlLoader::new(&self.loader.options, self.loader.resolver.as_ref());
        let material = loader
            .load(&self.base_dir.join(args[0]))
            .map_err(|source| Error::Material {
                path: self.path.to_path_buf(),
                line: number,
                source: Box::new(source),
            })?;
        self.data.material.merge(material);
        Ok(())
    }

    fn finish(self) -> ObjData {
        debug!(
            "loaded {}: {} positions, {} texture coordinates, {} normals, {} faces",
            self.path.display(),
            self.data.geometry.positions.len(),
            self.data.geometry.tex_coords.len(),
            self.data.geometry.normals.len(),
            self.data.faces.len()
        );
        self.data
    }
}
