//! Resolution of texture map references.
//!
//! The loader never decodes pixels. It only needs to know that a referenced
//! bitmap exists and how large it is, so resolvers stop after the header.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::trace;
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, digit1, multispace1, not_line_ending};
use nom::combinator::{eof, map_res, value};
use nom::multi::many1_count;
use nom::sequence::{preceded, terminated, tuple};
use nom::{Finish, IResult};

use crate::error::{Error, Result};

/// A texture map that resolved to a readable bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

pub trait TextureResolver {
    fn resolve(&self, path: &Path) -> Result<TextureInfo>;
}

impl<F> TextureResolver for F
where
    F: Fn(&Path) -> Result<TextureInfo>,
{
    fn resolve(&self, path: &Path) -> Result<TextureInfo> {
        self(path)
    }
}

/// Reads the header of a plain-text (`P3`) PPM bitmap.
#[derive(Debug, Clone, Copy, Default)]
pub struct PpmHeaderResolver;

/// Only checks that the file can be opened; width and height are reported as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExistenceResolver;

// Generous bound for a header plus leading comments.
const HEADER_WINDOW: u64 = 4096;

impl TextureResolver for PpmHeaderResolver {
    fn resolve(&self, path: &Path) -> Result<TextureInfo> {
        let file = File::open(path).map_err(|e| Error::unavailable(path, e.to_string()))?;
        let mut head = Vec::new();
        file.take(HEADER_WINDOW)
            .read_to_end(&mut head)
            .map_err(|e| Error::unavailable(path, e.to_string()))?;
        let head = String::from_utf8_lossy(&head);

        let header = parse_ppm_header(&head)
            .ok_or_else(|| Error::unavailable(path, "not a plain-text PPM bitmap"))?;
        trace!(
            "resolved texture {} ({}x{})",
            path.display(),
            header.width,
            header.height
        );

        Ok(TextureInfo {
            path: path.to_path_buf(),
            width: header.width,
            height: header.height,
        })
    }
}

impl TextureResolver for ExistenceResolver {
    fn resolve(&self, path: &Path) -> Result<TextureInfo> {
        File::open(path).map_err(|e| Error::unavailable(path, e.to_string()))?;
        trace!("found texture {}", path.display());

        Ok(TextureInfo {
            path: path.to_path_buf(),
            width: 0,
            height: 0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PpmHeader {
    pub width: u32,
    pub height: u32,
    pub max_value: u32,
}

/// Parses a `P3` header, rejecting zero dimensions and out-of-range maximum values.
pub fn parse_ppm_header(input: &str) -> Option<PpmHeader> {
    let (_, (width, height, max_value)) = ppm_header(input).finish().ok()?;
    if width == 0 || height == 0 || max_value == 0 || max_value > 65535 {
        return None;
    }

    Some(PpmHeader {
        width,
        height,
        max_value,
    })
}

/*
    Header grammar
*/

fn comment(input: &str) -> IResult<&str, &str> {
    preceded(char('#'), not_line_ending)(input)
}

fn separator(input: &str) -> IResult<&str, ()> {
    value((), many1_count(alt((multispace1, comment))))(input)
}

fn header_value(input: &str) -> IResult<&str, u32> {
    preceded(
        separator,
        map_res(digit1, |digits: &str| digits.parse::<u32>()),
    )(input)
}

fn ppm_header(input: &str) -> IResult<&str, (u32, u32, u32)> {
    preceded(
        tag("P3"),
        terminated(
            tuple((header_value, header_value, header_value)),
            alt((multispace1, eof)),
        ),
    )(input)
}
