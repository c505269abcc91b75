//! Minimal OBJ parser supporting positions, normals, texture coordinates and
//! triangle/quad faces. Materials, groups and smoothing are skipped.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use crate::error::{AssetError, AssetResult};

/// Directives that are understood but carry nothing we use.
const IGNORED_TOKENS: [&str; 4] = ["mtllib", "o", "usemtl", "s"];

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Normal {
    pub nx: f32,
    pub ny: f32,
    pub nz: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Uv {
    pub u: f32,
    pub v: f32,
}

/// Attribute indices of one polygon corner, already converted to 0-based.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceCorner {
    pub vertex: usize,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

/// Triangle, or quad when `i3` is set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub i0: FaceCorner,
    pub i1: FaceCorner,
    pub i2: FaceCorner,
    pub i3: Option<FaceCorner>,
}

impl Face {
    pub fn is_quad(&self) -> bool {
        self.i3.is_some()
    }
}

/// A directive we did not recognize. `line` is 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownDirective {
    pub line: usize,
    pub token: String,
}

/// Parsed OBJ contents. Indices in `faces` are not range-checked here; see
/// [`crate::mesh::assemble`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    pub positions: Vec<Position>,
    pub normals: Vec<Normal>,
    pub uvs: Vec<Uv>,
    pub faces: Vec<Face>,
    pub unknown: Vec<UnknownDirective>,
}

enum Token {
    Vertex,
    Normal,
    Uv,
    Face,
    Ignored,
    Unknown,
}

fn tokenize(tag: &str) -> Token {
    match tag {
        "v" => Token::Vertex,
        "vn" => Token::Normal,
        "vt" => Token::Uv,
        "f" => Token::Face,
        other if IGNORED_TOKENS.contains(&other) => Token::Ignored,
        _ => Token::Unknown,
    }
}

/// Load an OBJ model from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> AssetResult<Model> {
    let path = path.as_ref();
    log::info!("Loading obj file {}", path.display());
    let file = File::open(path).map_err(|err| AssetError::read(path, err))?;
    load_obj_from_reader(BufReader::new(file))
}

/// Load an OBJ model from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> AssetResult<Model> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> AssetResult<Model> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> AssetResult<Model> {
    let mut model = Model::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| {
            AssetError::format(line_no, format!("failed to read line: {}", err))
        })?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (tag, rest) = trimmed
            .split_once(char::is_whitespace)
            .unwrap_or((trimmed, ""));

        match tokenize(tag) {
            Token::Vertex => {
                let [x, y, z] = parse_floats(rest, line_no, trimmed)?;
                model.positions.push(Position { x, y, z });
            }
            Token::Normal => {
                let [nx, ny, nz] = parse_floats(rest, line_no, trimmed)?;
                model.normals.push(Normal { nx, ny, nz });
            }
            Token::Uv => {
                let [u, v] = parse_floats(rest, line_no, trimmed)?;
                model.uvs.push(Uv { u, v });
            }
            Token::Face => model.faces.push(parse_face(rest, line_no, trimmed)?),
            Token::Ignored => {}
            Token::Unknown => {
                log::warn!("Unknown OBJ token '{}' on line {}", tag, line_no + 1);
                model.unknown.push(UnknownDirective {
                    line: line_no + 1,
                    token: tag.to_owned(),
                });
            }
        }
    }

    Ok(model)
}

/// Parse exactly `N` whitespace-separated floats.
fn parse_floats<const N: usize>(rest: &str, line_no: usize, line: &str) -> AssetResult<[f32; N]> {
    let fields: Vec<&str> = rest.split_whitespace().collect();
    if fields.len() != N {
        return Err(AssetError::format(
            line_no,
            format!("expected {} values, found {}: '{}'", N, fields.len(), line),
        ));
    }

    let mut out = [0.0_f32; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse::<f32>().map_err(|_| {
            AssetError::format(line_no, format!("invalid number '{}': '{}'", field, line))
        })?;
    }
    Ok(out)
}

fn parse_face(rest: &str, line_no: usize, line: &str) -> AssetResult<Face> {
    let corners = rest
        .split_whitespace()
        .map(|token| parse_corner(token, line_no))
        .collect::<AssetResult<Vec<_>>>()?;

    match corners[..] {
        [i0, i1, i2] => Ok(Face { i0, i1, i2, i3: None }),
        [i0, i1, i2, i3] => Ok(Face {
            i0,
            i1,
            i2,
            i3: Some(i3),
        }),
        _ => Err(AssetError::format(
            line_no,
            format!("faces need 3 or 4 corners, found {}: '{}'", corners.len(), line),
        )),
    }
}

/// `v`, `v/vt`, `v/vt/vn` or `v//vn`. Empty optional fields are absent.
fn parse_corner(token: &str, line_no: usize) -> AssetResult<FaceCorner> {
    let fields: Vec<&str> = token.split('/').collect();
    let (vertex, uv, normal) = match fields[..] {
        [v] => (v, "", ""),
        [v, vt] => (v, vt, ""),
        [v, vt, vn] => (v, vt, vn),
        _ => {
            return Err(AssetError::format(
                line_no,
                format!("face corner '{}' has more than 3 fields", token),
            ));
        }
    };

    if vertex.is_empty() {
        return Err(AssetError::format(
            line_no,
            format!("face corner '{}' is missing its vertex index", token),
        ));
    }

    Ok(FaceCorner {
        vertex: parse_index(vertex, token, line_no)?,
        uv: parse_optional_index(uv, token, line_no)?,
        normal: parse_optional_index(normal, token, line_no)?,
    })
}

fn parse_optional_index(field: &str, token: &str, line_no: usize) -> AssetResult<Option<usize>> {
    if field.is_empty() {
        Ok(None)
    } else {
        parse_index(field, token, line_no).map(Some)
    }
}

/// 1-based OBJ index to 0-based.
fn parse_index(field: &str, token: &str, line_no: usize) -> AssetResult<usize> {
    let raw = field.parse::<i64>().map_err(|_| {
        AssetError::format(
            line_no,
            format!("invalid index '{}' in face corner '{}'", field, token),
        )
    })?;
    if raw < 1 {
        return Err(AssetError::format(
            line_no,
            format!("OBJ indices are 1-based; found {} in '{}'", raw, token),
        ));
    }
    usize::try_from(raw - 1).map_err(|_| {
        AssetError::format(line_no, format!("index {} does not fit in memory", raw))
    })
}
