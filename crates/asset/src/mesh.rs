//! CPU-side mesh representation and OBJ face assembly.

use std::{fmt, path::Path};

use bytemuck::{Pod, Zeroable};

use crate::{
    error::{AssetError, AssetResult, Attribute},
    obj::{self, FaceCorner, Model},
};

/// Interleaved vertex: position, normal, uv. 8 tightly packed floats.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const DEFAULT_NORMAL: [f32; 3] = [0.0, 0.0, 1.0];
    pub const DEFAULT_UV: [f32; 2] = [0.0, 0.0];

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self::new([0.0; 3], Self::DEFAULT_NORMAL, Self::DEFAULT_UV)
    }
}

/// Non-indexed triangle list, three vertices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
}

impl MeshData {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Raw bytes for a vertex buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Flat `x,y,z,nx,ny,nz,u,v` records.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// UV-space extremal vertices, used to calibrate projector walls by hand.
/// A corner is `None` when no vertex ever improved on its seed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerReport {
    pub min_u_min_v: Option<Vertex>,
    pub min_u_max_v: Option<Vertex>,
    pub max_u_min_v: Option<Vertex>,
    pub max_u_max_v: Option<Vertex>,
}

/// Tracks one corner. Coordinates are mirrored so every corner minimizes.
struct CornerTracker {
    sign: [f32; 2],
    best: [f32; 2],
    vertex: Option<Vertex>,
}

impl CornerTracker {
    fn new(sign_u: f32, sign_v: f32) -> Self {
        Self {
            sign: [sign_u, sign_v],
            best: [f32::MAX, f32::MAX],
            vertex: None,
        }
    }

    /// Accepts the vertex only if it is strictly better on both axes, so a
    /// later vertex that ties on either one never displaces an earlier one.
    fn offer(&mut self, vertex: &Vertex) {
        let u = vertex.uv[0] * self.sign[0];
        let v = vertex.uv[1] * self.sign[1];
        let [bu, bv] = self.best;
        if u < bu && v < bv {
            self.best = [u, v];
            self.vertex = Some(*vertex);
        }
    }
}

impl CornerReport {
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let mut min_min = CornerTracker::new(1.0, 1.0);
        let mut min_max = CornerTracker::new(1.0, -1.0);
        let mut max_min = CornerTracker::new(-1.0, 1.0);
        let mut max_max = CornerTracker::new(-1.0, -1.0);

        for vertex in vertices {
            min_min.offer(vertex);
            min_max.offer(vertex);
            max_min.offer(vertex);
            max_max.offer(vertex);
        }

        Self {
            min_u_min_v: min_min.vertex,
            min_u_max_v: min_max.vertex,
            max_u_min_v: max_min.vertex,
            max_u_max_v: max_max.vertex,
        }
    }

    /// `true` when all four corners were found.
    pub fn is_complete(&self) -> bool {
        self.corners().iter().all(|(_, v)| v.is_some())
    }

    pub fn corners(&self) -> [(&'static str, Option<Vertex>); 4] {
        [
            ("min U / min V", self.min_u_min_v),
            ("min U / max V", self.min_u_max_v),
            ("max U / min V", self.max_u_min_v),
            ("max U / max V", self.max_u_max_v),
        ]
    }
}

impl fmt::Display for CornerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (label, vertex)) in self.corners().into_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match vertex {
                Some(v) => write!(
                    f,
                    "{}: position ({}, {}, {}) uv ({}, {})",
                    label, v.position[0], v.position[1], v.position[2], v.uv[0], v.uv[1]
                )?,
                None => write!(f, "{}: not found", label)?,
            }
        }
        Ok(())
    }
}

/// Resolve every face of `model` into a flat triangle list.
///
/// Triangles keep their declared winding. A quad `(i0, i1, i2, i3)` becomes
/// `(i0, i1, i2)` followed by `(i0, i2, i3)`. Any out-of-range attribute
/// index fails the whole assembly.
pub fn assemble(model: &Model, report_corners: bool) -> AssetResult<(MeshData, Option<CornerReport>)> {
    let quads = model.faces.iter().filter(|f| f.is_quad()).count();
    let mut vertices = Vec::with_capacity((model.faces.len() + quads) * 3);

    for (face_no, face) in model.faces.iter().enumerate() {
        let v0 = resolve(model, &face.i0, face_no)?;
        let v1 = resolve(model, &face.i1, face_no)?;
        let v2 = resolve(model, &face.i2, face_no)?;
        vertices.extend_from_slice(&[v0, v1, v2]);

        if let Some(i3) = &face.i3 {
            let v3 = resolve(model, i3, face_no)?;
            vertices.extend_from_slice(&[v0, v2, v3]);
        }
    }

    let report = report_corners.then(|| CornerReport::from_vertices(&vertices));
    Ok((MeshData::new(vertices), report))
}

fn resolve(model: &Model, corner: &FaceCorner, face_no: usize) -> AssetResult<Vertex> {
    let out_of_range = |attribute, index, len| AssetError::Index {
        attribute,
        index,
        len,
        face: face_no,
    };

    let p = model.positions.get(corner.vertex).ok_or_else(|| {
        out_of_range(Attribute::Position, corner.vertex, model.positions.len())
    })?;

    let normal = match corner.normal {
        Some(i) => {
            let n = model
                .normals
                .get(i)
                .ok_or_else(|| out_of_range(Attribute::Normal, i, model.normals.len()))?;
            [n.nx, n.ny, n.nz]
        }
        None => Vertex::DEFAULT_NORMAL,
    };

    let uv = match corner.uv {
        Some(i) => {
            let t = model
                .uvs
                .get(i)
                .ok_or_else(|| out_of_range(Attribute::Uv, i, model.uvs.len()))?;
            [t.u, t.v]
        }
        None => Vertex::DEFAULT_UV,
    };

    Ok(Vertex::new([p.x, p.y, p.z], normal, uv))
}

/// Parse and assemble an OBJ file in one step.
pub fn load_mesh(
    path: impl AsRef<Path>,
    report_corners: bool,
) -> AssetResult<(MeshData, Option<CornerReport>)> {
    let model = obj::load_obj_from_path(path)?;
    assemble(&model, report_corners)
}
