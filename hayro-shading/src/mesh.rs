//! Decoding the vertex and patch streams of mesh-based shadings.
//!
//! All decoders are lenient: if the stream ends in the middle of a record, the
//! records decoded so far are returned and the rest is ignored.

use crate::color::ColorComponents;
use crate::error::{DecodeError, Result};
use crate::patch::{Patch, PatchKind};
use crate::settings::{RasterSettings, ShadingWarning};
use crate::shading::MeshLayout;
use hayro_common::bit::{BitReader, BitSize, interpolate};
use kurbo::{Affine, Point};
use log::{debug, warn};
use smallvec::{SmallVec, smallvec};

/// A vertex of a triangle mesh, in device space.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    /// The position of the vertex.
    pub point: Point,
    /// The color of the vertex.
    pub color: ColorComponents,
}

/// The validated bit widths and decode ranges of a mesh stream.
#[derive(Debug, Clone)]
pub(crate) struct MeshFormat {
    coord_bits: BitSize,
    comp_bits: BitSize,
    flag_bits: Option<BitSize>,
    x_range: [f64; 2],
    y_range: [f64; 2],
    comp_ranges: SmallVec<[[f64; 2]; 4]>,
}

impl MeshFormat {
    /// Validate the layout of a mesh whose vertices have `num_components` color components.
    pub(crate) fn new(layout: &MeshLayout, num_components: usize, has_flags: bool) -> Result<Self> {
        let bit_size = |bits: u8| BitSize::from_u8(bits).ok_or(DecodeError::InvalidBitSize(bits));

        let coord_bits = bit_size(layout.bits_per_coordinate)?;
        let comp_bits = bit_size(layout.bits_per_component)?;
        let flag_bits = if has_flags {
            Some(bit_size(layout.bits_per_flag)?)
        } else {
            None
        };

        let ([x_min, x_max, y_min, y_max], rest) = layout
            .decode
            .split_first_chunk::<4>()
            .ok_or(DecodeError::InvalidDecodeArray)?;

        if num_components == 0 || rest.len() < num_components * 2 {
            return Err(DecodeError::InvalidDecodeArray);
        }

        let comp_ranges = rest
            .chunks_exact(2)
            .take(num_components)
            .map(|r| [r[0] as f64, r[1] as f64])
            .collect();

        Ok(Self {
            coord_bits,
            comp_bits,
            flag_bits,
            x_range: [*x_min as f64, *x_max as f64],
            y_range: [*y_min as f64, *y_max as f64],
            comp_ranges,
        })
    }
}

struct MeshReader<'a> {
    reader: BitReader<'a>,
    format: &'a MeshFormat,
    transform: Affine,
}

impl<'a> MeshReader<'a> {
    fn new(data: &'a [u8], format: &'a MeshFormat, transform: Affine) -> Self {
        Self {
            reader: BitReader::new(data),
            format,
            transform,
        }
    }

    /// Whether only the padding of the last byte is left.
    fn at_end(&self) -> bool {
        self.reader.remaining_bits() < 8
    }

    fn align(&mut self) {
        self.reader.align();
    }

    fn read_flag(&mut self) -> Option<u32> {
        Some(self.reader.read(self.format.flag_bits?)? & 3)
    }

    /// Read a coordinate pair and transform it into device space.
    fn read_point(&mut self) -> Option<Point> {
        let bits = self.format.coord_bits;
        let [x_min, x_max] = self.format.x_range;
        let [y_min, y_max] = self.format.y_range;

        let x = interpolate(self.reader.read(bits)?, bits.max_value(), x_min, x_max);
        let y = interpolate(self.reader.read(bits)?, bits.max_value(), y_min, y_max);

        Some(self.transform * Point::new(x, y))
    }

    fn read_color(&mut self) -> Option<ColorComponents> {
        let format = self.format;
        let bits = format.comp_bits;
        let mut color = ColorComponents::new();

        for [min, max] in &format.comp_ranges {
            let value = interpolate(self.reader.read(bits)?, bits.max_value(), *min, *max);
            color.push(value as f32);
        }

        Some(color)
    }

    /// Read a vertex of a triangle mesh, excluding the flag.
    ///
    /// Each vertex starts at a byte boundary.
    fn read_vertex(&mut self) -> Option<Vertex> {
        let point = self.read_point()?;
        let color = self.read_color()?;
        self.align();

        Some(Vertex { point, color })
    }
}

fn report_truncation(settings: &RasterSettings) {
    debug!("mesh stream ended in the middle of a record");
    settings.report(ShadingWarning::TruncatedStream);
}

fn report_missing_predecessor(settings: &RasterSettings) {
    warn!("first record of mesh references a previous record, skipping it");
    settings.report(ShadingWarning::MissingPredecessor);
}

/// Decode the triangles of a free-form triangle mesh (shading type 4).
pub(crate) fn decode_free_form(
    data: &[u8],
    format: &MeshFormat,
    transform: Affine,
    settings: &RasterSettings,
) -> Vec<[Vertex; 3]> {
    let mut reader = MeshReader::new(data, format, transform);
    let mut triangles: Vec<[Vertex; 3]> = vec![];

    while !reader.at_end() {
        let Some(flag) = reader.read_flag() else {
            report_truncation(settings);
            break;
        };

        if flag == 0 {
            let Some(triangle) = read_free_triangle(&mut reader, settings) else {
                report_truncation(settings);
                break;
            };

            triangles.push(triangle);
            continue;
        }

        let Some(vertex) = reader.read_vertex() else {
            report_truncation(settings);
            break;
        };

        let triangle = match (flag, triangles.last()) {
            (1, Some([_, b, c])) => [b.clone(), c.clone(), vertex],
            (2, Some([a, _, c])) => [a.clone(), c.clone(), vertex],
            (1 | 2, None) => {
                report_missing_predecessor(settings);
                continue;
            }
            _ => {
                warn!("invalid flag {flag} in free-form triangle mesh, skipping vertex");
                settings.report(ShadingWarning::InvalidFlag);
                continue;
            }
        };

        triangles.push(triangle);
    }

    debug!("decoded {} triangles from free-form mesh", triangles.len());

    triangles
}

/// Read a triangle whose first flag was zero. The flags of the second and third
/// vertex are read, but ignored.
fn read_free_triangle(reader: &mut MeshReader<'_>, settings: &RasterSettings) -> Option<[Vertex; 3]> {
    let first = reader.read_vertex()?;

    let mut read_next = || {
        let flag = reader.read_flag()?;

        if flag != 0 {
            warn!("ignoring flag {flag} inside of a free-form triangle");
            settings.report(ShadingWarning::InvalidFlag);
        }

        reader.read_vertex()
    };

    let second = read_next()?;
    let third = read_next()?;

    Some([first, second, third])
}

/// Decode the triangles of a lattice-form triangle mesh (shading type 5).
pub(crate) fn decode_lattice(
    data: &[u8],
    format: &MeshFormat,
    transform: Affine,
    vertices_per_row: u32,
    settings: &RasterSettings,
) -> Vec<[Vertex; 3]> {
    let mut reader = MeshReader::new(data, format, transform);
    let mut vertices = vec![];

    while !reader.at_end() {
        let Some(vertex) = reader.read_vertex() else {
            report_truncation(settings);
            break;
        };

        vertices.push(vertex);
    }

    let per_row = vertices_per_row as usize;

    if per_row < 2 {
        return vec![];
    }

    let num_rows = vertices.len() / per_row;

    if vertices.len() % per_row != 0 {
        debug!(
            "dropping {} vertices of incomplete lattice row",
            vertices.len() % per_row
        );
    }

    if num_rows < 2 {
        debug!("lattice-form mesh has fewer than two rows");
        return vec![];
    }

    let rows = vertices.chunks_exact(per_row).take(num_rows).collect::<Vec<_>>();
    let mut triangles = Vec::with_capacity((num_rows - 1) * (per_row - 1) * 2);

    for pair in rows.windows(2) {
        let (top, bottom) = (pair[0], pair[1]);

        for j in 0..per_row - 1 {
            triangles.push([top[j].clone(), top[j + 1].clone(), bottom[j].clone()]);
            triangles.push([top[j + 1].clone(), bottom[j].clone(), bottom[j + 1].clone()]);
        }
    }

    debug!("decoded {} triangles from lattice-form mesh", triangles.len());

    triangles
}

/// Decode the patches of a Coons (shading type 6) or tensor-product (shading type 7)
/// patch mesh.
///
/// Unlike the vertices of triangle meshes, patches are packed without any padding.
pub(crate) fn decode_patches(
    data: &[u8],
    format: &MeshFormat,
    transform: Affine,
    kind: PatchKind,
    settings: &RasterSettings,
) -> Vec<Patch> {
    let mut reader = MeshReader::new(data, format, transform);
    let mut patches: Vec<Patch> = vec![];

    while !reader.at_end() {
        let Some(flag) = reader.read_flag() else {
            report_truncation(settings);
            break;
        };

        let implicit = if flag == 0 { 0 } else { 4 };
        let Some((points, colors)) = read_patch_data(&mut reader, kind, implicit) else {
            report_truncation(settings);
            break;
        };

        let patch = if flag == 0 {
            Patch::from_stream(kind, &points, colors)
        } else if let Some(edge) = patches.last().and_then(|p| p.edge(flag)) {
            let mut all_points = edge.points.to_vec();
            all_points.extend(points);
            let [c0, c1] = edge.colors;
            let mut all_colors: SmallVec<[ColorComponents; 4]> = smallvec![c0, c1];
            all_colors.extend(colors);

            Patch::from_stream(kind, &all_points, all_colors)
        } else {
            report_missing_predecessor(settings);
            continue;
        };

        match patch {
            Some(patch) => patches.push(patch),
            None => debug!("skipping incomplete patch"),
        }
    }

    debug!("decoded {} patches", patches.len());

    patches
}

/// Read the explicit control points and corner colors of a patch, skipping the
/// `implicit` points that are inherited from the previous patch.
fn read_patch_data(
    reader: &mut MeshReader<'_>,
    kind: PatchKind,
    implicit: usize,
) -> Option<(Vec<Point>, SmallVec<[ColorComponents; 4]>)> {
    let num_points = kind.num_points() - implicit;
    let num_colors = if implicit == 0 { 4 } else { 2 };

    let mut points = Vec::with_capacity(num_points);

    for _ in 0..num_points {
        points.push(reader.read_point()?);
    }

    let mut colors = SmallVec::new();

    for _ in 0..num_colors {
        colors.push(reader.read_color()?);
    }

    Some((points, colors))
}
