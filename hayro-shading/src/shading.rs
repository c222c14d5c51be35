//! Descriptions of PDF shadings.

use crate::color::{ColorComponents, ColorSpace};
use crate::error::{DecodeError, Result};
use crate::function::ShadingFunction;
use kurbo::Rect;
use std::sync::Arc;

/// The layout of the vertex data of a mesh-based shading.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshLayout {
    /// The number of bits used to represent each vertex coordinate.
    pub bits_per_coordinate: u8,
    /// The number of bits used to represent each color component.
    pub bits_per_component: u8,
    /// The number of bits used to represent the edge flag of a record.
    ///
    /// Ignored for lattice-form meshes, which don't have flags.
    pub bits_per_flag: u8,
    /// The decode ranges `[x_min x_max y_min y_max c1_min c1_max ...]`.
    ///
    /// If the shading has a function, only a single color range is used.
    pub decode: Vec<f32>,
}

/// A type of shading.
#[derive(Debug, Clone, PartialEq)]
pub enum ShadingType {
    /// An axial shading.
    Axial {
        /// The starting and ending point of the axis `[x0 y0 x1 y1]`, in shading space.
        coords: [f32; 4],
        /// The parametric domain `[t0 t1]` that is mapped onto the axis.
        domain: [f32; 2],
        /// Whether to extend the shading beyond the starting and ending point.
        extend: [bool; 2],
    },
    /// A free-form triangle mesh (shading type 4).
    FreeFormTriangleMesh(MeshLayout),
    /// A lattice-form triangle mesh (shading type 5).
    LatticeFormTriangleMesh {
        /// The layout of the vertex data.
        layout: MeshLayout,
        /// The number of vertices in each row of the lattice.
        vertices_per_row: u32,
    },
    /// A Coons patch mesh (shading type 6).
    CoonsPatchMesh(MeshLayout),
    /// A tensor-product patch mesh (shading type 7).
    TensorProductPatchMesh(MeshLayout),
}

impl ShadingType {
    /// The layout of the vertex data, if this is a mesh-based shading.
    pub fn mesh_layout(&self) -> Option<&MeshLayout> {
        match self {
            Self::Axial { .. } => None,
            Self::FreeFormTriangleMesh(layout)
            | Self::LatticeFormTriangleMesh { layout, .. }
            | Self::CoonsPatchMesh(layout)
            | Self::TensorProductPatchMesh(layout) => Some(layout),
        }
    }
}

/// A shading, as it is defined in a PDF file.
///
/// Coordinates are given in shading space. The transform into device space is
/// provided when creating a [`ShadingRasterizer`](crate::ShadingRasterizer).
#[derive(Clone)]
pub struct ShadingDescriptor {
    /// The type of the shading.
    pub shading_type: ShadingType,
    /// The color space of the shading.
    pub color_space: Arc<dyn ColorSpace>,
    /// The color to use for areas outside of the shading, in the components of the color space.
    pub background: Option<ColorComponents>,
    /// The bounding box of the shading, in shading space.
    pub bbox: Option<Rect>,
    /// The function mapping parametric values to color components.
    ///
    /// Required for axial shadings, optional for mesh-based shadings.
    pub function: Option<Arc<dyn ShadingFunction>>,
}

impl ShadingDescriptor {
    /// Create a new descriptor without background, bounding box and function.
    pub fn new(shading_type: ShadingType, color_space: Arc<dyn ColorSpace>) -> Self {
        Self {
            shading_type,
            color_space,
            background: None,
            bbox: None,
            function: None,
        }
    }

    /// Set the background color.
    pub fn with_background(mut self, background: ColorComponents) -> Self {
        self.background = Some(background);
        self
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: Rect) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the function.
    pub fn with_function(mut self, function: Arc<dyn ShadingFunction>) -> Self {
        self.function = Some(function);
        self
    }

    /// The number of color components stored for each vertex.
    ///
    /// This is one if the colors are mapped through a function.
    pub fn num_vertex_components(&self) -> usize {
        if self.function.is_some() {
            1
        } else {
            self.color_space.num_components()
        }
    }

    /// Check the parts of the descriptor that don't depend on the shading type.
    pub(crate) fn validate(&self) -> Result<()> {
        if let Some(background) = &self.background
            && background.len() != self.color_space.num_components()
        {
            return Err(DecodeError::ComponentMismatch);
        }

        // Only meshes carry their colors in the vertex data.
        if self.shading_type.mesh_layout().is_none() && self.function.is_none() {
            return Err(DecodeError::MissingFunction);
        }

        if let ShadingType::LatticeFormTriangleMesh {
            vertices_per_row, ..
        } = self.shading_type
            && vertices_per_row < 2
        {
            return Err(DecodeError::InvalidVerticesPerRow(vertices_per_row));
        }

        Ok(())
    }
}

impl core::fmt::Debug for ShadingDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ShadingDescriptor")
            .field("shading_type", &self.shading_type)
            .field("num_components", &self.color_space.num_components())
            .field("background", &self.background)
            .field("bbox", &self.bbox)
            .field("has_function", &self.function.is_some())
            .finish()
    }
}
