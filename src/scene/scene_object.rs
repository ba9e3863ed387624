use crate::core::renderer::MeshHandle;
use crate::geometry::mesh::{self, MeshData, MeshError};
use crate::geometry::transform::TransformFactory;
use nalgebra::{Matrix4, Vector3};

/// 场景中可放置的形状
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Cube,
    /// Y轴向上的金字塔
    Pyramid,
    /// Z轴向上的金字塔
    PyramidZUp,
    Sphere { lat_segments: u32, lon_segments: u32 },
    Cone { segments: u32 },
}

impl ShapeKind {
    /// 生成该形状的顶点数据，所有权交给调用方
    pub fn build_mesh(self) -> Result<MeshData, MeshError> {
        match self {
            ShapeKind::Cube => Ok(mesh::cube()),
            ShapeKind::Pyramid => Ok(mesh::pyramid()),
            ShapeKind::PyramidZUp => Ok(mesh::pyramid_z_up()),
            ShapeKind::Sphere {
                lat_segments,
                lon_segments,
            } => mesh::generate_sphere(lat_segments, lon_segments),
            ShapeKind::Cone { segments } => mesh::generate_cone(segments),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShapeKind::Cube => "立方体",
            ShapeKind::Pyramid | ShapeKind::PyramidZUp => "金字塔",
            ShapeKind::Sphere { .. } => "球体",
            ShapeKind::Cone { .. } => "圆锥",
        }
    }
}

/// 场景对象：一个已上传的网格 + 纯色 + 沿X轴的固定偏移
///
/// 只有单层平移，没有父子层级。
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub shape: ShapeKind,
    pub mesh: MeshHandle,
    /// 线性RGB颜色，分量范围 [0, 1]
    pub color: Vector3<f32>,
    pub offset_x: f32,
}

impl SceneObject {
    /// 模型矩阵（模型空间 -> 世界空间）
    pub fn model_matrix(&self) -> Matrix4<f32> {
        TransformFactory::translation_x(self.offset_x)
    }
}
