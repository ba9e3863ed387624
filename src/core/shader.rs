//! 最简着色约定：一个组合变换矩阵 + 一个RGB颜色，无光照

use crate::core::frame_buffer::color_to_u8;
use nalgebra::{Matrix4, Vector3};

/// 纯色着色器的 uniform
#[derive(Debug, Clone, Copy)]
pub struct FlatShader {
    /// projection * view * model
    pub mvp: Matrix4<f32>,
    pub color: Vector3<f32>,
}

impl FlatShader {
    pub fn new(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
        color: Vector3<f32>,
    ) -> Self {
        Self {
            mvp: projection * view * model,
            color,
        }
    }

    /// 片元输出（整面同色）
    pub fn fragment(&self) -> [u8; 3] {
        color_to_u8(&self.color)
    }
}
