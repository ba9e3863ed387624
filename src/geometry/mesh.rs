//! # 程序化网格生成
//!
//! 所有网格都是"三角形汤"：无索引、无法线、无纹理坐标，
//! 每连续三个顶点构成一个三角形。

use log::{debug, warn};
use nalgebra::Point3;
use std::collections::TryReserveError;
use std::f32::consts::PI;
use thiserror::Error;

/// 球体与圆锥的固定半径
pub const SHAPE_RADIUS: f32 = 0.5;

/// 圆锥高度（底面 y = -0.5，顶点 y = +0.5）
pub const CONE_HEIGHT: f32 = 1.0;

/// 网格生成失败的原因
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("顶点数量溢出: {lat} x {lon} 个分段")]
    TooManyVertices { lat: u32, lon: u32 },

    #[error("无法为 {vertices} 个顶点分配缓冲区: {source}")]
    Allocation {
        vertices: usize,
        #[source]
        source: TryReserveError,
    },
}

/// 三角形汤形式的顶点缓冲
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Point3<f32>>,
}

impl MeshData {
    /// 预先申请恰好 `vertices` 个顶点的空间，失败时返回错误而不是中止
    fn with_exact_capacity(vertices: usize) -> Result<Self, MeshError> {
        let mut positions = Vec::new();
        positions
            .try_reserve_exact(vertices)
            .map_err(|source| MeshError::Allocation { vertices, source })?;
        Ok(Self { positions })
    }

    /// 从静态顶点表构造
    pub fn from_table(table: &[[f32; 3]]) -> Self {
        Self {
            positions: table.iter().map(|&[x, y, z]| Point3::new(x, y, z)).collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

// ===== 静态形状表 =====

#[rustfmt::skip]
pub const CUBE_VERTICES: [[f32; 3]; 36] = [
    // 前
    [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5],
    [-0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
    // 后
    [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5],
    [-0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
    // 左
    [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5],
    [-0.5, -0.5, -0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
    // 右
    [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
    [ 0.5, -0.5, -0.5], [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5],
    // 上
    [-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5],
    [-0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5],
    // 下
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5],
    [-0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
];

/// Y轴向上的金字塔：底面 y = -0.5，顶点 (0, 0.5, 0)
#[rustfmt::skip]
pub const PYRAMID_VERTICES: [[f32; 3]; 18] = [
    // 底面
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5],
    [-0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    // 侧面
    [-0.5, -0.5,  0.5], [ 0.0,  0.5,  0.0], [ 0.5, -0.5,  0.5],
    [ 0.5, -0.5,  0.5], [ 0.0,  0.5,  0.0], [ 0.5, -0.5, -0.5],
    [ 0.5, -0.5, -0.5], [ 0.0,  0.5,  0.0], [-0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5], [ 0.0,  0.5,  0.0], [-0.5, -0.5,  0.5],
];

/// Z轴向上的金字塔：底面 z = -0.5，顶点 (0, 0, 0.5)
#[rustfmt::skip]
pub const PYRAMID_Z_UP_VERTICES: [[f32; 3]; 18] = [
    // 底面
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5],
    [-0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
    // 侧面
    [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.0,  0.0,  0.5],
    [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.0,  0.0,  0.5],
    [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.0,  0.0,  0.5],
    [-0.5,  0.5, -0.5], [-0.5, -0.5, -0.5], [ 0.0,  0.0,  0.5],
];

pub fn cube() -> MeshData {
    MeshData::from_table(&CUBE_VERTICES)
}

pub fn pyramid() -> MeshData {
    MeshData::from_table(&PYRAMID_VERTICES)
}

pub fn pyramid_z_up() -> MeshData {
    MeshData::from_table(&PYRAMID_Z_UP_VERTICES)
}

// ===== 程序化形状 =====

/// 球面坐标 -> 笛卡尔坐标（Y轴为极轴）
#[inline]
fn spherical_point(theta: f32, phi: f32) -> Point3<f32> {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let (sin_phi, cos_phi) = phi.sin_cos();
    Point3::new(
        SHAPE_RADIUS * sin_theta * cos_phi,
        SHAPE_RADIUS * cos_theta,
        SHAPE_RADIUS * sin_theta * sin_phi,
    )
}

/// 生成UV球体
///
/// θ 在 [0, π] 上均分为 `lat_segments` 段，φ 在 [0, 2π] 上均分为 `lon_segments` 段。
/// 每个网格单元的四个角为 1=(θ₁,φ₁)、2=(θ₂,φ₁)、3=(θ₂,φ₂)、4=(θ₁,φ₂)，
/// 输出三角形 1-2-3 与 1-3-4，按纬度优先顺序追加。
///
/// 任一分段数为0时返回空网格。
pub fn generate_sphere(lat_segments: u32, lon_segments: u32) -> Result<MeshData, MeshError> {
    if lat_segments == 0 || lon_segments == 0 {
        warn!(
            "球体分段数无效 ({} x {})，生成空网格",
            lat_segments, lon_segments
        );
        return Ok(MeshData::default());
    }

    let vertex_count = (lat_segments as usize)
        .checked_mul(lon_segments as usize)
        .and_then(|cells| cells.checked_mul(6))
        .ok_or(MeshError::TooManyVertices {
            lat: lat_segments,
            lon: lon_segments,
        })?;

    let mut mesh = MeshData::with_exact_capacity(vertex_count)?;

    for lat in 0..lat_segments {
        let theta1 = lat as f32 / lat_segments as f32 * PI;
        let theta2 = (lat + 1) as f32 / lat_segments as f32 * PI;

        for lon in 0..lon_segments {
            let phi1 = lon as f32 / lon_segments as f32 * 2.0 * PI;
            let phi2 = (lon + 1) as f32 / lon_segments as f32 * 2.0 * PI;

            let p1 = spherical_point(theta1, phi1);
            let p2 = spherical_point(theta2, phi1);
            let p3 = spherical_point(theta2, phi2);
            let p4 = spherical_point(theta1, phi2);

            mesh.positions.extend_from_slice(&[p1, p2, p3, p1, p3, p4]);
        }
    }

    debug!(
        "生成球体: {} x {} 分段, {} 个顶点",
        lat_segments,
        lon_segments,
        mesh.vertex_count()
    );
    Ok(mesh)
}

/// 生成圆锥：顶点 (0, 0.5, 0)，底面圆心 (0, -0.5, 0)
///
/// 每个分段输出一个侧面三角形和一个底面三角形。分段数为0时返回空网格。
pub fn generate_cone(segments: u32) -> Result<MeshData, MeshError> {
    if segments == 0 {
        warn!("圆锥分段数为0，生成空网格");
        return Ok(MeshData::default());
    }

    let vertex_count = (segments as usize)
        .checked_mul(6)
        .ok_or(MeshError::TooManyVertices {
            lat: 1,
            lon: segments,
        })?;

    let mut mesh = MeshData::with_exact_capacity(vertex_count)?;

    let half_height = CONE_HEIGHT * 0.5;
    let apex = Point3::new(0.0, half_height, 0.0);
    let base_center = Point3::new(0.0, -half_height, 0.0);
    let rim = |i: u32| {
        let phi = i as f32 / segments as f32 * 2.0 * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();
        Point3::new(SHAPE_RADIUS * cos_phi, -half_height, SHAPE_RADIUS * sin_phi)
    };

    for i in 0..segments {
        let a = rim(i);
        let b = rim(i + 1);
        // 侧面
        mesh.positions.extend_from_slice(&[a, apex, b]);
        // 底面
        mesh.positions.extend_from_slice(&[base_center, a, b]);
    }

    debug!("生成圆锥: {} 分段, {} 个顶点", segments, mesh.vertex_count());
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point3<f32>, b: Point3<f32>) {
        assert!((a - b).norm() < 1e-5, "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_static_table_counts() {
        assert_eq!(cube().vertex_count(), 36);
        assert_eq!(cube().triangle_count(), 12);
        assert_eq!(pyramid().vertex_count(), 18);
        assert_eq!(pyramid().triangle_count(), 6);
        assert_eq!(pyramid_z_up().triangle_count(), 6);
    }

    #[test]
    fn test_cube_fits_unit_box() {
        for p in &cube().positions {
            assert!(p.coords.iter().all(|c| c.abs() <= 0.5));
        }
    }

    #[test]
    fn test_pyramid_apex_orientation() {
        let y_top = pyramid()
            .positions
            .iter()
            .filter(|p| p.y > 0.0)
            .count();
        let z_top = pyramid_z_up()
            .positions
            .iter()
            .filter(|p| p.z > 0.0)
            .count();
        // 四个侧面各含一次顶点
        assert_eq!(y_top, 4);
        assert_eq!(z_top, 4);
    }

    #[test]
    fn test_sphere_counts() {
        for (lat, lon) in [(1, 1), (3, 7), (20, 20)] {
            let mesh = generate_sphere(lat, lon).unwrap();
            let expected = (lat * lon * 6) as usize;
            assert_eq!(mesh.vertex_count(), expected);
            assert_eq!(mesh.vertex_count() % 3, 0);
        }
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = generate_sphere(20, 20).unwrap();
        for p in &mesh.positions {
            assert!((p.coords.norm() - SHAPE_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_zero_segments_is_empty() {
        assert!(generate_sphere(0, 10).unwrap().is_empty());
        assert!(generate_sphere(10, 0).unwrap().is_empty());
        assert!(generate_sphere(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_sphere_is_deterministic() {
        let bits = |mesh: MeshData| -> Vec<u32> {
            mesh.positions
                .iter()
                .flat_map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
                .collect()
        };
        let a = bits(generate_sphere(9, 13).unwrap());
        let b = bits(generate_sphere(9, 13).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_cell_sphere() {
        let mesh = generate_sphere(1, 1).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 2);

        let p1 = spherical_point(0.0, 0.0);
        let p2 = spherical_point(PI, 0.0);
        let p3 = spherical_point(PI, 2.0 * PI);
        let p4 = spherical_point(0.0, 2.0 * PI);

        let first = &mesh.positions[0..3];
        assert_close(first[0], p1);
        assert_close(first[1], p2);
        assert_close(first[2], p3);

        let second = &mesh.positions[3..6];
        assert_close(second[0], p1);
        assert_close(second[1], p3);
        assert_close(second[2], p4);

        // 北极与南极
        assert_close(p1, Point3::new(0.0, 0.5, 0.0));
        assert_close(p2, Point3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn test_sphere_latitude_major_order() {
        let mesh = generate_sphere(2, 4).unwrap();
        // 前 4 个单元（24 个顶点）都属于北半球的第一条纬度带
        for p in &mesh.positions[..24] {
            assert!(p.y >= -1e-6);
        }
        for p in &mesh.positions[24..] {
            assert!(p.y <= 1e-6);
        }
    }

    #[test]
    fn test_cone() {
        let mesh = generate_cone(16).unwrap();
        assert_eq!(mesh.vertex_count(), 16 * 6);
        let apex = Point3::new(0.0, 0.5, 0.0);
        assert_eq!(mesh.positions.iter().filter(|p| **p == apex).count(), 16);
        for p in &mesh.positions {
            assert!(p.y >= -0.5 - 1e-6 && p.y <= 0.5 + 1e-6);
        }
        assert!(generate_cone(0).unwrap().is_empty());
    }

    #[test]
    fn test_sphere_vertex_count_overflow() {
        let result = generate_sphere(u32::MAX, u32::MAX);
        assert!(matches!(
            result,
            Err(MeshError::TooManyVertices {
                lat: u32::MAX,
                lon: u32::MAX
            })
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_sphere_allocation_failure() {
        // 2^48 * 6 个顶点不会溢出 usize，但远超可寻址内存
        let result = generate_sphere(1 << 24, 1 << 24);
        match result {
            Err(MeshError::Allocation { vertices, .. }) => {
                assert_eq!(vertices, (1usize << 48) * 6);
            }
            other => panic!("expected allocation error, got {:?}", other.map(|m| m.vertex_count())),
        }
    }

    #[cfg(target_pointer_width = "32")]
    #[test]
    fn test_cone_vertex_count_overflow() {
        assert!(matches!(
            generate_cone(u32::MAX),
            Err(MeshError::TooManyVertices { .. })
        ));
    }
}
