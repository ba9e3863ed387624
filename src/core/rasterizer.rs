use crate::core::frame_buffer::FrameBuffer;
use nalgebra::{Point2, Point3, Vector3};
use std::sync::atomic::Ordering;

const EPSILON: f32 = 1e-5;

/// 屏幕空间中的三角形：像素坐标 (x, y) + NDC 深度 z
#[derive(Debug, Clone, Copy)]
pub struct ScreenTriangle {
    pub v1: Point3<f32>,
    pub v2: Point3<f32>,
    pub v3: Point3<f32>,
}

/// 计算点 p 相对于二维三角形 (v1, v2, v3) 的重心坐标 (alpha, beta, gamma)
///
/// 退化三角形返回 None。
pub fn barycentric_coordinates(
    p: Point2<f32>,
    v1: Point2<f32>,
    v2: Point2<f32>,
    v3: Point2<f32>,
) -> Option<Vector3<f32>> {
    let e1 = v2 - v1;
    let e2 = v3 - v1;
    let p_v1 = p - v1;

    let total_area_x2 = e1.x * e2.y - e1.y * e2.x;
    if total_area_x2.abs() < EPSILON {
        return None;
    }

    let inv_total_area_x2 = 1.0 / total_area_x2;
    let beta = (p_v1.x * e2.y - p_v1.y * e2.x) * inv_total_area_x2;
    let gamma = (e1.x * p_v1.y - e1.y * p_v1.x) * inv_total_area_x2;
    let alpha = 1.0 - beta - gamma;

    Some(Vector3::new(alpha, beta, gamma))
}

#[inline(always)]
pub fn is_inside_triangle(bary: Vector3<f32>) -> bool {
    bary.x >= -EPSILON && bary.y >= -EPSILON && bary.z >= -EPSILON
}

/// 光栅化单个三角形，整面使用同一颜色
///
/// NDC 深度在屏幕空间中是仿射的，可以直接用重心坐标线性插值。
/// 深度缓冲使用原子 fetch_min，只有成功更新深度的线程才写颜色。
pub fn rasterize_triangle(
    triangle: &ScreenTriangle,
    rgb: [u8; 3],
    frame_buffer: &FrameBuffer,
    use_zbuffer: bool,
) {
    let width = frame_buffer.width;
    let height = frame_buffer.height;
    let (a, b, c) = (triangle.v1, triangle.v2, triangle.v3);

    // 1. 包围盒
    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as usize;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as usize;
    let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32) as usize;
    let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32) as usize;

    if max_x <= min_x || max_y <= min_y {
        return;
    }

    let (p1, p2, p3) = (a.xy(), b.xy(), c.xy());
    if barycentric_coordinates(p1, p1, p2, p3).is_none() {
        return;
    }

    // 2. 遍历包围盒中的像素中心
    for y in min_y..max_y {
        for x in min_x..max_x {
            let pixel_center = Point2::new(x as f32 + 0.5, y as f32 + 0.5);

            let Some(bary) = barycentric_coordinates(pixel_center, p1, p2, p3) else {
                continue;
            };
            if !is_inside_triangle(bary) {
                continue;
            }

            // 3. 插值深度，超出 [-1, 1] 的片元被近/远平面裁掉
            let depth = bary.x * a.z + bary.y * b.z + bary.z * c.z;
            if !(-1.0..=1.0).contains(&depth) {
                continue;
            }

            let pixel_index = y * width + x;

            // 4. 深度测试
            if use_zbuffer {
                let previous =
                    frame_buffer.depth_buffer[pixel_index].fetch_min(depth, Ordering::Relaxed);
                if previous <= depth {
                    continue;
                }
            }

            frame_buffer.write_color(pixel_index, rgb);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(v1: [f32; 3], v2: [f32; 3], v3: [f32; 3]) -> ScreenTriangle {
        ScreenTriangle {
            v1: Point3::from(v1),
            v2: Point3::from(v2),
            v3: Point3::from(v3),
        }
    }

    #[test]
    fn barycentric_of_vertices() {
        let (v1, v2, v3) = (
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(0.0, 4.0),
        );
        let b = barycentric_coordinates(v2, v1, v2, v3).unwrap();
        assert!((b - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert!(barycentric_coordinates(v1, v1, v1, v3).is_none());
    }

    #[test]
    fn fills_covered_pixels_only() {
        let fb = FrameBuffer::new(8, 8);
        let t = tri([0.0, 0.0, 0.0], [8.0, 0.0, 0.0], [0.0, 8.0, 0.0]);
        rasterize_triangle(&t, [255, 0, 0], &fb, true);

        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0]));
        assert_eq!(fb.pixel(7, 7), Some([0, 0, 0]));
    }

    #[test]
    fn nearer_triangle_wins_regardless_of_order() {
        let fb = FrameBuffer::new(8, 8);
        let near = tri([0.0, 0.0, -0.5], [8.0, 0.0, -0.5], [0.0, 8.0, -0.5]);
        let far = tri([0.0, 0.0, 0.5], [8.0, 0.0, 0.5], [0.0, 8.0, 0.5]);

        rasterize_triangle(&near, [0, 255, 0], &fb, true);
        rasterize_triangle(&far, [0, 0, 255], &fb, true);
        assert_eq!(fb.pixel(1, 1), Some([0, 255, 0]));

        // 关闭深度测试时后画的覆盖先画的
        rasterize_triangle(&far, [0, 0, 255], &fb, false);
        assert_eq!(fb.pixel(1, 1), Some([0, 0, 255]));
    }

    #[test]
    fn fragments_beyond_far_plane_are_dropped() {
        let fb = FrameBuffer::new(8, 8);
        let t = tri([0.0, 0.0, 1.5], [8.0, 0.0, 1.5], [0.0, 8.0, 1.5]);
        rasterize_triangle(&t, [255, 255, 255], &fb, true);
        assert_eq!(fb.pixel(1, 1), Some([0, 0, 0]));
    }
}
