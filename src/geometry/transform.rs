use nalgebra::{Matrix4, Point3, Unit, Vector3, Vector4};

/// 变换矩阵工厂，提供创建各种变换矩阵的静态方法
pub struct TransformFactory;
impl TransformFactory {
    /// 创建平移矩阵
    pub fn translation(translation: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(translation)
    }

    /// 创建只沿X轴平移的矩阵（场景中三个物体的摆放方式）
    pub fn translation_x(offset: f32) -> Matrix4<f32> {
        Self::translation(&Vector3::new(offset, 0.0, 0.0))
    }

    /// 创建视图矩阵 (lookAt)
    ///
    /// 由 eye/center/up 构造正交基，再取逆得到 世界 -> 相机 的变换。
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, target, &Unit::new_normalize(*up))
    }

    /// 创建透视投影矩阵
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect_ratio, fov_y_rad, near, far)
    }
}

/// 将模型坐标点转换为裁剪空间坐标（齐次坐标）
pub fn world_to_clip(points: &[Point3<f32>], mvp: &Matrix4<f32>) -> Vec<Vector4<f32>> {
    points
        .iter()
        .map(|point| mvp * point.to_homogeneous())
        .collect()
}

/// 将裁剪空间坐标转换为NDC坐标（透视除法）
///
/// w 不为正的点位于相机背后，返回 None，由调用方丢弃整个三角形。
pub fn clip_to_ndc(clip: &Vector4<f32>) -> Option<Point3<f32>> {
    if clip.w > 1e-6 {
        Some(Point3::new(clip.x / clip.w, clip.y / clip.w, clip.z / clip.w))
    } else {
        None
    }
}

/// 将NDC坐标转换为屏幕像素坐标
pub fn ndc_to_pixel(ndc: &Point3<f32>, width: f32, height: f32) -> Point3<f32> {
    let screen_x = (ndc.x + 1.0) * 0.5 * width;
    // 翻转Y轴：NDC中+1是顶部，屏幕坐标中0是顶部
    let screen_y = (1.0 - (ndc.y + 1.0) * 0.5) * height;
    Point3::new(screen_x, screen_y, ndc.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_x_moves_only_x() {
        let m = TransformFactory::translation_x(-1.5);
        let p = m.transform_point(&Point3::new(0.0, 1.0, 2.0));
        assert_eq!(p, Point3::new(-1.5, 1.0, 2.0));
    }

    #[test]
    fn ndc_corners_map_to_screen_corners() {
        let top_left = ndc_to_pixel(&Point3::new(-1.0, 1.0, 0.0), 800.0, 600.0);
        let bottom_right = ndc_to_pixel(&Point3::new(1.0, -1.0, 0.0), 800.0, 600.0);
        assert_eq!((top_left.x, top_left.y), (0.0, 0.0));
        assert_eq!((bottom_right.x, bottom_right.y), (800.0, 600.0));
    }

    #[test]
    fn points_behind_camera_have_no_ndc() {
        assert!(clip_to_ndc(&Vector4::new(0.0, 0.0, 0.0, -1.0)).is_none());
        assert!(clip_to_ndc(&Vector4::new(0.0, 0.0, 0.0, 0.0)).is_none());
        let ndc = clip_to_ndc(&Vector4::new(1.0, 2.0, 0.5, 2.0)).unwrap();
        assert_eq!(ndc, Point3::new(0.5, 1.0, 0.25));
    }

    #[test]
    fn view_matrix_sends_eye_to_origin() {
        let eye = Point3::new(4.0, 4.0, 4.0);
        let view = TransformFactory::view(&eye, &Point3::origin(), &Vector3::y());
        let p = view.transform_point(&eye);
        assert!(p.coords.norm() < 1e-5);

        // 观察目标位于相机 -Z 方向
        let target = view.transform_point(&Point3::origin());
        assert!(target.x.abs() < 1e-5 && target.y.abs() < 1e-5);
        assert!(target.z < 0.0);
    }
}
