use crate::core::renderer::Renderer;
use crate::geometry::camera::CameraRig;
use crate::io::render_settings::{ThirdShape, ViewerSettings};
use crate::scene::scene_object::{SceneObject, ShapeKind};
use log::info;
use nalgebra::Vector3;

/// 三个物体在X轴上的摆放位置（左、中、右）
pub const OBJECT_OFFSETS: [f32; 3] = [-1.5, 0.0, 1.5];

/// 表示一个 3D 场景：左侧红色立方体、中间绿色金字塔、右侧蓝色球体/圆锥
#[derive(Debug, Clone)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
}

impl Scene {
    /// 根据设置生成三个形状并上传到渲染器
    ///
    /// 生成的顶点数据只在上传期间存在，上传后即被释放。
    pub fn build(settings: &ViewerSettings, renderer: &mut Renderer) -> Result<Self, String> {
        let shapes = Self::shapes_for(settings);
        let colors = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];

        let mut objects = Vec::with_capacity(shapes.len());
        for ((shape, color), offset_x) in shapes.into_iter().zip(colors).zip(OBJECT_OFFSETS) {
            let mesh_data = shape
                .build_mesh()
                .map_err(|e| format!("生成{}失败: {}", shape.label(), e))?;
            info!(
                "{}: {} 个三角形, 偏移 x = {}",
                shape.label(),
                mesh_data.triangle_count(),
                offset_x
            );
            let mesh = renderer.upload(mesh_data);
            objects.push(SceneObject {
                shape,
                mesh,
                color,
                offset_x,
            });
        }

        Ok(Scene { objects })
    }

    fn shapes_for(settings: &ViewerSettings) -> [ShapeKind; 3] {
        let pyramid = match settings.rig {
            CameraRig::YUp => ShapeKind::Pyramid,
            CameraRig::ZUp => ShapeKind::PyramidZUp,
        };
        let third = match settings.third_shape {
            ThirdShape::Sphere => ShapeKind::Sphere {
                lat_segments: settings.sphere_lat_segments,
                lon_segments: settings.sphere_lon_segments,
            },
            ThirdShape::Cone => ShapeKind::Cone {
                segments: settings.cone_segments,
            },
        };
        [ShapeKind::Cube, pyramid, third]
    }
}
