use crate::geometry::transform::TransformFactory;
use log::debug;
use nalgebra::{Matrix4, Point3, Vector3};

/// 垂直视场角（度）
pub const FOV_Y_DEGREES: f32 = 45.0;
/// 近裁剪平面距离
pub const NEAR_PLANE: f32 = 0.1;
/// 远裁剪平面距离
pub const FAR_PLANE: f32 = 100.0;

/// 固定机位：编译期常量，不插值、不推导
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedCamera {
    /// 相机位置（眼睛位置）
    pub eye: Point3<f32>,
    /// 相机观察点（始终为世界原点）
    pub center: Point3<f32>,
    /// 相机上方向（轴对齐）
    pub up: Vector3<f32>,
}

impl FixedCamera {
    const fn new(eye: [f32; 3], up: [f32; 3]) -> Self {
        Self {
            eye: Point3::new(eye[0], eye[1], eye[2]),
            center: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(up[0], up[1], up[2]),
        }
    }

    /// 视图矩阵（世界坐标 -> 相机坐标）
    pub fn view_matrix(&self) -> Matrix4<f32> {
        TransformFactory::view(&self.eye, &self.center, &self.up)
    }

    /// 相机在世界中的位姿（视图矩阵的逆），平移列即为相机位置
    pub fn camera_to_world(&self) -> Matrix4<f32> {
        self.view_matrix()
            .try_inverse()
            .unwrap_or_else(Matrix4::identity)
    }
}

/// 机位组：两种坐标约定下的三个固定机位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraRig {
    /// Y轴向上：正面、俯视、斜角
    #[default]
    YUp,
    /// Z轴向上：正面、俯视、斜角
    ZUp,
}

const Y_UP_PRESETS: [FixedCamera; 3] = [
    FixedCamera::new([0.0, 0.0, 4.0], [0.0, 1.0, 0.0]),
    FixedCamera::new([0.0, 5.0, 0.01], [0.0, 1.0, 0.0]),
    FixedCamera::new([4.0, 4.0, 4.0], [0.0, 1.0, 0.0]),
];

const Z_UP_PRESETS: [FixedCamera; 3] = [
    FixedCamera::new([0.0, -4.0, 0.0], [0.0, 0.0, 1.0]),
    FixedCamera::new([0.0, -0.01, 5.0], [0.0, 0.0, 1.0]),
    FixedCamera::new([4.0, -4.0, 4.0], [0.0, 0.0, 1.0]),
];

impl CameraRig {
    pub fn presets(self) -> &'static [FixedCamera; 3] {
        match self {
            CameraRig::YUp => &Y_UP_PRESETS,
            CameraRig::ZUp => &Z_UP_PRESETS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CameraRig::YUp => "y_up",
            CameraRig::ZUp => "z_up",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "y_up" | "y" => Ok(CameraRig::YUp),
            "z_up" | "z" => Ok(CameraRig::ZUp),
            other => Err(format!("未知的机位组 '{}'，可选 y_up / z_up", other)),
        }
    }
}

/// 当前激活的机位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraSlot {
    #[default]
    Camera0,
    Camera1,
    Camera2,
}

impl CameraSlot {
    pub const ALL: [CameraSlot; 3] = [CameraSlot::Camera0, CameraSlot::Camera1, CameraSlot::Camera2];

    pub fn index(self) -> usize {
        match self {
            CameraSlot::Camera0 => 0,
            CameraSlot::Camera1 => 1,
            CameraSlot::Camera2 => 2,
        }
    }

    /// 由按键编号 1/2/3 得到机位，其他值返回 None
    pub fn from_key_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(CameraSlot::Camera0),
            2 => Some(CameraSlot::Camera1),
            3 => Some(CameraSlot::Camera2),
            _ => None,
        }
    }

    /// 对应的按键编号（1起始）
    pub fn key_number(self) -> u8 {
        self.index() as u8 + 1
    }
}

/// 机位选择器，由渲染循环的控制者持有
#[derive(Debug, Clone, Default)]
pub struct CameraSelector {
    rig: CameraRig,
    active: CameraSlot,
}

impl CameraSelector {
    pub fn new(rig: CameraRig, initial: CameraSlot) -> Self {
        Self {
            rig,
            active: initial,
        }
    }

    pub fn rig(&self) -> CameraRig {
        self.rig
    }

    pub fn active(&self) -> CameraSlot {
        self.active
    }

    /// 处理"选择机位 N"事件（N ∈ {1,2,3}），立即生效，后到者覆盖先到者
    ///
    /// 返回机位是否发生了变化。超出范围的编号被忽略。
    pub fn select(&mut self, key_number: u8) -> bool {
        let Some(slot) = CameraSlot::from_key_number(key_number) else {
            debug!("忽略无效的机位编号 {}", key_number);
            return false;
        };
        let changed = slot != self.active;
        self.active = slot;
        if changed {
            debug!("切换到机位 {}", key_number);
        }
        changed
    }

    pub fn current_camera(&self) -> &FixedCamera {
        &self.rig.presets()[self.active.index()]
    }

    /// 当前机位的视图矩阵
    pub fn current_view(&self) -> Matrix4<f32> {
        self.current_camera().view_matrix()
    }

    /// 透视投影矩阵：只依赖宽高比，与机位无关
    pub fn projection(aspect_ratio: f32) -> Matrix4<f32> {
        TransformFactory::perspective(
            aspect_ratio,
            FOV_Y_DEGREES.to_radians(),
            NEAR_PLANE,
            FAR_PLANE,
        )
    }
}
