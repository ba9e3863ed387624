use crate::geometry::camera::{CameraRig, CameraSlot};
use nalgebra::Vector3;

/// 视口单边的最大像素数
pub const MAX_DIMENSION: usize = 16384;

/// 场景右侧的程序化形状
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThirdShape {
    #[default]
    Sphere,
    Cone,
}

impl ThirdShape {
    pub fn name(self) -> &'static str {
        match self {
            ThirdShape::Sphere => "sphere",
            ThirdShape::Cone => "cone",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "sphere" => Ok(ThirdShape::Sphere),
            "cone" => Ok(ThirdShape::Cone),
            other => Err(format!("未知的形状 '{}'，可选 sphere / cone", other)),
        }
    }
}

/// 🔥 **纯数据结构** - 所有可通过TOML配置的查看器参数
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    // ===== 🔥 **文件路径设置** =====
    /// 输出文件的基础名称
    pub output: String,
    /// 输出图像的目录
    pub output_dir: String,

    // ===== 🔥 **渲染基础设置** =====
    /// 视口宽度
    pub width: usize,
    /// 视口高度
    pub height: usize,
    /// 启用Z缓冲（深度测试）
    pub use_zbuffer: bool,
    /// 启用多线程光栅化
    pub use_multithreading: bool,
    /// 清屏颜色（线性RGB，0-1）
    pub background: Vector3<f32>,

    // ===== 🔥 **网格参数** =====
    /// 球体纬度分段数
    pub sphere_lat_segments: u32,
    /// 球体经度分段数
    pub sphere_lon_segments: u32,
    /// 圆锥分段数
    pub cone_segments: u32,

    // ===== 🔥 **场景与机位** =====
    /// 机位组（Y轴向上 / Z轴向上）
    pub rig: CameraRig,
    /// 右侧形状
    pub third_shape: ThirdShape,
    /// 启动时的机位
    pub initial_camera: CameraSlot,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            output: "view".to_string(),
            output_dir: "output_rust".to_string(),
            width: 800,
            height: 600,
            use_zbuffer: true,
            use_multithreading: true,
            background: Vector3::new(0.0, 0.0, 0.0),
            sphere_lat_segments: 20,
            sphere_lon_segments: 20,
            cone_segments: 32,
            rig: CameraRig::YUp,
            third_shape: ThirdShape::Sphere,
            initial_camera: CameraSlot::Camera0,
        }
    }
}

impl ViewerSettings {
    /// 验证设置的有效性
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err("错误: 视口宽度和高度必须大于0".to_string());
        }

        if self.width > MAX_DIMENSION || self.height > MAX_DIMENSION {
            return Err(format!(
                "错误: 视口尺寸 {}x{} 超出上限 {}",
                self.width, self.height, MAX_DIMENSION
            ));
        }

        // 颜色缓冲区按每像素3字节分配
        if self
            .width
            .checked_mul(self.height)
            .and_then(|pixels| pixels.checked_mul(3))
            .is_none()
        {
            return Err(format!(
                "错误: 视口尺寸 {}x{} 导致缓冲区大小溢出",
                self.width, self.height
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err("错误: 输出目录不能为空".to_string());
        }

        if self.output.trim().is_empty() {
            return Err("错误: 输出文件名不能为空".to_string());
        }

        if self
            .background
            .iter()
            .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
        {
            return Err("错误: 背景颜色分量必须在 [0, 1] 范围内".to_string());
        }

        Ok(())
    }

    /// 背景颜色的 "r,g,b" 字符串形式
    pub fn background_string(&self) -> String {
        format!(
            "{},{},{}",
            self.background.x, self.background.y, self.background.z
        )
    }
}

/// 解析 "x,y,z" 格式的三元组
pub fn parse_vec3(s: &str) -> Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err("需要3个逗号分隔的值".to_string());
    }
    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("无效的数字 '{}': {}", part, e))?;
    }
    Ok(Vector3::from(values))
}
