use crate::io::render_settings::ViewerSettings;
use nalgebra::Vector3;

/// 渲染后端配置
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// 是否启用深度缓冲和深度测试
    pub use_zbuffer: bool,
    /// 是否在单次绘制内并行光栅化三角形
    pub use_multithreading: bool,
    /// 清屏颜色
    pub background: Vector3<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            use_zbuffer: true,
            use_multithreading: true,
            background: Vector3::new(0.0, 0.0, 0.0),
        }
    }
}

impl RenderConfig {
    pub fn from_settings(settings: &ViewerSettings) -> Self {
        Self {
            use_zbuffer: settings.use_zbuffer,
            use_multithreading: settings.use_multithreading,
            background: settings.background,
        }
    }
}
