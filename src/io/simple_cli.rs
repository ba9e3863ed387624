use crate::geometry::camera::CameraSlot;
use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::ViewerSettings;
use clap::Parser;
use log::info;

/// 🔥 **极简CLI** - 配置文件 + 窗口/无头两种模式
#[derive(Parser, Debug)]
#[command(name = "primitive-viewer")]
#[command(about = "🎨 三个图元、三个固定机位的查看器")]
pub struct SimpleCli {
    /// 📁 配置文件路径（TOML格式）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 🚀 无头模式（不启动窗口，直接输出PNG）
    #[arg(long)]
    pub headless: bool,

    /// 🎥 无头模式下只渲染该机位（1-3），缺省时渲染全部三个
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub camera: Option<u8>,

    /// 📋 使用示例配置（临时创建并加载）
    #[arg(long)]
    pub use_example_config: bool,
}

/// CLI 解析结果
#[derive(Debug)]
pub struct LaunchOptions {
    pub settings: ViewerSettings,
    pub headless: bool,
    pub only_camera: Option<CameraSlot>,
}

impl SimpleCli {
    /// 🔥 **处理CLI参数并返回启动选项**
    pub fn process() -> Result<LaunchOptions, String> {
        Self::parse().into_launch_options()
    }

    fn into_launch_options(self) -> Result<LaunchOptions, String> {
        let settings = if self.use_example_config {
            let temp_config_path = "temp_example_config.toml";

            TomlConfigLoader::create_example_config(temp_config_path)?;
            info!("✅ 已创建临时示例配置: {}", temp_config_path);

            TomlConfigLoader::load_from_file(temp_config_path)
                .map_err(|e| format!("加载示例配置失败: {}", e))?
        } else if let Some(config_path) = &self.config {
            info!("📁 加载配置文件: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("配置文件加载失败: {}", e))?
        } else {
            info!("💡 使用默认设置");
            ViewerSettings::default()
        };

        Ok(LaunchOptions {
            settings,
            headless: self.headless,
            only_camera: self.camera.and_then(CameraSlot::from_key_number),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_arguments() {
        let options = SimpleCli::parse_from(["primitive-viewer"])
            .into_launch_options()
            .unwrap();
        assert!(!options.headless);
        assert!(options.only_camera.is_none());
        assert_eq!(options.settings.width, 800);
    }

    #[test]
    fn headless_single_camera() {
        let options = SimpleCli::parse_from(["primitive-viewer", "--headless", "--camera", "2"])
            .into_launch_options()
            .unwrap();
        assert!(options.headless);
        assert_eq!(options.only_camera, Some(CameraSlot::Camera1));
    }

    #[test]
    fn camera_out_of_range_is_rejected() {
        assert!(SimpleCli::try_parse_from(["primitive-viewer", "--camera", "4"]).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = SimpleCli::parse_from(["primitive-viewer", "-c", "/nonexistent/viewer.toml"])
            .into_launch_options();
        assert!(result.is_err());
    }
}
