use crate::geometry::camera::{CameraRig, CameraSlot};
use crate::io::render_settings::{ThirdShape, ViewerSettings, parse_vec3};
use log::warn;
use std::path::Path;
use toml::Value;

/// TOML配置管理器 - 统一处理所有配置的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// 从TOML文件加载完整配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ViewerSettings, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("读取配置文件失败: {}", e))?;

        Self::load_from_content(&content)
    }

    /// 从TOML内容字符串加载配置
    pub fn load_from_content(content: &str) -> Result<ViewerSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("解析TOML失败: {}", e))?;

        let settings = Self::parse_toml_to_settings(toml_value)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 保存配置到TOML文件
    pub fn save_to_file<P: AsRef<Path>>(settings: &ViewerSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content).map_err(|e| format!("写入配置文件失败: {}", e))
    }

    /// 生成示例配置文件
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        Self::save_to_file(&ViewerSettings::default(), path)
            .map_err(|e| format!("创建示例配置失败: {}", e))
    }

    // ===== TOML -> ViewerSettings 转换 =====

    fn parse_toml_to_settings(toml: Value) -> Result<ViewerSettings, String> {
        let mut settings = ViewerSettings::default();

        // [files] 部分
        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files)?;
        }

        // [render] 部分
        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        // [mesh] 部分
        if let Some(mesh) = toml.get("mesh").and_then(|v| v.as_table()) {
            Self::parse_mesh_section(&mut settings, mesh)?;
        }

        // [scene] 部分
        if let Some(scene) = toml.get("scene").and_then(|v| v.as_table()) {
            Self::parse_scene_section(&mut settings, scene)?;
        }

        // [camera] 部分
        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera)?;
        }

        Ok(settings)
    }

    // ===== 各个section的解析方法 =====

    fn parse_files_section(
        settings: &mut ViewerSettings,
        files: &toml::Table,
    ) -> Result<(), String> {
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
        if let Some(output_dir) = files.get("output_dir").and_then(|v| v.as_str()) {
            settings.output_dir = output_dir.to_string();
        }
        Ok(())
    }

    fn parse_render_section(
        settings: &mut ViewerSettings,
        render: &toml::Table,
    ) -> Result<(), String> {
        if let Some(width) = render.get("width").and_then(|v| v.as_integer()) {
            settings.width = Self::non_negative("render.width", width)? as usize;
        }
        if let Some(height) = render.get("height").and_then(|v| v.as_integer()) {
            settings.height = Self::non_negative("render.height", height)? as usize;
        }
        if let Some(use_zbuffer) = render.get("use_zbuffer").and_then(|v| v.as_bool()) {
            settings.use_zbuffer = use_zbuffer;
        }
        if let Some(use_multithreading) =
            render.get("use_multithreading").and_then(|v| v.as_bool())
        {
            settings.use_multithreading = use_multithreading;
        }
        if let Some(background) = render.get("background").and_then(|v| v.as_str()) {
            settings.background =
                parse_vec3(background).map_err(|e| format!("render.background 无效: {}", e))?;
        }
        Ok(())
    }

    fn parse_mesh_section(settings: &mut ViewerSettings, mesh: &toml::Table) -> Result<(), String> {
        if let Some(lat) = mesh.get("sphere_lat_segments").and_then(|v| v.as_integer()) {
            settings.sphere_lat_segments = Self::segment_count("mesh.sphere_lat_segments", lat)?;
        }
        if let Some(lon) = mesh.get("sphere_lon_segments").and_then(|v| v.as_integer()) {
            settings.sphere_lon_segments = Self::segment_count("mesh.sphere_lon_segments", lon)?;
        }
        if let Some(segments) = mesh.get("cone_segments").and_then(|v| v.as_integer()) {
            settings.cone_segments = Self::segment_count("mesh.cone_segments", segments)?;
        }
        Ok(())
    }

    fn parse_scene_section(
        settings: &mut ViewerSettings,
        scene: &toml::Table,
    ) -> Result<(), String> {
        if let Some(rig) = scene.get("rig").and_then(|v| v.as_str()) {
            settings.rig = CameraRig::parse(rig)?;
        }
        if let Some(shape) = scene.get("third_shape").and_then(|v| v.as_str()) {
            settings.third_shape = ThirdShape::parse(shape)?;
        }
        Ok(())
    }

    fn parse_camera_section(
        settings: &mut ViewerSettings,
        camera: &toml::Table,
    ) -> Result<(), String> {
        if let Some(initial) = camera.get("initial").and_then(|v| v.as_integer()) {
            match u8::try_from(initial).ok().and_then(CameraSlot::from_key_number) {
                Some(slot) => settings.initial_camera = slot,
                None => warn!("无效的初始机位 {}，使用机位 1", initial),
            }
        }
        Ok(())
    }

    fn non_negative(key: &str, value: i64) -> Result<u64, String> {
        u64::try_from(value).map_err(|_| format!("{} 不能为负数: {}", key, value))
    }

    /// 分段数允许为0（生成空网格），但不能为负或超出u32
    fn segment_count(key: &str, value: i64) -> Result<u32, String> {
        u32::try_from(value).map_err(|_| format!("{} 超出范围: {}", key, value))
    }

    // ===== ViewerSettings -> TOML 转换 =====

    fn settings_to_toml(settings: &ViewerSettings) -> String {
        let mut content = String::new();

        content.push_str("# 🔥 图元查看器配置文件\n");
        content.push_str("# 基于ViewerSettings默认值生成的示例配置\n\n");

        // [files] 部分
        content.push_str("[files]\n");
        content.push_str(&format!(
            "output = {}\n",
            Value::String(settings.output.clone())
        ));
        content.push_str(&format!(
            "output_dir = {}\n",
            Value::String(settings.output_dir.clone())
        ));
        content.push('\n');

        // [render] 部分
        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push_str(&format!("use_zbuffer = {}\n", settings.use_zbuffer));
        content.push_str(&format!(
            "use_multithreading = {}\n",
            settings.use_multithreading
        ));
        content.push_str(&format!(
            "background = \"{}\"\n",
            settings.background_string()
        ));
        content.push('\n');

        // [mesh] 部分
        content.push_str("[mesh]\n");
        content.push_str(&format!(
            "sphere_lat_segments = {}\n",
            settings.sphere_lat_segments
        ));
        content.push_str(&format!(
            "sphere_lon_segments = {}\n",
            settings.sphere_lon_segments
        ));
        content.push_str(&format!("cone_segments = {}\n", settings.cone_segments));
        content.push('\n');

        // [scene] 部分
        content.push_str("[scene]\n");
        content.push_str(&format!("rig = \"{}\"  # y_up / z_up\n", settings.rig.name()));
        content.push_str(&format!(
            "third_shape = \"{}\"  # sphere / cone\n",
            settings.third_shape.name()
        ));
        content.push('\n');

        // [camera] 部分
        content.push_str("[camera]\n");
        content.push_str(&format!(
            "initial = {}  # 1 / 2 / 3\n",
            settings.initial_camera.key_number()
        ));

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn empty_content_gives_defaults() {
        let settings = TomlConfigLoader::load_from_content("").unwrap();
        assert_eq!(settings.width, 800);
        assert_eq!(settings.sphere_lat_segments, 20);
        assert_eq!(settings.rig, CameraRig::YUp);
    }

    #[test]
    fn sections_override_defaults() {
        let content = r#"
            [render]
            width = 320
            height = 240
            background = "0.1,0.2,0.3"

            [mesh]
            sphere_lat_segments = 8
            sphere_lon_segments = 0

            [scene]
            rig = "z_up"
            third_shape = "cone"

            [camera]
            initial = 3
        "#;
        let settings = TomlConfigLoader::load_from_content(content).unwrap();
        assert_eq!((settings.width, settings.height), (320, 240));
        assert_eq!(settings.background, Vector3::new(0.1, 0.2, 0.3));
        assert_eq!(settings.sphere_lat_segments, 8);
        assert_eq!(settings.sphere_lon_segments, 0);
        assert_eq!(settings.rig, CameraRig::ZUp);
        assert_eq!(settings.third_shape, ThirdShape::Cone);
        assert_eq!(settings.initial_camera, CameraSlot::Camera2);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(TomlConfigLoader::load_from_content("[scene]\nrig = \"x_up\"").is_err());
        assert!(TomlConfigLoader::load_from_content("[mesh]\ncone_segments = -1").is_err());
        assert!(TomlConfigLoader::load_from_content("[render]\nwidth = 0").is_err());
        assert!(TomlConfigLoader::load_from_content("not toml = = =").is_err());
    }

    #[test]
    fn oversized_viewport_is_rejected() {
        let content = "[render]\nwidth = 4294967296\nheight = 4294967296";
        assert!(TomlConfigLoader::load_from_content(content).is_err());
    }

    #[test]
    fn out_of_range_initial_camera_falls_back() {
        let settings = TomlConfigLoader::load_from_content("[camera]\ninitial = 7").unwrap();
        assert_eq!(settings.initial_camera, CameraSlot::Camera0);
    }

    #[test]
    fn generated_config_loads_back() {
        let settings = ViewerSettings {
            rig: CameraRig::ZUp,
            cone_segments: 9,
            initial_camera: CameraSlot::Camera1,
            ..Default::default()
        };
        let content = TomlConfigLoader::settings_to_toml(&settings);
        let loaded = TomlConfigLoader::load_from_content(&content).unwrap();
        assert_eq!(loaded.rig, CameraRig::ZUp);
        assert_eq!(loaded.cone_segments, 9);
        assert_eq!(loaded.initial_camera, CameraSlot::Camera1);
    }

    #[test]
    fn generated_config_escapes_paths() {
        let settings = ViewerSettings {
            output: "say \"hi\"".to_string(),
            output_dir: r"C:\renders\new".to_string(),
            ..Default::default()
        };
        let content = TomlConfigLoader::settings_to_toml(&settings);
        let loaded = TomlConfigLoader::load_from_content(&content).unwrap();
        assert_eq!(loaded.output, settings.output);
        assert_eq!(loaded.output_dir, settings.output_dir);
    }
}
