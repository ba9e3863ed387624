use crate::core::render_config::RenderConfig;
use crate::core::renderer::Renderer;
use crate::geometry::camera::{CameraSelector, CameraSlot};
use crate::io::render_settings::ViewerSettings;
use crate::scene::scene_utils::Scene;
use crate::utils::save_utils::save_frame;
use log::info;
use std::path::PathBuf;
use std::time::Instant;

/// 无头模式：按机位逐个渲染并保存 `<output>_cam<N>.png`
///
/// # 参数
/// * `settings` - 查看器设置
/// * `only_camera` - 只渲染指定机位；为 None 时渲染全部三个
///
/// # 返回值
/// 写出的文件路径列表
pub fn render_headless(
    settings: &ViewerSettings,
    only_camera: Option<CameraSlot>,
) -> Result<Vec<PathBuf>, String> {
    settings.validate()?;
    let start_time = Instant::now();

    let mut renderer = Renderer::with_config(
        settings.width,
        settings.height,
        RenderConfig::from_settings(settings),
    );
    let scene = Scene::build(settings, &mut renderer)?;

    let slots: Vec<CameraSlot> = match only_camera {
        Some(slot) => vec![slot],
        None => CameraSlot::ALL.to_vec(),
    };

    let mut written = Vec::with_capacity(slots.len());
    for slot in slots {
        let mut selector = CameraSelector::new(settings.rig, settings.initial_camera);
        selector.select(slot.key_number());

        renderer.render_frame(&scene, &selector);

        let output_name = format!("{}_cam{}", settings.output, slot.key_number());
        written.push(save_frame(&renderer, &settings.output_dir, &output_name)?);
    }

    info!(
        "无头渲染完成: {} 张图像，耗时 {:?}",
        written.len(),
        start_time.elapsed()
    );
    Ok(written)
}
