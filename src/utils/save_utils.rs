use crate::core::renderer::Renderer;
use image::ColorType;
use log::info;
use std::path::{Path, PathBuf};

/// 保存RGB图像数据到PNG文件
///
/// # 参数
/// * `path` - 输出文件路径
/// * `data` - RGB数据（u8数组）
/// * `width` - 图像宽度
/// * `height` - 图像高度
pub fn save_image(path: &Path, data: &[u8], width: u32, height: u32) -> Result<(), String> {
    image::save_buffer(path, data, width, height, ColorType::Rgb8)
        .map_err(|e| format!("保存图像到 {} 时出错: {}", path.display(), e))?;
    info!("图像已保存到 {}", path.display());
    Ok(())
}

/// 将渲染器当前帧保存为 `<output_dir>/<output_name>.png`
pub fn save_frame(
    renderer: &Renderer,
    output_dir: &str,
    output_name: &str,
) -> Result<PathBuf, String> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("创建输出目录 '{}' 失败: {}", output_dir, e))?;

    let width = u32::try_from(renderer.frame_buffer.width)
        .map_err(|_| format!("图像宽度 {} 超出范围", renderer.frame_buffer.width))?;
    let height = u32::try_from(renderer.frame_buffer.height)
        .map_err(|_| format!("图像高度 {} 超出范围", renderer.frame_buffer.height))?;

    let path = Path::new(output_dir).join(format!("{}.png", output_name));
    let color_data = renderer.frame_buffer.get_color_buffer_bytes();
    save_image(&path, &color_data, width, height)?;
    Ok(path)
}
