use crate::ui::app::ViewerApp;
use crate::utils::save_utils::save_frame;
use egui::{Color32, Context};
use log::error;
use std::time::Instant;

/// 核心业务逻辑方法
///
/// 该trait包含应用的核心功能：渲染、截图与错误处理
pub trait CoreMethods {
    /// 渲染当前场景并刷新纹理
    fn render(&mut self, ctx: &Context);

    /// 在UI中显示渲染结果
    fn display_render_result(&mut self, ctx: &Context);

    /// 保存当前渲染结果为截图
    fn take_screenshot(&mut self) -> Result<String, String>;

    /// 设置错误信息并弹出错误对话框
    fn set_error(&mut self, message: String);
}

impl CoreMethods for ViewerApp {
    /// 🔥 **渲染当前场景** - 每帧重新取当前机位的视图矩阵
    fn render(&mut self, ctx: &Context) {
        let Some(scene) = &self.scene else {
            self.needs_render = false;
            return;
        };

        let start_time = Instant::now();
        self.renderer.render_frame(scene, &self.selector);
        let elapsed = start_time.elapsed();

        self.last_render_time = Some(elapsed);
        self.status_message = format!(
            "Camera {} ({} rig), {:.2?}",
            self.selector.active().key_number(),
            self.selector.rig().name(),
            elapsed
        );
        self.needs_render = false;

        self.display_render_result(ctx);
    }

    fn display_render_result(&mut self, ctx: &Context) {
        let color_data = self.renderer.frame_buffer.get_color_buffer_bytes();
        let width = self.renderer.frame_buffer.width;
        let height = self.renderer.frame_buffer.height;

        let rendered_texture = self.rendered_image.get_or_insert_with(|| {
            ctx.load_texture(
                "rendered_image",
                egui::ColorImage::new([width, height], Color32::BLACK),
                egui::TextureOptions::default(),
            )
        });

        // RGB -> RGBA
        let rgba_data: Vec<u8> = color_data
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect();

        rendered_texture.set(
            egui::ColorImage::from_rgba_unmultiplied([width, height], &rgba_data),
            egui::TextureOptions::default(),
        );
    }

    fn take_screenshot(&mut self) -> Result<String, String> {
        if self.rendered_image.is_none() {
            return Err("没有可用的渲染结果".to_string());
        }

        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let snapshot_name = format!("{}_{}", self.settings.output, timestamp);

        let path = save_frame(&self.renderer, &self.settings.output_dir, &snapshot_name)?;
        Ok(path.to_string_lossy().to_string())
    }

    fn set_error(&mut self, message: String) {
        error!("{}", message);
        self.status_message = format!("Error: {}", message);
        self.error_message = message;
        self.show_error_dialog = true;
    }
}
