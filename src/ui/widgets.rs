use crate::geometry::camera::CameraSlot;
use egui::{Color32, RichText};

use super::app::ViewerApp;
use super::core::CoreMethods;

/// UI组件相关方法的特质
pub trait WidgetMethods {
    /// 绘制UI的侧边栏
    fn draw_side_panel(&mut self, ui: &mut egui::Ui);

    /// 显示错误对话框
    fn show_error_dialog_ui(&mut self, ctx: &egui::Context);
}

impl WidgetMethods for ViewerApp {
    fn show_error_dialog_ui(&mut self, ctx: &egui::Context) {
        if self.show_error_dialog {
            egui::Window::new("Error")
                .fixed_size([400.0, 150.0])
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(10.0);
                        ui.label(
                            RichText::new(&self.error_message)
                                .color(Color32::from_rgb(230, 50, 50))
                                .size(16.0),
                        );
                        ui.add_space(20.0);
                        if ui.button(RichText::new("OK").size(16.0)).clicked() {
                            self.show_error_dialog = false;
                        }
                    });
                });
        }
    }

    /// 绘制侧边栏：机位切换、场景信息、截图
    fn draw_side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Camera");
        ui.add_space(4.0);

        // 按钮与数字键走同一条选择路径
        let mut clicked = None;
        ui.horizontal(|ui| {
            for slot in CameraSlot::ALL {
                let active = self.selector.active() == slot;
                let label = RichText::new(format!("{}", slot.key_number())).size(16.0);
                if ui.selectable_label(active, label).clicked() {
                    clicked = Some(slot.key_number());
                }
            }
        });
        if let Some(n) = clicked {
            if self.selector.select(n) {
                self.needs_render = true;
            }
        }

        // 位姿矩阵的平移列即相机位置
        let pose = self.selector.current_camera().camera_to_world();
        ui.label(format!(
            "eye ({:.2}, {:.2}, {:.2})",
            pose[(0, 3)],
            pose[(1, 3)],
            pose[(2, 3)]
        ));
        ui.label(format!("rig: {}", self.selector.rig().name()));

        ui.separator();
        ui.heading("Scene");
        match &self.scene {
            Some(scene) => {
                for object in &scene.objects {
                    ui.label(format!(
                        "{} @ x={:+.1}  ({} vertices)",
                        object.shape.label(),
                        object.offset_x,
                        self.renderer.vertex_count(object.mesh)
                    ));
                }
            }
            None => {
                ui.label(RichText::new("scene unavailable").color(Color32::GRAY));
            }
        }

        ui.separator();
        let depth_changed = ui
            .checkbox(&mut self.renderer.config.use_zbuffer, "Depth test")
            .changed();
        let threading_changed = ui
            .checkbox(
                &mut self.renderer.config.use_multithreading,
                "Multithreaded raster",
            )
            .changed();
        if depth_changed || threading_changed {
            self.needs_render = true;
        }

        ui.separator();
        if ui.button("Screenshot").clicked() {
            match self.take_screenshot() {
                Ok(path) => self.status_message = format!("Saved {}", path),
                Err(e) => self.set_error(e),
            }
        }

        if let Some(elapsed) = self.last_render_time {
            ui.add_space(8.0);
            ui.label(RichText::new(format!("last frame: {:.2?}", elapsed)).color(Color32::GRAY));
        }
    }
}
