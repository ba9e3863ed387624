use crate::core::render_config::RenderConfig;
use crate::core::renderer::Renderer;
use crate::geometry::camera::CameraSelector;
use crate::io::render_settings::ViewerSettings;
use crate::scene::scene_utils::Scene;
use egui::{Color32, RichText, Vec2};

use super::core::CoreMethods;
use super::widgets::WidgetMethods;

/// 数字键与机位编号的对应关系
const CAMERA_KEYS: [(egui::Key, u8); 3] = [
    (egui::Key::Num1, 1),
    (egui::Key::Num2, 2),
    (egui::Key::Num3, 3),
];

/// GUI应用状态
pub struct ViewerApp {
    // ===== TOML可配置参数 =====
    pub settings: ViewerSettings,

    // ===== 渲染运行时状态 =====
    /// 渲染器实例（持有已上传的顶点缓冲）
    pub renderer: Renderer,
    /// 场景；构建失败时为 None
    pub scene: Option<Scene>,
    /// 机位选择器，只在 update 中被修改
    pub selector: CameraSelector,
    /// 下一帧是否需要重新渲染
    pub needs_render: bool,

    // ===== GUI界面状态 =====
    /// 渲染结果纹理句柄
    pub rendered_image: Option<egui::TextureHandle>,
    /// 上次渲染耗时
    pub last_render_time: Option<std::time::Duration>,
    /// 状态消息显示
    pub status_message: String,
    /// 是否显示错误对话框
    pub show_error_dialog: bool,
    /// 错误消息内容
    pub error_message: String,
}

impl ViewerApp {
    /// 创建新的GUI应用实例：生成网格、上传，一次完成
    pub fn new(settings: ViewerSettings) -> Self {
        let mut renderer = Renderer::with_config(
            settings.width,
            settings.height,
            RenderConfig::from_settings(&settings),
        );
        let selector = CameraSelector::new(settings.rig, settings.initial_camera);
        let scene = Scene::build(&settings, &mut renderer);

        let mut app = Self {
            settings,
            renderer,
            scene: None,
            selector,
            needs_render: true,
            rendered_image: None,
            last_render_time: None,
            status_message: String::new(),
            show_error_dialog: false,
            error_message: String::new(),
        };

        match scene {
            Ok(scene) => {
                app.scene = Some(scene);
                app.status_message = "Scene ready".to_string();
            }
            Err(e) => CoreMethods::set_error(&mut app, e),
        }
        app
    }

    /// 收集本帧按下的机位键，按到达顺序依次应用（后到者覆盖）
    fn handle_camera_keys(&mut self, ctx: &egui::Context) {
        let pressed: Vec<u8> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key, pressed: true, ..
                    } => CAMERA_KEYS
                        .iter()
                        .find(|(k, _)| k == key)
                        .map(|(_, n)| *n),
                    _ => None,
                })
                .collect()
        });

        for n in pressed {
            if self.selector.select(n) {
                self.needs_render = true;
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show_error_dialog_ui(ctx);

        self.handle_camera_keys(ctx);

        // 截图快捷键
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            match CoreMethods::take_screenshot(self) {
                Ok(path) => self.status_message = format!("Saved {}", path),
                Err(e) => CoreMethods::set_error(self, e),
            }
        }

        if self.needs_render {
            CoreMethods::render(self, ctx);
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Primitive Viewer");
                ui.separator();
                ui.label(&self.status_message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label("1/2/3: camera   Ctrl+S: screenshot");
                });
            });
        });

        egui::SidePanel::left("left_panel")
            .min_width(220.0)
            .resizable(false)
            .show(ctx, |ui| {
                self.draw_side_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(texture) = &self.rendered_image {
                let available_size = ui.available_size();
                let image_aspect = self.renderer.aspect_ratio();

                let (width, height) = if available_size.x / available_size.y > image_aspect {
                    (available_size.y * image_aspect, available_size.y)
                } else {
                    (available_size.x, available_size.x / image_aspect)
                };

                ui.centered_and_justified(|ui| {
                    ui.add(egui::Image::new(texture).fit_to_exact_size(Vec2::new(width, height)));
                });
            } else {
                ui.vertical_centered(|ui| {
                    ui.add_space(100.0);
                    ui.label(RichText::new("No image").size(24.0).color(Color32::GRAY));
                });
            }
        });
    }
}

/// 启动GUI应用
pub fn start_gui(settings: ViewerSettings) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.width as f32 + 260.0, settings.height as f32 + 60.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "primitive-viewer",
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::new(settings)))),
    )
}
