mod core;
mod geometry;
mod io;
mod scene;
mod ui;
mod utils;

use io::simple_cli::SimpleCli;
use log::info;
use utils::render_process::render_headless;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = SimpleCli::process()?;
    options.settings.validate()?;

    if options.headless {
        info!("🚀 无头模式渲染");
        let written = render_headless(&options.settings, options.only_camera)?;
        for path in &written {
            info!("  -> {}", path.display());
        }
        return Ok(());
    }

    info!("🎨 启动图形界面，按 1/2/3 切换机位");
    ui::start_gui(options.settings).map_err(|e| format!("GUI启动失败: {}", e))
}
