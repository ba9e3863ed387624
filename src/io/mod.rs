// io/mod.rs
// 导出配置与命令行相关模块
pub mod config_loader;
pub mod render_settings;
pub mod simple_cli;
