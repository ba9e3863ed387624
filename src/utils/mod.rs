// utils/mod.rs
// 导出图像保存与无头渲染流程
pub mod render_process;
pub mod save_utils;
