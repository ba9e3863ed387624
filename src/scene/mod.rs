// scene/mod.rs
// 导出场景与场景对象
pub mod scene_object;
pub mod scene_utils;
