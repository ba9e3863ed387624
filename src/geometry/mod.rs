// geometry/mod.rs
// 导出网格、机位和变换相关模块
pub mod camera;
pub mod mesh;
pub mod transform;
