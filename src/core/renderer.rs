use crate::core::frame_buffer::FrameBuffer;
use crate::core::rasterizer::{ScreenTriangle, rasterize_triangle};
use crate::core::render_config::RenderConfig;
use crate::core::shader::FlatShader;
use crate::geometry::camera::CameraSelector;
use crate::geometry::mesh::MeshData;
use crate::geometry::transform::{clip_to_ndc, ndc_to_pixel, world_to_clip};
use crate::scene::scene_utils::Scene;
use log::{debug, warn};
use nalgebra::Point3;
use rayon::prelude::*;
use std::time::Instant;

/// 已上传到渲染器的顶点缓冲，上传后不可变
#[derive(Debug)]
struct VertexBuffer {
    positions: Box<[Point3<f32>]>,
}

/// 指向渲染器内部顶点缓冲的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHandle(usize);

pub struct Renderer {
    pub frame_buffer: FrameBuffer,
    pub config: RenderConfig,
    /// 顶点缓冲随渲染器一起释放
    buffers: Vec<VertexBuffer>,
}

impl Renderer {
    #[cfg(test)]
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(width, height, RenderConfig::default())
    }

    pub fn with_config(width: usize, height: usize, config: RenderConfig) -> Self {
        Renderer {
            frame_buffer: FrameBuffer::new(width, height),
            config,
            buffers: Vec::new(),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.frame_buffer.width as f32 / self.frame_buffer.height as f32
    }

    /// 上传网格数据，取得其所有权；生成端的临时数据在此之后被释放
    pub fn upload(&mut self, mesh: MeshData) -> MeshHandle {
        if mesh.is_empty() {
            debug!("上传空网格，绘制时将不产生任何片元");
        } else if mesh.vertex_count() % 3 != 0 {
            warn!(
                "顶点数 {} 不是3的倍数，末尾的残余顶点将被忽略",
                mesh.vertex_count()
            );
        }
        let handle = MeshHandle(self.buffers.len());
        self.buffers.push(VertexBuffer {
            positions: mesh.positions.into_boxed_slice(),
        });
        debug!("上传顶点缓冲 #{}", handle.0);
        handle
    }

    pub fn vertex_count(&self, handle: MeshHandle) -> usize {
        self.buffers
            .get(handle.0)
            .map_or(0, |buffer| buffer.positions.len())
    }

    /// 使用纯色着色器绘制一个顶点缓冲
    pub fn draw(&self, handle: MeshHandle, shader: &FlatShader) {
        let Some(buffer) = self.buffers.get(handle.0) else {
            warn!("无效的网格句柄 {:?}", handle);
            return;
        };

        let width = self.frame_buffer.width as f32;
        let height = self.frame_buffer.height as f32;
        let clip_coords = world_to_clip(&buffer.positions, &shader.mvp);

        // 任一顶点位于相机背后的三角形整体丢弃
        let to_screen = |tri: &[nalgebra::Vector4<f32>]| -> Option<ScreenTriangle> {
            let v1 = ndc_to_pixel(&clip_to_ndc(&tri[0])?, width, height);
            let v2 = ndc_to_pixel(&clip_to_ndc(&tri[1])?, width, height);
            let v3 = ndc_to_pixel(&clip_to_ndc(&tri[2])?, width, height);
            Some(ScreenTriangle { v1, v2, v3 })
        };

        let rgb = shader.fragment();
        let use_zbuffer = self.config.use_zbuffer;

        if self.config.use_multithreading {
            clip_coords
                .par_chunks_exact(3)
                .filter_map(to_screen)
                .for_each(|tri| rasterize_triangle(&tri, rgb, &self.frame_buffer, use_zbuffer));
        } else {
            clip_coords
                .chunks_exact(3)
                .filter_map(to_screen)
                .for_each(|tri| rasterize_triangle(&tri, rgb, &self.frame_buffer, use_zbuffer));
        }
    }

    /// 渲染一帧：清屏，然后依次绘制场景中的每个对象
    ///
    /// 视图/投影矩阵每帧重新计算。
    pub fn render_frame(&self, scene: &Scene, selector: &CameraSelector) {
        let start_time = Instant::now();

        self.frame_buffer.clear(&self.config.background);

        let view = selector.current_view();
        let projection = CameraSelector::projection(self.aspect_ratio());

        for object in &scene.objects {
            let shader = FlatShader::new(&object.model_matrix(), &view, &projection, object.color);
            self.draw(object.mesh, &shader);
        }

        debug!(
            "机位 {} 渲染完成, 耗时 {:?}",
            selector.active().key_number(),
            start_time.elapsed()
        );
    }
}
