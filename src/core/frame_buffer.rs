use atomic_float::AtomicF32;
use nalgebra::Vector3;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU8, Ordering};

/// 帧缓冲区实现，存储渲染结果
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// 存储NDC深度值，数值越小表示越近。使用原子类型以支持并行写入。
    pub depth_buffer: Vec<AtomicF32>,
    /// 存储RGB颜色值 [0, 255]，类型为u8。使用原子类型以支持并行写入。
    pub color_buffer: Vec<AtomicU8>,
}

/// 线性颜色 [0,1] -> u8
pub fn color_to_u8(color: &Vector3<f32>) -> [u8; 3] {
    [
        (color.x * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.y * 255.0).round().clamp(0.0, 255.0) as u8,
        (color.z * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

impl FrameBuffer {
    /// 调用方需保证尺寸已通过 `ViewerSettings::validate`
    pub fn new(width: usize, height: usize) -> Self {
        let num_pixels = width * height;

        let depth_buffer = (0..num_pixels)
            .map(|_| AtomicF32::new(f32::INFINITY))
            .collect();

        let color_buffer = (0..num_pixels * 3).map(|_| AtomicU8::new(0)).collect();

        FrameBuffer {
            width,
            height,
            depth_buffer,
            color_buffer,
        }
    }

    /// 重置深度缓冲区并以纯色填充背景
    pub fn clear(&self, background: &Vector3<f32>) {
        self.depth_buffer.par_iter().for_each(|atomic_depth| {
            atomic_depth.store(f32::INFINITY, Ordering::Relaxed);
        });

        let rgb = color_to_u8(background);
        self.color_buffer
            .par_chunks(3)
            .for_each(|pixel| {
                for (channel, value) in pixel.iter().zip(rgb) {
                    channel.store(value, Ordering::Relaxed);
                }
            });
    }

    /// 写入一个像素（调用方已完成深度测试）
    #[inline]
    pub fn write_color(&self, pixel_index: usize, rgb: [u8; 3]) {
        let base = pixel_index * 3;
        self.color_buffer[base].store(rgb[0], Ordering::Relaxed);
        self.color_buffer[base + 1].store(rgb[1], Ordering::Relaxed);
        self.color_buffer[base + 2].store(rgb[2], Ordering::Relaxed);
    }

    /// 读取 (x, y) 处的颜色，越界返回 None
    #[cfg(test)]
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let base = (y * self.width + x) * 3;
        Some([
            self.color_buffer[base].load(Ordering::Relaxed),
            self.color_buffer[base + 1].load(Ordering::Relaxed),
            self.color_buffer[base + 2].load(Ordering::Relaxed),
        ])
    }

    /// 获取颜色缓冲区的字节数据
    pub fn get_color_buffer_bytes(&self) -> Vec<u8> {
        self.color_buffer
            .iter()
            .map(|atomic_color| atomic_color.load(Ordering::Relaxed))
            .collect()
    }
}
