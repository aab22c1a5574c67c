//! GPU uniform buffer for per-frame sky inputs

use bytemuck::{Pod, Zeroable};

use crate::sky::FrameUniforms;

/// Frame uniform data for GPU (must match the `Frame` struct in sky.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct FrameUniformBlock {
    /// Viewport size in physical pixels (8 bytes, offset 0)
    pub viewport: [f32; 2],
    /// Seconds since renderer start (4 bytes, offset 8)
    pub time: f32,
    /// Weather class index (4 bytes, offset 12)
    pub weather: u32,
    /// Time-of-day index (4 bytes, offset 16)
    pub time_of_day: u32,
    /// Style index (4 bytes, offset 20)
    pub style: u32,
    /// Variant, already clamped (4 bytes, offset 24)
    pub variant: u32,
    /// Padding to 32 bytes (4 bytes, offset 28)
    pub _pad: u32,
}

impl From<&FrameUniforms> for FrameUniformBlock {
    fn from(u: &FrameUniforms) -> Self {
        Self {
            viewport: u.viewport.to_array(),
            time: u.time,
            weather: u.weather.index(),
            time_of_day: u.time_of_day.index(),
            style: u.style.index(),
            variant: u.variant.get() as u32,
            _pad: 0,
        }
    }
}

/// GPU buffer for the frame uniform
pub struct UniformBuffer {
    buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl UniformBuffer {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniform"),
            size: std::mem::size_of::<FrameUniformBlock>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<FrameUniformBlock>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group_layout,
            bind_group,
        }
    }

    /// Replace the whole block. Called once per frame, before the draw.
    pub fn update(&self, queue: &wgpu::Queue, block: &FrameUniformBlock) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(block));
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}
