//! Instanced sprite pipeline
//!
//! Every sprite is one instance of a six-vertex quad. The shader shades each
//! `Sprite` kind procedurally, so no textures are needed for the scene.
//! Particles go through a second pipeline with additive blending.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};
use wgpu::util::DeviceExt;

use crate::sim::Sprite;

/// Instances the buffer holds before it has to grow
const INITIAL_CAPACITY: usize = 1024;

// ============================================================================
// GPU DATA STRUCTURES (must match sprite.wgsl)
// ============================================================================

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct Globals {
    /// Logical playfield size in pixels
    screen_size: [f32; 2],
    _pad: [f32; 2],
}

/// Per-instance sprite data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    /// Top-left corner in playfield pixels
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    /// Radians around the quad centre
    pub rotation: f32,
    /// `Sprite::shader_index`
    pub kind: u32,
    _pad: [u32; 2],
}

impl SpriteInstance {
    pub fn new(sprite: Sprite, position: Vec2, size: Vec2, rotation: f32, color: Vec4) -> Self {
        Self {
            position: position.to_array(),
            size: size.to_array(),
            color: color.to_array(),
            rotation,
            kind: sprite.shader_index(),
            _pad: [0; 2],
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
            0 => Float32x2,
            1 => Float32x2,
            2 => Float32x4,
            3 => Float32,
            4 => Uint32,
        ];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &ATTRIBUTES,
        }
    }
}

/// How a run of instances is blended onto the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    Alpha,
    Additive,
}

/// Consecutive instances sharing a blend mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub blend: Blend,
    pub range: Range<u32>,
}

/// CPU-side list of instances for one scene, in draw order
#[derive(Debug, Clone, Default)]
pub struct SpriteBatch {
    pub instances: Vec<SpriteInstance>,
    pub runs: Vec<Run>,
}

impl SpriteBatch {
    pub fn clear(&mut self) {
        self.instances.clear();
        self.runs.clear();
    }

    /// Append an instance, extending the last run when the blend matches
    pub fn push(&mut self, instance: SpriteInstance, blend: Blend) {
        let index = self.instances.len() as u32;
        self.instances.push(instance);
        match self.runs.last_mut() {
            Some(run) if run.blend == blend => run.range.end = index + 1,
            _ => self.runs.push(Run {
                blend,
                range: index..index + 1,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

pub struct SpritePipeline {
    alpha_pipeline: wgpu::RenderPipeline,
    additive_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
}

impl SpritePipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        sample_count: u32,
        screen_size: Vec2,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("sprite.wgsl").into()),
        });

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sprite_globals"),
            contents: bytemuck::bytes_of(&Globals {
                screen_size: screen_size.to_array(),
                _pad: [0.0; 2],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("sprite_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let alpha_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            sample_count,
            wgpu::BlendState::ALPHA_BLENDING,
            "sprite_alpha_pipeline",
        );

        // src * src_alpha + dst
        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let additive_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            format,
            sample_count,
            wgpu::BlendState {
                color: additive,
                alpha: additive,
            },
            "sprite_additive_pipeline",
        );

        let instance_buffer = Self::create_instance_buffer(device, INITIAL_CAPACITY);

        Self {
            alpha_pipeline,
            additive_pipeline,
            globals_buffer,
            bind_group,
            instance_buffer,
            capacity: INITIAL_CAPACITY,
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        format: wgpu::TextureFormat,
        sample_count: u32,
        blend: wgpu::BlendState,
        label: &str,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[SpriteInstance::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview_mask: None,
            cache: None,
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_instances"),
            size: (std::mem::size_of::<SpriteInstance>() * capacity) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Copy the batch's instances to the GPU, growing the buffer if needed
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, batch: &SpriteBatch) {
        if batch.instances.len() > self.capacity {
            self.capacity = batch.instances.len().next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(device, self.capacity);
            log::debug!("Sprite instance buffer grown to {}", self.capacity);
        }
        if !batch.is_empty() {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                bytemuck::cast_slice(&batch.instances),
            );
        }
    }

    /// Draw every run of an uploaded batch, in order
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>, batch: &SpriteBatch) {
        if batch.is_empty() {
            return;
        }
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        for run in &batch.runs {
            let pipeline = match run.blend {
                Blend::Alpha => &self.alpha_pipeline,
                Blend::Additive => &self.additive_pipeline,
            };
            pass.set_pipeline(pipeline);
            pass.draw(0..6, run.range.clone());
        }
    }
}
