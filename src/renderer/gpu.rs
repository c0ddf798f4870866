//! WebGPU renderer
//!
//! Owns the surface and device. Sprites are collected between `begin_scene`
//! and `end_scene`, drawn into the offscreen scene target, and composited to
//! the surface by the post processor.

use glam::{Vec2, Vec4};

use super::Renderer;
use super::post_process::PostProcessor;
use super::sprite_pipeline::{Blend, SpriteBatch, SpriteInstance, SpritePipeline};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::sim::{Effects, Sprite};

pub struct GpuRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    sprites: SpritePipeline,
    post: PostProcessor,
    batch: SpriteBatch,
    /// Surface size in physical pixels
    pub size: (u32, u32),
}

impl GpuRenderer {
    /// Configure `surface` at `width` x `height` and build the pipelines.
    /// The playfield size and MSAA level come from `settings`.
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        settings: &Settings,
    ) -> Result<Self> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("breakout-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(Error::SurfaceUnsupported)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sample_count = settings.quality.msaa_samples();
        let playfield = Vec2::new(settings.screen_width, settings.screen_height);
        let sprites = SpritePipeline::new(&device, surface_format, sample_count, playfield);
        let post = PostProcessor::new(
            &device,
            surface_format,
            config.width,
            config.height,
            sample_count,
        );

        log::info!(
            "Renderer ready: {}x{} surface, {}x MSAA, {} preset",
            config.width,
            config.height,
            sample_count,
            settings.quality.as_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprites,
            post,
            batch: SpriteBatch::default(),
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
            self.post.resize(&self.device, new_width, new_height);
        }
    }

    fn present(&mut self, effects: &Effects, time: f32) -> std::result::Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("composite_encoder"),
            });
        self.post
            .render(&self.queue, &mut encoder, &view, effects, time);

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl Renderer for GpuRenderer {
    fn begin_scene(&mut self) {
        self.batch.clear();
    }

    fn draw_sprite(&mut self, sprite: Sprite, position: Vec2, size: Vec2, rotation: f32, color: Vec4) {
        let blend = if sprite == Sprite::Particle {
            Blend::Additive
        } else {
            Blend::Alpha
        };
        self.batch.push(
            SpriteInstance::new(sprite, position, size, rotation, color),
            blend,
        );
    }

    fn end_scene(&mut self) {
        self.sprites.upload(&self.device, &self.queue, &self.batch);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });

        {
            let (view, resolve_target) = self.post.scene_attachment();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.sprites.draw(&mut render_pass, &self.batch);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn composite(&mut self, effects: &Effects, time: f32) {
        match self.present(effects, time) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.resize(self.size.0, self.size.1);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory!");
            }
            Err(e) => log::warn!("Render error: {:?}", e),
        }
    }
}
