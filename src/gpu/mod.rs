//! Native wgpu renderer for scene frames.
//!
//! Everything is drawn as instanced, additively blended sprites with no depth
//! buffer; the photo is a separate textured quad drawn on top in Image mode.
//! [`pack_frame`] does the CPU-side translation from a [`Frame`] to GPU
//! instances and is usable without a device.

mod shaders;

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::{billboard_rotation, Camera};
use crate::error::GpuError;
use crate::instance::Instance;
use crate::mode::SceneMode;
use crate::photo::{Photo, PhotoView};
use crate::scene::Frame;

pub use shaders::{PHOTO_SHADER, SCENE_SHADER};

/// Sprite half-sizes in local units.
pub const PARTICLE_SIZE: f32 = 0.12;
pub const ELF_SIZE: f32 = 0.2;
pub const STAR_SIZE: f32 = 1.5;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0017,
    g: 0.0017,
    b: 0.0017,
    a: 1.0,
};

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PhotoUniforms {
    transform: [[f32; 4]; 4],
}

/// One sprite as uploaded to the instance buffer.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct GpuInstance {
    /// Column-major local-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// sRGB color; `w` is the sprite half-size.
    pub color: [f32; 4],
}

impl GpuInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }

    fn new(model: Mat4, instance: &Instance, size: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [instance.color.x, instance.color.y, instance.color.z, size],
        }
    }
}

/// Translate a frame into GPU instances, replacing the contents of `out`.
///
/// Group rotations are folded into each model matrix. Particles are turned to
/// face `eye` again after their group rotation so the sprites never go
/// edge-on.
pub fn pack_frame(frame: &Frame<'_>, eye: Vec3, out: &mut Vec<GpuInstance>) {
    out.clear();

    out.extend(frame.particles.iter().map(|p| {
        let world = frame.field_rotation * p.position;
        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(p.scale),
            billboard_rotation(world, eye),
            world,
        );
        GpuInstance::new(model, p, PARTICLE_SIZE)
    }));

    let elf_group = Mat4::from_quat(frame.elf_rotation);
    out.extend(
        frame
            .elves
            .iter()
            .map(|e| GpuInstance::new(elf_group * e.model_matrix(), e, ELF_SIZE)),
    );

    if let Some(star) = &frame.star {
        out.push(GpuInstance::new(star.model_matrix(), star, STAR_SIZE));
    }
}

struct PhotoTexture {
    bind_group: wgpu::BindGroup,
    size: Vec2,
}

/// Window surface plus the two pipelines.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    scene_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instances: Vec<GpuInstance>,
    photo_pipeline: wgpu::RenderPipeline,
    photo_bind_group_layout: wgpu::BindGroupLayout,
    photo_uniform_buffer: wgpu::Buffer,
    photo_sampler: wgpu::Sampler,
    photo: Option<PhotoTexture>,
}

impl Renderer {
    /// Set up the device and pipelines for `window`.
    ///
    /// `capacity` is the most sprites a frame may hold.
    pub async fn new(window: Arc<Window>, capacity: usize) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;
        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Uniform Bind Group Layout"),
                entries: &[uniform_layout_entry(0)],
            });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Uniform Bind Group"),
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let instance_capacity = capacity.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (instance_capacity * std::mem::size_of::<GpuInstance>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let additive = wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        };
        let scene_pipeline = create_pipeline(
            &device,
            "Scene",
            SCENE_SHADER,
            &uniform_bind_group_layout,
            &[GpuInstance::layout()],
            config.format,
            wgpu::BlendState {
                color: additive,
                alpha: additive,
            },
        );

        let photo_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Photo Bind Group Layout"),
                entries: &[
                    uniform_layout_entry(0),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let photo_pipeline = create_pipeline(
            &device,
            "Photo",
            PHOTO_SHADER,
            &photo_bind_group_layout,
            &[],
            config.format,
            wgpu::BlendState::ALPHA_BLENDING,
        );

        let photo_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Photo Uniform Buffer"),
            contents: bytemuck::bytes_of(&PhotoUniforms {
                transform: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let photo_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Photo Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene_pipeline,
            uniform_buffer,
            uniform_bind_group,
            instance_buffer,
            instance_capacity,
            instances: Vec::with_capacity(instance_capacity),
            photo_pipeline,
            photo_bind_group_layout,
            photo_uniform_buffer,
            photo_sampler,
            photo: None,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Upload `photo`, replacing any previous one.
    pub fn set_photo(&mut self, photo: &Photo) {
        let size = wgpu::Extent3d {
            width: photo.width,
            height: photo.height,
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Photo Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &photo.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * photo.width),
                rows_per_image: Some(photo.height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Photo Bind Group"),
            layout: &self.photo_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.photo_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.photo_sampler),
                },
            ],
        });

        self.photo = Some(PhotoTexture {
            bind_group,
            size: Vec2::new(photo.width as f32, photo.height as f32),
        });
    }

    /// Draw one frame. The photo is drawn only in Image mode.
    pub fn render(
        &mut self,
        camera: &Camera,
        frame: &Frame<'_>,
        photo_view: &PhotoView,
    ) -> Result<(), wgpu::SurfaceError> {
        pack_frame(frame, camera.position, &mut self.instances);
        if self.instances.len() > self.instance_capacity {
            log::warn!(
                "Frame has {} sprites, drawing the first {}",
                self.instances.len(),
                self.instance_capacity
            );
            self.instances.truncate(self.instance_capacity);
        }

        let uniforms = Uniforms {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));

        let show_photo = frame.mode == SceneMode::Image;
        if let (true, Some(photo)) = (show_photo, &self.photo) {
            let viewport = Vec2::new(self.config.width as f32, self.config.height as f32);
            let photo_uniforms = PhotoUniforms {
                transform: photo_view.clip_transform(photo.size, viewport).to_cols_array_2d(),
            };
            self.queue.write_buffer(
                &self.photo_uniform_buffer,
                0,
                bytemuck::bytes_of(&photo_uniforms),
            );
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.scene_pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            render_pass.draw(0..6, 0..self.instances.len() as u32);

            if let (true, Some(photo)) = (show_photo, &self.photo) {
                render_pass.set_pipeline(&self.photo_pipeline);
                render_pass.set_bind_group(0, &photo.bind_group, &[]);
                render_pass.draw(0..6, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    name: &str,
    source: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    buffers: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
    blend: wgpu::BlendState,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{name} Shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{name} Pipeline Layout")),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{name} Pipeline")),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
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
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
