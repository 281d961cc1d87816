use glam::{Mat4, Vec3, Vec4};
use tinsel_core::sprites::PixelBuffer;
use tinsel_core::{
    ParticleGroup, CAMERA_FOVY_DEG, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR,
};
use web_sys as web;
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SpriteInstance {
    center_size: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GroupUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct QuadUniforms {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    tint: [f32; 4],
}

/// One particle group on the GPU: instance buffer, per-group uniforms, and
/// the sprite texture it samples.
pub struct SpriteBatch {
    instances: wgpu::Buffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: u32,
    count: u32,
    additive: bool,
}

/// One textured quad (photo plane, border, or banner) with its own uniforms.
pub struct Quad {
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    sprite_additive_pipeline: wgpu::RenderPipeline,
    sprite_normal_pipeline: wgpu::RenderPipeline,
    quad_pipeline: wgpu::RenderPipeline,
    sprite_bgl: wgpu::BindGroupLayout,
    quad_bgl: wgpu::BindGroupLayout,
    linear_sampler: wgpu::Sampler,

    width: u32,
    height: u32,
    clear_color: wgpu::Color,
    cam_eye: Vec3,
    cam_target: Vec3,
}

impl GpuState<'static> {
    /// The surface takes an owned handle to the canvas, so the returned
    /// state does not borrow it.
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Use default limits on web to avoid passing unknown fields to older WebGPU impls
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        // Uniform + texture + sampler layout, shared by both shader families.
        let make_bgl = |label: &str| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: None,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
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
            })
        };
        let sprite_bgl = make_bgl("sprite_bgl");
        let quad_bgl = make_bgl("quad_bgl");

        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(tinsel_core::SPRITES_WGSL.into()),
        });
        let quad_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(tinsel_core::QUAD_WGSL.into()),
        });

        let sprite_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pl"),
            bind_group_layouts: &[&sprite_bgl],
            push_constant_ranges: &[],
        });
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 16,
                    shader_location: 1,
                },
            ],
        };
        // Glow particles add light; gift sprites are opaque boxes.
        let additive_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };
        let make_sprite_pipeline = |label: &str, blend: wgpu::BlendState| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&sprite_pl),
                vertex: wgpu::VertexState {
                    module: &sprite_shader,
                    entry_point: Some("vs_sprite"),
                    buffers: std::slice::from_ref(&instance_layout),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState::default(),
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &sprite_shader,
                    entry_point: Some("fs_sprite"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };
        let sprite_additive_pipeline =
            make_sprite_pipeline("sprite_additive", additive_blend);
        let sprite_normal_pipeline =
            make_sprite_pipeline("sprite_normal", wgpu::BlendState::ALPHA_BLENDING);

        let quad_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pl"),
            bind_group_layouts: &[&quad_bgl],
            push_constant_ranges: &[],
        });
        let quad_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&quad_pl),
            vertex: wgpu::VertexState {
                module: &quad_shader,
                entry_point: Some("vs_quad"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &quad_shader,
                entry_point: Some("fs_quad"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprite_additive_pipeline,
            sprite_normal_pipeline,
            quad_pipeline,
            sprite_bgl,
            quad_bgl,
            linear_sampler,
            width,
            height,
            clear_color: wgpu::Color::BLACK,
            cam_eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            cam_target: Vec3::ZERO,
        })
    }

    pub fn eye(&self) -> Vec3 {
        self.cam_eye
    }

    fn view_proj(&self) -> Mat4 {
        let aspect = self.width as f32 / self.height.max(1) as f32;
        let proj = Mat4::perspective_rh(
            CAMERA_FOVY_DEG.to_radians(),
            aspect,
            CAMERA_ZNEAR,
            CAMERA_ZFAR,
        );
        let view = Mat4::look_at_rh(self.cam_eye, self.cam_target, Vec3::Y);
        proj * view
    }

    /// Upload an RGBA8 pixel buffer as a filterable texture view.
    pub fn upload_rgba(&self, pixels: &PixelBuffer) -> wgpu::TextureView {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("rgba_tex"),
            size: wgpu::Extent3d {
                width: pixels.width,
                height: pixels.height,
                depth_or_array_layers: 1,
            },
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
            &pixels.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(pixels.width * 4),
                rows_per_image: Some(pixels.height),
            },
            wgpu::Extent3d {
                width: pixels.width,
                height: pixels.height,
                depth_or_array_layers: 1,
            },
        );
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn create_sprite_batch(
        &self,
        capacity: usize,
        pixels: &PixelBuffer,
        additive: bool,
    ) -> SpriteBatch {
        let instances = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_instances"),
            size: (capacity * std::mem::size_of::<SpriteInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniforms = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sprite_uniforms"),
            size: std::mem::size_of::<GroupUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let view = self.upload_rgba(pixels);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_bg"),
            layout: &self.sprite_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.linear_sampler),
                },
            ],
        });
        SpriteBatch {
            instances,
            uniforms,
            bind_group,
            capacity: capacity as u32,
            count: 0,
            additive,
        }
    }

    /// Push a particle group's current frame into its GPU batch.
    pub fn write_sprite_batch(&self, batch: &mut SpriteBatch, group: &ParticleGroup) {
        let count = group.len().min(batch.capacity as usize);
        let mut data = Vec::with_capacity(count);
        for i in 0..count {
            let p = group.positions[i];
            let c = group.colors[i];
            data.push(SpriteInstance {
                center_size: [p.x, p.y, p.z, group.sizes[i]],
                color: [c[0], c[1], c[2], 1.0],
            });
        }
        batch.count = count as u32;
        self.queue
            .write_buffer(&batch.instances, 0, bytemuck::cast_slice(&data));

        let model = Mat4::from_rotation_y(group.rotation_y)
            * Mat4::from_scale(Vec3::splat(group.scale));
        let u = GroupUniforms {
            view_proj: self.view_proj().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            cam_right: [1.0, 0.0, 0.0, 0.0],
            cam_up: [0.0, 1.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&batch.uniforms, 0, bytemuck::bytes_of(&u));
    }

    pub fn create_quad(&self, view: &wgpu::TextureView) -> Quad {
        let uniforms = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_uniforms"),
            size: std::mem::size_of::<QuadUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_bg"),
            layout: &self.quad_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.linear_sampler),
                },
            ],
        });
        Quad {
            uniforms,
            bind_group,
        }
    }

    pub fn write_quad(&self, quad: &Quad, model: Mat4, tint: Vec4) {
        let u = QuadUniforms {
            view_proj: self.view_proj().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            tint: tint.to_array(),
        };
        self.queue
            .write_buffer(&quad.uniforms, 0, bytemuck::bytes_of(&u));
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw one frame: particle batches first, then quads in caller order
    /// (borders behind photos, banners last). No depth buffer; painter's
    /// order is the contract.
    pub fn render(
        &mut self,
        batches: &[SpriteBatch],
        quads: &[&Quad],
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            for batch in batches {
                if batch.count == 0 {
                    continue;
                }
                let pipeline = if batch.additive {
                    &self.sprite_additive_pipeline
                } else {
                    &self.sprite_normal_pipeline
                };
                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, &batch.bind_group, &[]);
                rpass.set_vertex_buffer(0, batch.instances.slice(..));
                rpass.draw(0..6, 0..batch.count);
            }
            rpass.set_pipeline(&self.quad_pipeline);
            for quad in quads {
                rpass.set_bind_group(0, &quad.bind_group, &[]);
                rpass.draw(0..6, 0..1);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Model matrix for a plane at `position`, scaled to `size` world units,
/// turned to face the camera eye.
pub fn billboard_model(position: Vec3, size: glam::Vec2, scale: f32, eye: Vec3) -> Mat4 {
    let forward = (eye - position).normalize_or_zero();
    let right = Vec3::Y.cross(forward).normalize_or_zero();
    let up = forward.cross(right);
    let rotation = Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        forward.extend(0.0),
        Vec4::W,
    );
    Mat4::from_translation(position)
        * rotation
        * Mat4::from_scale(Vec3::new(size.x * scale, size.y * scale, 1.0))
}
