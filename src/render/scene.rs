use super::helpers;
use super::targets::HDR_FORMAT;
use flight_core::ambient::{generate_puffs, generate_starfield, PuffLayout};
use flight_core::{
    AmbientLight, BillboardDraw, Camera, CloudPatch, Layer, Rgb, SceneFrame, SceneId,
    SkylineTexture, STAR_TWINKLE_SPEED,
};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct SceneUniforms {
    view_proj: [[f32; 4]; 4],
    eye_time: [f32; 4],
    fog: [f32; 4],
    sky: [f32; 4],
    ground: [f32; 4],
    cam_right: [f32; 4],
    cam_up: [f32; 4],
    params: [f32; 4], // x: star twinkle speed
}

impl SceneUniforms {
    pub(crate) fn new(camera: &Camera, clock: f32, fog: Rgb, fog_density: f32, light: AmbientLight) -> Self {
        let view = camera.view_matrix();
        // Rows of the view rotation are the camera basis in world space.
        let right = view.row(0).truncate();
        let up = view.row(1).truncate();
        Self {
            view_proj: camera.view_proj().to_cols_array_2d(),
            eye_time: camera.eye.extend(clock).to_array(),
            fog: fog.to_array_with(fog_density),
            sky: light.sky.to_array_with(light.intensity),
            ground: light.ground.to_array_with(light.intensity),
            cam_right: right.extend(0.0).to_array(),
            cam_up: up.extend(0.0).to_array(),
            params: [STAR_TWINKLE_SPEED, 0.0, 0.0, 0.0],
        }
    }
}

trait WithW {
    fn to_array_with(self, w: f32) -> [f32; 4];
}

impl WithW for Rgb {
    fn to_array_with(self, w: f32) -> [f32; 4] {
        [self.r, self.g, self.b, w]
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct BillboardUniforms {
    model: [[f32; 4]; 4],
    tint_opacity: [f32; 4],
    params: [f32; 4], // x: alpha test
}

impl From<&BillboardDraw> for BillboardUniforms {
    fn from(draw: &BillboardDraw) -> Self {
        Self {
            model: draw.model.to_cols_array_2d(),
            tint_opacity: draw.tint.to_array_with(draw.opacity),
            params: [draw.alpha_test, 0.0, 0.0, 0.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct StarInstance {
    offset_size: [f32; 4],
    glow: [f32; 4], // brightness, phase
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct PuffInstance {
    center_scale: [f32; 4],
    look: [f32; 4], // density, spin, patch opacity
}

const INSTANCE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 8]>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRS,
    }
}

struct Billboard {
    uniforms: wgpu::Buffer,
    bind_group: Option<wgpu::BindGroup>,
    _texture: Option<wgpu::Texture>,
}

struct CloudBatch {
    instances: wgpu::Buffer,
    count: u32,
}

/// Scene-layer GPU state: starfield, skyline billboards and cloud patches,
/// all drawn into the HDR target in plan order.
pub(crate) struct SceneResources {
    uniforms: wgpu::Buffer,
    scene_bg: wgpu::BindGroup,
    billboard_bgl: wgpu::BindGroupLayout,
    billboard_pipeline: wgpu::RenderPipeline,
    star_pipeline: wgpu::RenderPipeline,
    cloud_pipeline: wgpu::RenderPipeline,
    stars: wgpu::Buffer,
    star_count: u32,
    billboards: [Billboard; 3],
    clouds: Vec<CloudBatch>,
}

impl SceneResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        clouds: &[CloudPatch],
        star_count: usize,
        seed: u64,
    ) -> Self {
        let uniforms = helpers::uniform_buffer::<SceneUniforms>(device, "scene_uniforms");
        let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("scene_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let scene_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("scene_bg"),
            layout: &scene_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        let billboard_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("billboard_bgl"),
            entries: &[
                helpers::texture_entry(0),
                helpers::sampler_entry(1),
                helpers::uniform_entry(2, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
            ],
        });

        let pl_ambient = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_ambient"),
            bind_group_layouts: &[&scene_bgl],
            push_constant_ranges: &[],
        });
        let pl_billboard = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_billboard"),
            bind_group_layouts: &[&scene_bgl, &billboard_bgl],
            push_constant_ranges: &[],
        });
        let billboard_pipeline = helpers::make_scene_pipeline(
            device,
            &pl_billboard,
            shader,
            ("vs_billboard", "fs_billboard"),
            &[],
            HDR_FORMAT,
        );
        let star_pipeline = helpers::make_scene_pipeline(
            device,
            &pl_ambient,
            shader,
            ("vs_star", "fs_star"),
            &[instance_layout()],
            HDR_FORMAT,
        );
        let cloud_pipeline = helpers::make_scene_pipeline(
            device,
            &pl_ambient,
            shader,
            ("vs_cloud", "fs_cloud"),
            &[instance_layout()],
            HDR_FORMAT,
        );

        let star_data: Vec<StarInstance> = generate_starfield(star_count, seed)
            .iter()
            .map(|s| StarInstance {
                offset_size: s.offset.extend(s.size).to_array(),
                glow: [s.brightness, s.phase, 0.0, 0.0],
            })
            .collect();
        // Zero-sized vertex buffers are rejected; keep one slot around.
        let star_bytes: &[u8] = if star_data.is_empty() {
            &[0u8; std::mem::size_of::<StarInstance>()]
        } else {
            bytemuck::cast_slice(&star_data)
        };
        let stars = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("star_instances"),
            contents: star_bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });

        let clouds = clouds
            .iter()
            .enumerate()
            .map(|(i, patch)| {
                let puffs: PuffLayout = generate_puffs(patch, seed.wrapping_add(i as u64 + 1));
                let data: Vec<PuffInstance> = puffs
                    .iter()
                    .map(|p| PuffInstance {
                        center_scale: (patch.position + p.offset).extend(p.scale).to_array(),
                        look: [p.density, p.spin, patch.opacity, 0.0],
                    })
                    .collect();
                CloudBatch {
                    instances: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("cloud_instances"),
                        contents: bytemuck::cast_slice(&data),
                        usage: wgpu::BufferUsages::VERTEX,
                    }),
                    count: data.len() as u32,
                }
            })
            .collect();

        let billboards = SceneId::ALL.map(|id| Billboard {
            uniforms: helpers::uniform_buffer::<BillboardUniforms>(
                device,
                &format!("billboard_{}", id.name()),
            ),
            bind_group: None,
            _texture: None,
        });

        Self {
            uniforms,
            scene_bg,
            billboard_bgl,
            billboard_pipeline,
            star_pipeline,
            cloud_pipeline,
            stars,
            star_count: star_data.len() as u32,
            billboards,
            clouds,
        }
    }

    /// Bind a rasterized skyline to its billboard. Scenes without a texture
    /// are skipped when drawing.
    pub(crate) fn attach_skyline(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        sampler: &wgpu::Sampler,
        skyline: &SkylineTexture,
    ) {
        let (texture, view) = helpers::upload_skyline(device, queue, skyline);
        let slot = &mut self.billboards[skyline.scene().index()];
        slot.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("billboard_bg"),
            layout: &self.billboard_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: slot.uniforms.as_entire_binding(),
                },
            ],
        }));
        slot._texture = Some(texture);
    }

    /// Write uniforms for `frame` and record its layers into the HDR target.
    pub(crate) fn record(
        &self,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        hdr_view: &wgpu::TextureView,
        frame: &SceneFrame,
        aspect: f32,
        fog_density: f32,
    ) {
        let light = frame
            .plan
            .layers
            .iter()
            .find_map(|l| match l {
                Layer::Environment(light) => Some(*light),
                _ => None,
            })
            .unwrap_or(flight_core::NIGHT_ENVIRONMENT);
        let camera = Camera::looking_down_flight(frame.viewpoint, aspect);
        let uniforms = SceneUniforms::new(&camera, frame.clock, frame.background, fog_density, light);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
        for draw in frame.plan.billboards() {
            let slot = &self.billboards[draw.scene.index()];
            queue.write_buffer(&slot.uniforms, 0, bytemuck::bytes_of(&BillboardUniforms::from(draw)));
        }

        let bg = frame.background;
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("scene_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: hdr_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: bg.r as f64,
                        g: bg.g as f64,
                        b: bg.b as f64,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rpass.set_bind_group(0, &self.scene_bg, &[]);
        for layer in &frame.plan.layers {
            match layer {
                Layer::Starfield if self.star_count > 0 => {
                    rpass.set_pipeline(&self.star_pipeline);
                    rpass.set_vertex_buffer(0, self.stars.slice(..));
                    rpass.draw(0..6, 0..self.star_count);
                }
                Layer::Billboard(draw) => {
                    let Some(bind_group) = &self.billboards[draw.scene.index()].bind_group else {
                        continue;
                    };
                    rpass.set_pipeline(&self.billboard_pipeline);
                    rpass.set_bind_group(1, bind_group, &[]);
                    rpass.draw(0..6, 0..1);
                }
                Layer::Clouds(draw) => {
                    let Some(batch) = self.clouds.get(draw.patch) else {
                        continue;
                    };
                    rpass.set_pipeline(&self.cloud_pipeline);
                    rpass.set_vertex_buffer(0, batch.instances.slice(..));
                    rpass.draw(0..6, 0..batch.count);
                }
                _ => {}
            }
        }
    }
}
