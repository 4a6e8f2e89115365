//! Renderer-side sinks for the displacement field: wgpu texture and PNG export.

use std::path::Path;
use std::sync::Arc;

use crate::ocean::{DisplacementField, DisplacementSink, WaveGrid};
use crate::params::TextureConfig;

/// Device and queue for headless uploads
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: Arc<wgpu::Queue>,
}

impl GpuContext {
    /// Create a device without a window surface
    pub async fn headless() -> Result<Self, String> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok_or("Failed to find suitable GPU adapter")?;

        // Linear filtering of R32Float needs an optional feature
        let required_features = adapter.features() & wgpu::Features::FLOAT32_FILTERABLE;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Ocean Device"),
                    required_features,
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await
            .map_err(|e| format!("Failed to request device: {}", e))?;

        log::info!("GPU: {}", adapter.get_info().name);

        Ok(Self {
            device,
            queue: Arc::new(queue),
        })
    }
}

/// Single-channel 32-bit float texture holding the displacement field
///
/// Addressed with repeat wrapping so the ocean tiles seamlessly.
pub struct DisplacementTexture {
    queue: Arc<wgpu::Queue>,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    filterable: bool,
    grid: WaveGrid,
}

impl DisplacementTexture {
    pub fn new(ctx: &GpuContext, grid: WaveGrid, config: &TextureConfig) -> Self {
        let filterable = config.prefer_linear
            && ctx
                .device
                .features()
                .contains(wgpu::Features::FLOAT32_FILTERABLE);
        if config.prefer_linear && !filterable {
            log::warn!("R32Float is not filterable on this device, using nearest sampling");
        }
        let filter = if filterable {
            wgpu::FilterMode::Linear
        } else {
            wgpu::FilterMode::Nearest
        };

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(config.label.as_str()),
            size: extent(grid),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Displacement Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        Self {
            queue: Arc::clone(&ctx.queue),
            texture,
            view,
            sampler,
            filterable,
            grid,
        }
    }

    /// Bind group layout: texture at binding 0, sampler at binding 1
    pub fn bind_group_layout(&self, device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Displacement Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float {
                            filterable: self.filterable,
                        },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(if self.filterable {
                        wgpu::SamplerBindingType::Filtering
                    } else {
                        wgpu::SamplerBindingType::NonFiltering
                    }),
                    count: None,
                },
            ],
        })
    }

    pub fn bind_group(
        &self,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Displacement Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&self.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        })
    }

    /// Copy the texture back to the CPU (blocking)
    pub fn read_back(&self, device: &wgpu::Device) -> Vec<f32> {
        let width = self.grid.width() as u32;
        let height = self.grid.height() as u32;
        let bytes_per_texel = 4; // R32Float
        let unpadded_bytes_per_row = width * bytes_per_texel;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded_bytes_per_row = unpadded_bytes_per_row.div_ceil(align) * align;

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Displacement Readback Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Displacement Readback Encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::ImageCopyBuffer {
                buffer: &buffer,
                layout: wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            extent(self.grid),
        );

        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, |_| {});
        device.poll(wgpu::Maintain::Wait);

        let data = buffer_slice.get_mapped_range();
        let mut heights = Vec::with_capacity(self.grid.len());

        // Remove row padding
        for y in 0..height {
            let offset = (y * padded_bytes_per_row) as usize;
            let row = &data[offset..offset + unpadded_bytes_per_row as usize];
            heights.extend_from_slice(bytemuck::cast_slice::<u8, f32>(row));
        }

        drop(data);
        buffer.unmap();
        heights
    }
}

impl DisplacementSink for DisplacementTexture {
    fn upload(&mut self, field: &DisplacementField) {
        debug_assert_eq!(field.grid(), self.grid, "field and texture sizes differ");
        let width = self.grid.width() as u32;
        let height = self.grid.height() as u32;

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            field.as_bytes(),
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            extent(self.grid),
        );
    }
}

fn extent(grid: WaveGrid) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: grid.width() as u32,
        height: grid.height() as u32,
        depth_or_array_layers: 1,
    }
}

/// Save a field as an 8-bit grayscale heightmap, stretched to its own min..max
pub fn export_heightmap(field: &DisplacementField, path: impl AsRef<Path>) -> Result<(), String> {
    let stats = field.stats();
    let range = stats.max - stats.min;
    let width = field.width() as u32;
    let height = field.height() as u32;

    let heightmap = image::GrayImage::from_fn(width, height, |x, y| {
        let h = field.get(x as isize, y as isize);
        let level = if range > 0.0 {
            ((h - stats.min) / range * 255.0).round() as u8
        } else {
            128
        };
        image::Luma([level])
    });

    heightmap
        .save(path.as_ref())
        .map_err(|e| format!("Failed to save {}: {}", path.as_ref().display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::DisplacementPublisher;

    /// Per-process temp path so parallel suite runs do not share files
    fn temp_png(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("wavefield_{}_{}.png", name, std::process::id()))
    }

    /// Headless device, or `None` when the machine has no usable adapter
    fn init_gpu() -> Option<GpuContext> {
        match pollster::block_on(GpuContext::headless()) {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                eprintln!("Skipping GPU test: {}", e);
                None
            }
        }
    }

    #[test]
    fn test_texture_upload_round_trips_non_square_field() {
        let Some(ctx) = init_gpu() else {
            return;
        };

        // 8 texels = 32 bytes per row, far below the 256-byte copy alignment
        let grid = WaveGrid::new(8, 4).unwrap();
        let raw: Vec<f32> = (0..grid.len()).map(|i| i as f32 * 0.75 - 7.0).collect();
        let mut publisher = DisplacementPublisher::new(grid);
        let field = publisher.publish(&raw);

        let mut texture = DisplacementTexture::new(&ctx, grid, &TextureConfig::default());
        texture.upload(field);
        assert_eq!(texture.read_back(&ctx.device), field.as_slice());
    }

    #[test]
    fn test_bind_group_follows_device_filtering() {
        let Some(ctx) = init_gpu() else {
            return;
        };
        let grid = WaveGrid::new(4, 4).unwrap();
        let device_filterable = ctx
            .device
            .features()
            .contains(wgpu::Features::FLOAT32_FILTERABLE);

        let linear = DisplacementTexture::new(&ctx, grid, &TextureConfig::default());
        assert_eq!(linear.filterable, device_filterable);

        let nearest = DisplacementTexture::new(
            &ctx,
            grid,
            &TextureConfig {
                prefer_linear: false,
                ..Default::default()
            },
        );
        assert!(!nearest.filterable);

        // wgpu panics on validation errors, so a mismatched layout fails here
        for texture in [&linear, &nearest] {
            let layout = texture.bind_group_layout(&ctx.device);
            let _bind_group = texture.bind_group(&ctx.device, &layout);
        }
        ctx.device.poll(wgpu::Maintain::Wait);
    }

    #[test]
    fn test_export_heightmap_dimensions() {
        let grid = WaveGrid::new(8, 4).unwrap();
        let raw: Vec<f32> = (0..grid.len()).map(|i| i as f32).collect();
        let mut publisher = DisplacementPublisher::new(grid);
        let field = publisher.publish(&raw);

        let path = temp_png("export");
        export_heightmap(field, &path).unwrap();

        let image = image::open(&path).unwrap().to_luma8();
        assert_eq!(image.dimensions(), (8, 4));
        assert_eq!(image.get_pixel(0, 0).0[0], 0);
        assert_eq!(image.get_pixel(7, 3).0[0], 255);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_export_flat_field_is_mid_gray() {
        let grid = WaveGrid::new(2, 2).unwrap();
        let publisher = DisplacementPublisher::new(grid);

        let path = temp_png("flat");
        export_heightmap(publisher.field(), &path).unwrap();

        let image = image::open(&path).unwrap().to_luma8();
        assert!(image.pixels().all(|p| p.0[0] == 128));
        let _ = std::fs::remove_file(&path);
    }
}
