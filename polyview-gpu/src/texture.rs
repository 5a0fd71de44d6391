//! Texture upload and asynchronous remote fetching

use image::RgbaImage;
use polyview_core::{Error, Result};

/// Upload an RGBA image as a 2D sRGB texture.
pub fn upload_rgba(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &RgbaImage,
    label: &str,
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: image.width(),
        height: image.height(),
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image.as_raw(),
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * image.width()),
            rows_per_image: Some(image.height()),
        },
        size,
    );

    texture
}

/// 1x1 white image used until a remote texture resolves.
pub fn placeholder_rgba() -> RgbaImage {
    RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]))
}

/// An in-flight fetch of a remote texture image.
///
/// The fetch runs on a worker thread and hands its result over a bounded
/// channel, polled with [`try_take`](Self::try_take). Dropping the loader
/// cancels delivery: the worker's send fails and the thread exits without
/// touching anything else.
pub struct TextureLoader {
    receiver: flume::Receiver<Result<RgbaImage>>,
}

impl TextureLoader {
    /// Start fetching `url` in the background.
    pub fn fetch(url: &str) -> Self {
        let (sender, receiver) = flume::bounded(1);
        let url = url.to_owned();
        std::thread::spawn(move || {
            tracing::debug!(%url, "fetching texture");
            let result = fetch_and_decode(&url);
            let _ = sender.send(result);
        });
        Self { receiver }
    }

    /// Non-blocking poll; yields the result at most once.
    pub fn try_take(&self) -> Option<Result<RgbaImage>> {
        self.receiver.try_recv().ok()
    }
}

fn fetch_and_decode(url: &str) -> Result<RgbaImage> {
    let response = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(|e| Error::Texture(format!("fetch {url}: {e}")))?;
    let bytes = response
        .bytes()
        .map_err(|e| Error::Texture(format!("read {url}: {e}")))?;
    let image = image::load_from_memory(&bytes)
        .map_err(|e| Error::Texture(format!("decode {url}: {e}")))?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_is_single_white_pixel() {
        let image = placeholder_rgba();
        assert_eq!(image.dimensions(), (1, 1));
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_loader_cancellation_on_drop() {
        // dropping the loader must not panic the worker; the send just fails
        let loader = TextureLoader::fetch("http://127.0.0.1:9/unreachable.png");
        drop(loader);
    }

    #[test]
    fn test_failed_fetch_reports_texture_error() {
        // port 9 (discard) refuses connections immediately
        let loader = TextureLoader::fetch("http://127.0.0.1:9/unreachable.png");
        let result = loader.receiver.recv().unwrap();
        assert!(matches!(result, Err(Error::Texture(_))));
    }
}
