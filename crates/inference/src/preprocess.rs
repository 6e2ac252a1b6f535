//! Image decoding and tensor preparation.
//!
//! Both models take NCHW float tensors. The detector wants plain `[0, 1]`
//! scaling; the classifier wants ImageNet mean/std normalization. Resizing
//! is a plain stretch to the square input size, so detector boxes map back
//! to source pixels with an independent scale per axis.

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::InferenceError;

/// Per-channel mean used when the classifier was trained.
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// Per-channel standard deviation used when the classifier was trained.
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode uploaded bytes into an image, sniffing the format.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Resize to `size`x`size` and emit a planar CHW tensor scaled to `[0, 1]`.
pub fn to_nchw_scaled(image: &DynamicImage, size: u32) -> Vec<f32> {
    chw_planes(image, size, |value, _channel| value / 255.0)
}

/// Resize to `size`x`size` and emit a planar CHW tensor with ImageNet
/// normalization applied per channel.
pub fn to_nchw_imagenet(image: &DynamicImage, size: u32) -> Vec<f32> {
    chw_planes(image, size, |value, channel| {
        (value / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel]
    })
}

fn chw_planes(
    image: &DynamicImage,
    size: u32,
    normalize: impl Fn(f32, usize) -> f32,
) -> Vec<f32> {
    let resized = image
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();
    let pixels = (size * size) as usize;
    let mut data = vec![0.0f32; 3 * pixels];
    for (i, pixel) in resized.pixels().enumerate() {
        for channel in 0..3 {
            data[channel * pixels + i] = normalize(f32::from(pixel.0[channel]), channel);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn two_by_two() -> DynamicImage {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([0, 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn scaled_tensor_is_planar_chw() {
        let data = to_nchw_scaled(&two_by_two(), 2);
        assert_eq!(data.len(), 3 * 2 * 2);
        // Red plane: only the top-left pixel is lit.
        assert_eq!(&data[0..4], &[1.0, 0.0, 0.0, 0.0]);
        // Green plane: only the top-right pixel.
        assert_eq!(&data[4..8], &[0.0, 1.0, 0.0, 0.0]);
        // Blue plane: only the bottom-left pixel.
        assert_eq!(&data[8..12], &[0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn imagenet_tensor_normalizes_per_channel() {
        let data = to_nchw_imagenet(&two_by_two(), 2);
        let expected_red = (1.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        let expected_zero_red = (0.0 - IMAGENET_MEAN[0]) / IMAGENET_STD[0];
        assert!((data[0] - expected_red).abs() < 1e-6);
        assert!((data[1] - expected_zero_red).abs() < 1e-6);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_image(b"not an image").is_err());
    }

    #[test]
    fn decode_accepts_png_bytes() {
        let mut bytes = Vec::new();
        two_by_two()
            .write_to(
                &mut std::io::Cursor::new(&mut bytes),
                image::ImageFormat::Png,
            )
            .unwrap();
        let decoded = decode_image(&bytes).unwrap();
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
    }
}
