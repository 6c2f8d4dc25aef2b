//! # 像素访问模块
//!
//! 定义隐写算法依赖的 [`Raster`] 能力接口，以及基于 `image` 的具体实现。
//! 编解码只通过该接口逐通道读写，不依赖具体的图像库类型。

use crate::constants::{LUMA_ALPHA_EXTENSIONS, LUMA_EXTENSIONS};
use image::{DynamicImage, GrayAlphaImage, GrayImage, ImageBuffer, Pixel, RgbImage, RgbaImage};

/// 可按 `(x, y, channel)` 读写 8 位通道值的像素缓冲区。
pub trait Raster {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// 每个像素的通道数，例如 RGB 为 3，RGBA 为 4。
    fn channel_count(&self) -> u8;

    fn channel(&self, x: u32, y: u32, channel: u8) -> u8;

    fn set_channel(&mut self, x: u32, y: u32, channel: u8, value: u8);

    /// 可用于隐写的通道总数 (`width * height * channel_count`)。
    fn capacity(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height()) * u64::from(self.channel_count())
    }
}

impl<P> Raster for ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    fn width(&self) -> u32 {
        ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        ImageBuffer::height(self)
    }

    fn channel_count(&self) -> u8 {
        P::CHANNEL_COUNT
    }

    fn channel(&self, x: u32, y: u32, channel: u8) -> u8 {
        self.get_pixel(x, y).channels()[usize::from(channel)]
    }

    fn set_channel(&mut self, x: u32, y: u32, channel: u8, value: u8) {
        self.get_pixel_mut(x, y).channels_mut()[usize::from(channel)] = value;
    }
}

/// 已解码的载体图像，统一为 8 位通道布局。
///
/// 8 位灰度、灰度 + Alpha、RGB、RGBA 图像保持原样；
/// 其它布局 (16 位、浮点等) 按是否含 Alpha 转换为 RGBA8 或 RGB8。
#[derive(Debug, Clone)]
pub enum Carrier {
    Luma(GrayImage),
    LumaAlpha(GrayAlphaImage),
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl Carrier {
    pub fn raster(&self) -> &dyn Raster {
        match self {
            Carrier::Luma(buf) => buf,
            Carrier::LumaAlpha(buf) => buf,
            Carrier::Rgb(buf) => buf,
            Carrier::Rgba(buf) => buf,
        }
    }

    pub fn raster_mut(&mut self) -> &mut dyn Raster {
        match self {
            Carrier::Luma(buf) => buf,
            Carrier::LumaAlpha(buf) => buf,
            Carrier::Rgb(buf) => buf,
            Carrier::Rgba(buf) => buf,
        }
    }

    /// 将载体转换为目标格式能够原样保存的通道布局。
    ///
    /// 头部宽度由通道数推导，保存后读回的通道数必须与嵌入时一致。
    /// 不能保存灰度的格式 (BMP、WebP、QOI 等) 会把灰度提升为 RGB，
    /// 灰度 + Alpha 则提升为 RGBA。`extension` 应为小写扩展名。
    pub fn for_container(self, extension: &str) -> Carrier {
        match self {
            Carrier::Luma(buf) if !LUMA_EXTENSIONS.contains(&extension) => {
                Carrier::Rgb(DynamicImage::ImageLuma8(buf).to_rgb8())
            }
            Carrier::LumaAlpha(buf) if !LUMA_ALPHA_EXTENSIONS.contains(&extension) => {
                Carrier::Rgba(DynamicImage::ImageLumaA8(buf).to_rgba8())
            }
            carrier => carrier,
        }
    }

    pub fn into_dynamic(self) -> DynamicImage {
        match self {
            Carrier::Luma(buf) => DynamicImage::ImageLuma8(buf),
            Carrier::LumaAlpha(buf) => DynamicImage::ImageLumaA8(buf),
            Carrier::Rgb(buf) => DynamicImage::ImageRgb8(buf),
            Carrier::Rgba(buf) => DynamicImage::ImageRgba8(buf),
        }
    }
}

impl From<DynamicImage> for Carrier {
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(buf) => Carrier::Luma(buf),
            DynamicImage::ImageLumaA8(buf) => Carrier::LumaAlpha(buf),
            DynamicImage::ImageRgb8(buf) => Carrier::Rgb(buf),
            DynamicImage::ImageRgba8(buf) => Carrier::Rgba(buf),
            other if other.color().has_alpha() => Carrier::Rgba(other.to_rgba8()),
            other => Carrier::Rgb(other.to_rgb8()),
        }
    }
}
