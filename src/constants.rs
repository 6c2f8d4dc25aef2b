/// 每个 ASCII 字符编码后占用的位数，每一位占用一个通道的最低有效位。
pub const BITS_PER_CHAR: u32 = 8;

/// 清除通道最低有效位的掩码。
pub const LSB_CLEAR_MASK: u8 = 0xFE;

/// 未指定输出路径时，在原文件名后追加的后缀。
pub const DEFAULT_DEST_SUFFIX: &str = "_message";

/// 未指定输出路径时使用的图像格式扩展名。
pub const DEFAULT_DEST_EXTENSION: &str = "png";

/// 允许作为载体的无损图像格式扩展名 (小写)。
/// `image` 只以无损方式写出 WebP，因此也在此列。
pub const LOSSLESS_EXTENSIONS: &[&str] = &["png", "bmp", "tiff", "tif", "qoi", "webp"];

/// 能原样保存并读回 8 位灰度图像的格式。
/// 其它格式会把灰度写成 RGB，或者根本不支持灰度。
pub const LUMA_EXTENSIONS: &[&str] = &["png", "tiff", "tif"];

/// 能原样保存并读回 8 位灰度 + Alpha 图像的格式。
pub const LUMA_ALPHA_EXTENSIONS: &[&str] = &["png"];
