//! # 错误类型模块
//!
//! 隐写编解码过程中可能出现的所有错误。
//! 核心函数返回 `Result<_, StegoError>`，命令处理层再用 `anyhow` 附加上下文。

use std::path::PathBuf;
use thiserror::Error;

/// 隐写编解码的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 编码、解码以及输出容器校验时可能出现的错误。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StegoError {
    /// 消息包含 7 位 ASCII 之外的字符。
    #[error("Message cannot contain non-ASCII characters (found {character:?} at index {index}).")]
    NonAsciiCharacter { character: char, index: usize },

    /// 头部加消息的总位数超出图像可用的通道数。
    #[error("Not enough space in the image to hide the message. Required: {required} bits, Available: {available} bits")]
    MessageLength { required: u64, available: u64 },

    /// 待还原的位序列长度不是 8 的倍数。
    #[error("Binary string length {length} is not a multiple of 8.")]
    BinaryLength { length: u64 },

    /// 头部声明的长度超出图像容量，图像很可能没有经过本工具编码。
    #[error("Header declares {declared} payload bits but the image only holds {capacity} bits. The image does not contain a hidden message or has been altered.")]
    CorruptHeader { declared: u64, capacity: u64 },

    /// 输出或输入文件不是无损图像格式。
    #[error("Unsupported container '{}'. Use a lossless format such as PNG.", path.display())]
    UnsupportedContainer { path: PathBuf },

    /// 图像的宽、高或通道数为零。
    #[error("The image has no pixel channels to work with.")]
    EmptyRaster,
}
