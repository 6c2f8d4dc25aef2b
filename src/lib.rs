//! # lsb_ascii 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：位序列编解码、像素访问接口、
//! 嵌入与提取算法，以及命令行处理逻辑。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod raster;
pub mod steganography;

pub use error::{Result, StegoError};
pub use raster::{Carrier, Raster};
pub use steganography::{embed, extract};
