//! # LSB 隐写核心模块
//!
//! 帧结构为 `头部 ++ 消息`：头部是消息位数的大端二进制表示，宽度由
//! [`header_length`] 根据图像尺寸推导，编码端和解码端各自重新计算，不写入图像。
//! 位序号按行优先顺序映射到像素，每个像素的所有通道依次使用后再前进到下一个像素。
//!
//! 编码和解码之间若改变了图像尺寸或通道布局，头部宽度会随之改变，恢复结果将失效。

use crate::bits::{decode_length, encode_length, from_bits, header_length, to_bits};
use crate::constants::{BITS_PER_CHAR, LSB_CLEAR_MASK};
use crate::error::{Result, StegoError};
use crate::raster::Raster;
use log::{debug, trace};

/// 某一位在图像中的位置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub x: u32,
    pub y: u32,
    pub channel: u8,
}

/// 将绝对位序号映射为像素坐标和通道序号。
pub fn locate(bit_index: u64, width: u32, channel_count: u8) -> Location {
    let channels = u64::from(channel_count);
    let pixel_index = bit_index / channels;
    let width = u64::from(width);

    Location {
        x: (pixel_index % width) as u32,
        y: (pixel_index / width) as u32,
        channel: (bit_index % channels) as u8,
    }
}

fn read_bit<R: Raster + ?Sized>(raster: &R, bit_index: u64) -> bool {
    let loc = locate(bit_index, raster.width(), raster.channel_count());
    raster.channel(loc.x, loc.y, loc.channel) & 1 == 1
}

fn write_bit<R: Raster + ?Sized>(raster: &mut R, bit_index: u64, bit: bool) {
    let loc = locate(bit_index, raster.width(), raster.channel_count());
    let value = raster.channel(loc.x, loc.y, loc.channel);
    raster.set_channel(
        loc.x,
        loc.y,
        loc.channel,
        (value & LSB_CLEAR_MASK) | u8::from(bit),
    );
}

fn read_bits<R: Raster + ?Sized>(raster: &R, start: u64, count: u64) -> Vec<bool> {
    (start..start + count).map(|i| read_bit(raster, i)).collect()
}

fn check_dimensions<R: Raster + ?Sized>(raster: &R) -> Result<u64> {
    match raster.capacity() {
        0 => Err(StegoError::EmptyRaster),
        capacity => Ok(capacity),
    }
}

/// 在图像中隐藏 ASCII 消息。
///
/// 只修改帧所覆盖通道的最低有效位，其它通道保持不变。
/// 所有校验都在写入之前完成，失败时图像不会被修改。
///
/// # Errors
///
/// * 图像没有可用通道时返回 [`StegoError::EmptyRaster`]。
/// * 消息含非 ASCII 字符时返回 [`StegoError::NonAsciiCharacter`]。
/// * 头部加消息超出图像容量时返回 [`StegoError::MessageLength`]。
pub fn embed<R: Raster + ?Sized>(raster: &mut R, message: &str) -> Result<()> {
    let capacity = check_dimensions(raster)?;
    let header_bits = header_length(raster.width(), raster.height(), raster.channel_count());
    let payload = to_bits(message)?;
    let payload_bits = payload.len() as u64;

    let required = header_bits + payload_bits;
    if required > capacity {
        return Err(StegoError::MessageLength {
            required,
            available: capacity,
        });
    }

    debug!(
        "embedding {} payload bits after a {}-bit header ({} of {} channels)",
        payload_bits, header_bits, required, capacity
    );

    encode_length(payload_bits, header_bits)
        .into_iter()
        .chain(payload)
        .enumerate()
        .for_each(|(i, bit)| write_bit(raster, i as u64, bit));

    Ok(())
}

/// 从图像中恢复隐藏的 ASCII 消息。
///
/// # Errors
///
/// * 图像没有可用通道时返回 [`StegoError::EmptyRaster`]。
/// * 头部声明的长度超出图像容量时返回 [`StegoError::CorruptHeader`]。
/// * 声明的长度不是 8 的倍数时返回 [`StegoError::BinaryLength`]。
pub fn extract<R: Raster + ?Sized>(raster: &R) -> Result<String> {
    let capacity = check_dimensions(raster)?;
    let header_bits = header_length(raster.width(), raster.height(), raster.channel_count());

    let header = read_bits(raster, 0, header_bits);
    let corrupt = |declared| StegoError::CorruptHeader { declared, capacity };
    let payload_bits = decode_length(&header).ok_or_else(|| corrupt(u64::MAX))?;
    trace!("header declares {} payload bits", payload_bits);

    if payload_bits > capacity - header_bits {
        return Err(corrupt(payload_bits));
    }
    if payload_bits % u64::from(BITS_PER_CHAR) != 0 {
        return Err(StegoError::BinaryLength {
            length: payload_bits,
        });
    }

    debug!(
        "extracting {} payload bits after a {}-bit header",
        payload_bits, header_bits
    );

    from_bits(&read_bits(raster, header_bits, payload_bits))
}

/// 图像在头部之外还能容纳的 ASCII 字符数。
pub fn max_message_len<R: Raster + ?Sized>(raster: &R) -> u64 {
    let header_bits = header_length(raster.width(), raster.height(), raster.channel_count());
    raster.capacity().saturating_sub(header_bits) / u64::from(BITS_PER_CHAR)
}
