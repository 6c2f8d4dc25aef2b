//! # 位序列编解码模块
//!
//! 负责 ASCII 字符串与位序列之间的相互转换 (每个字符 8 位，高位在前)，
//! 以及根据图像容量计算长度头部所需的位数。

use crate::constants::BITS_PER_CHAR;
use crate::error::{Result, StegoError};

/// 按顺序排列的位序列，`true` 表示 1。
pub type BitSequence = Vec<bool>;

/// 表示 `value` 所需的二进制位数，`0` 的位数为 `0`。
pub fn bit_length(value: u64) -> u32 {
    u64::BITS - value.leading_zeros()
}

/// 计算长度头部的位数。
///
/// 头部必须能表示不超过图像总通道数的任意长度，
/// 并向上取整到 `channel_count` 的倍数，使消息总是从某个像素的第 0 个通道开始。
///
/// 任一维度为零时返回 `0`。
pub fn header_length(width: u32, height: u32, channel_count: u8) -> u64 {
    let channels = u64::from(channel_count);
    let max_bits = u64::from(width) * u64::from(height) * channels;
    if max_bits == 0 {
        return 0;
    }

    u64::from(bit_length(max_bits)).div_ceil(channels) * channels
}

/// 将 ASCII 字符串转换为位序列。
///
/// # Errors
///
/// 若消息中含有码位大于 127 的字符，返回 [`StegoError::NonAsciiCharacter`]。
pub fn to_bits(message: &str) -> Result<BitSequence> {
    if let Some((index, character)) = message.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(StegoError::NonAsciiCharacter { character, index });
    }

    Ok(message
        .bytes()
        .flat_map(|byte| (0..BITS_PER_CHAR).rev().map(move |shift| (byte >> shift) & 1 == 1))
        .collect())
}

/// 将位序列按 8 位一组还原为字符串。
///
/// 每组按无符号整数解释，并映射到同码位的字符。
///
/// # Errors
///
/// 若位序列长度不是 8 的倍数，返回 [`StegoError::BinaryLength`]。
pub fn from_bits(bits: &[bool]) -> Result<String> {
    if bits.len() % BITS_PER_CHAR as usize != 0 {
        return Err(StegoError::BinaryLength {
            length: bits.len() as u64,
        });
    }

    Ok(bits
        .chunks_exact(BITS_PER_CHAR as usize)
        .map(|group| char::from(group.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit))))
        .collect())
}

/// 将 `value` 编码为恰好 `width` 位的大端位序列，左侧补零。
pub fn encode_length(value: u64, width: u64) -> BitSequence {
    (0..width)
        .rev()
        .map(|shift| shift < u64::from(u64::BITS) && (value >> shift) & 1 == 1)
        .collect()
}

/// 将大端位序列解释为无符号整数，超出 `u64` 范围时返回 `None`。
pub fn decode_length(bits: &[bool]) -> Option<u64> {
    bits.iter().try_fold(0u64, |acc, &bit| {
        if acc >> (u64::BITS - 1) != 0 {
            None
        } else {
            Some((acc << 1) | u64::from(bit))
        }
    })
}
