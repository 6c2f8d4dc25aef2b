//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::bits::header_length;
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::{DEFAULT_DEST_EXTENSION, DEFAULT_DEST_SUFFIX, LOSSLESS_EXTENSIONS};
use crate::error::StegoError;
use crate::raster::Carrier;
use crate::steganography::{embed, extract, max_message_len};
use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// 检查路径是否指向无损图像格式，并返回小写的扩展名。
///
/// # Errors
///
/// 扩展名缺失或不在 [`LOSSLESS_EXTENSIONS`] 中时返回 [`StegoError::UnsupportedContainer`]。
pub fn lossless_extension(path: &Path) -> std::result::Result<String, StegoError> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| LOSSLESS_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| StegoError::UnsupportedContainer {
            path: path.to_path_buf(),
        })
}

/// 根据输入图像生成默认输出路径：与输入同目录的 `<文件名>_message.png`。
pub fn default_dest(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    image.with_file_name(format!(
        "{stem}{DEFAULT_DEST_SUFFIX}.{DEFAULT_DEST_EXTENSION}"
    ))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn open_carrier(path: &Path) -> Result<Carrier> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;
    Ok(Carrier::from(image))
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取消息和图像、调用隐写核心函数写入长度头部和消息，
/// 最后将结果保存为无损格式图像。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径和消息来源的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出路径不是无损格式，或文件已存在且未指定 `--force`。
/// * 无法读取输入的图像或文本文件。
/// * 消息包含非 ASCII 字符，或图像没有足够的空间。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));
    let extension = lossless_extension(&dest)?;
    ensure_writable(&dest, args.force)?;

    let message = match (args.message, &args.text) {
        (Some(message), _) => message,
        (None, Some(text)) => fs::read_to_string(text).with_context(|| {
            format!(
                "Unable to read text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Use either --message or --text to provide the message."),
    };

    let mut carrier = open_carrier(&args.image)?.for_container(&extension);
    debug!(
        "loaded carrier {} with {} channels per pixel",
        args.image.display(),
        carrier.raster().channel_count()
    );

    if let Err(err) = embed(carrier.raster_mut(), &message) {
        let mut context = format!(
            "Failed to hide the message in {}.",
            args.image.to_string_lossy().red().bold()
        );
        if let StegoError::MessageLength { .. } = err {
            context.push_str(&format!(
                " \nAt most {} characters fit in this image.",
                max_message_len(carrier.raster()).to_string().green().bold()
            ));
        }
        return Err(anyhow::Error::new(err).context(context));
    }

    carrier.into_dynamic().save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数获取消息，
/// 然后将消息写入目标文本文件，未指定时打印到标准输出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输入图像不是无损格式，或无法读取。
/// * 图像中的长度头部损坏，或不包含隐藏消息。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    lossless_extension(&args.image)?;
    if let Some(text) = &args.text {
        ensure_writable(text, args.force)?;
    }

    let carrier = open_carrier(&args.image)?;

    let message = extract(carrier.raster()).with_context(|| {
        format!(
            "Failed to recover the message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    match args.text {
        Some(text) => {
            fs::write(&text, &message).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    text.to_string_lossy().red().bold()
                )
            })?;

            println!(
                "The message has been successfully recovered and saved: {}",
                text.to_string_lossy().green().bold()
            );
        }
        None => println!("{message}"),
    }

    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 打印图像尺寸、通道数、头部位数以及最多可隐藏的字符数。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = open_carrier(&args.image)?;
    let raster = carrier.raster();

    println!(
        "{}: {}x{} pixels, {} channels per pixel",
        args.image.to_string_lossy().bold(),
        raster.width(),
        raster.height(),
        raster.channel_count()
    );
    println!(
        "Header: {} bits, Available: {} characters",
        header_length(raster.width(), raster.height(), raster.channel_count()),
        max_message_len(raster).to_string().green().bold()
    );

    Ok(())
}
