//! # 转码模块
//!
//! 二进制 → Data URL → 纯 Base64 负载。
//! 远端接口只接受纯 Base64，因此提交前需去掉 `data:<mime>;base64,` 前缀。

use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose};

/// 生成可直接渲染的预览地址。
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// 去掉 Data URL 的媒体类型前缀，只保留负载部分。
///
/// 不是 Data URL 时原样返回。
pub fn strip_data_url_prefix(data: &str) -> &str {
    if !data.starts_with("data:") {
        return data;
    }
    match data.split_once(',') {
        Some((_, payload)) => payload,
        None => data,
    }
}

/// 生成提交给远端的 Base64 负载。
pub fn encode_payload(mime: &str, bytes: &[u8]) -> String {
    let data_url = to_data_url(mime, bytes);
    strip_data_url_prefix(&data_url).to_string()
}

/// 仅读取图片头中的宽高，不做完整解码。
pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let reader = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?;
    match reader.into_dimensions() {
        Ok(dimensions) => Some(dimensions),
        Err(e) => {
            log::debug!("读取图片尺寸失败：{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            Rgba([(x % 255) as u8, (y % 255) as u8, 0, 255])
        });
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn data_url_has_media_type_prefix() {
        assert_eq!(to_data_url("image/gif", b"GIF89a"), "data:image/gif;base64,R0lGODlh");
    }

    #[test]
    fn payload_has_no_prefix() {
        let payload = encode_payload("image/png", b"hello");
        assert_eq!(payload, "aGVsbG8=");
        assert!(!payload.contains(','));
    }

    #[test]
    fn strip_leaves_plain_base64_untouched() {
        assert_eq!(strip_data_url_prefix("aGVsbG8="), "aGVsbG8=");
        assert_eq!(strip_data_url_prefix("data:broken"), "data:broken");
    }

    #[test]
    fn payload_of_empty_file_is_empty() {
        assert_eq!(encode_payload("image/png", &[]), "");
    }

    #[test]
    fn probe_reads_png_header() {
        let png = create_png_bytes(64, 32);
        assert_eq!(probe_dimensions(&png), Some((64, 32)));
        assert_eq!(probe_dimensions(b"not an image"), None);
    }
}
