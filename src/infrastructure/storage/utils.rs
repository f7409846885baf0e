use sha2::{Digest, Sha256};

use super::StorageError;

/// Hex SHA-256 of the content
pub fn content_hash(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Path for one upload, sharded by content hash (e.g., "ab/cd/ef/abcdef123...-<upload>.png").
/// Every upload gets its own file, so identical content is never shared between records.
pub fn upload_path(hash: &str, upload_id: &str, extension: &str) -> String {
    if hash.len() < 6 {
        return format!("{hash}-{upload_id}.{extension}");
    }

    format!("{}/{}/{}/{hash}-{upload_id}.{extension}", &hash[0..2], &hash[2..4], &hash[4..6])
}

/// Detect MIME type from file content, falling back to the file name
pub fn detect_content_type(data: &[u8], filename: Option<&str>) -> String {
    if data.len() >= 4 {
        match &data[0..4] {
            [0xFF, 0xD8, 0xFF, ..] => return "image/jpeg".to_string(),
            [0x89, 0x50, 0x4E, 0x47] => return "image/png".to_string(),
            [0x47, 0x49, 0x46, 0x38] => return "image/gif".to_string(),
            [0x52, 0x49, 0x46, 0x46] if data.len() >= 12 && &data[8..12] == b"WEBP" => {
                return "image/webp".to_string();
            }
            [0x52, 0x49, 0x46, 0x46] if data.len() >= 12 && &data[8..12] == b"AVI " => {
                return "video/x-msvideo".to_string();
            }
            [0x1A, 0x45, 0xDF, 0xA3] => return "video/webm".to_string(),
            _ => {}
        }
    }

    // ISO base media: size(4) "ftyp" brand(4)
    if data.len() >= 12 && &data[4..8] == b"ftyp" {
        return match &data[8..12] {
            b"avif" | b"avis" => "image/avif",
            b"qt  " => "video/quicktime",
            _ => "video/mp4",
        }
        .to_string();
    }

    match filename.and_then(|f| f.rsplit_once('.')).map(|(_, ext)| ext.to_lowercase()).as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("mp4" | "m4v") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mov") => "video/quicktime",
        Some("avi") => "video/x-msvideo",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// File extension used when storing a detected MIME type
pub fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/avif" => "avif",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        "video/x-msvideo" => "avi",
        "video/x-matroska" => "mkv",
        _ => "bin",
    }
}

/// Validate file size limits
pub fn validate_file_size(size: u64, max_size: u64) -> Result<(), StorageError> {
    if size > max_size {
        return Err(StorageError::FileTooLarge { size, max_size });
    }
    Ok(())
}

/// Read the playback length from an MP4/QuickTime `moov/mvhd` box
pub fn probe_mp4_duration(data: &[u8]) -> Option<f64> {
    let moov = find_box(data, b"moov")?;
    let mvhd = find_box(moov, b"mvhd")?;

    let version = *mvhd.first()?;
    let (timescale, duration) = if version == 1 {
        // version/flags(4) created(8) modified(8) timescale(4) duration(8)
        let timescale = u32::from_be_bytes(mvhd.get(20..24)?.try_into().ok()?);
        let duration = u64::from_be_bytes(mvhd.get(24..32)?.try_into().ok()?);
        (timescale, duration)
    } else {
        // version/flags(4) created(4) modified(4) timescale(4) duration(4)
        let timescale = u32::from_be_bytes(mvhd.get(12..16)?.try_into().ok()?);
        let duration = u32::from_be_bytes(mvhd.get(16..20)?.try_into().ok()?);
        (timescale, u64::from(duration))
    };

    if timescale == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let seconds = duration as f64 / f64::from(timescale);
    Some(seconds)
}

/// Payload of the first top-level box named `kind`
fn find_box<'a>(mut data: &'a [u8], kind: &[u8; 4]) -> Option<&'a [u8]> {
    while data.len() >= 8 {
        let size = u32::from_be_bytes(data[0..4].try_into().ok()?) as usize;
        let (header, size) = match size {
            0 => (8, data.len()),
            1 => (16, usize::try_from(u64::from_be_bytes(data.get(8..16)?.try_into().ok()?)).ok()?),
            n => (8, n),
        };
        if size < header || size > data.len() {
            return None;
        }
        if &data[4..8] == kind {
            return Some(&data[header..size]);
        }
        data = &data[size..];
    }
    None
}
