//! Decoding of base64 image uploads and their content-addressed storage
//! under the media root.

use crate::error::{CatalogError, Result};
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory under the media root that holds product images.
pub const IMAGE_DIR: &str = "images";

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = "base64,";

// Clients are inconsistent about trailing '=' padding
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Image bytes decoded from an upload, with the MIME subtype from its data-URI header if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub bytes: Vec<u8>,
    pub subtype: Option<String>,
}

impl DecodedImage {
    pub fn extension(&self) -> &'static str {
        match self.subtype.as_deref() {
            Some("png") => "png",
            Some("gif") => "gif",
            Some("webp") => "webp",
            _ => "jpg",
        }
    }
}

/// Returns the payload after a `data:...;base64,` header, or the input unchanged.
pub fn strip_data_uri(input: &str) -> &str {
    if !input.starts_with(DATA_URI_SCHEME) {
        return input;
    }
    match input.find(BASE64_MARKER) {
        Some(pos) => &input[pos + BASE64_MARKER.len()..],
        None => input,
    }
}

/// `data:image/png;base64,...` -> `png`
fn data_uri_subtype(input: &str) -> Option<String> {
    let header = input.strip_prefix(DATA_URI_SCHEME)?;
    let header = &header[..header.find(BASE64_MARKER)?];
    let mime = header.split(';').next()?;
    let subtype = mime.strip_prefix("image/")?;
    if subtype.is_empty() {
        None
    } else {
        Some(subtype.to_ascii_lowercase())
    }
}

pub fn decode_image(input: &str) -> Result<DecodedImage> {
    let subtype = data_uri_subtype(input);
    let payload: String = strip_data_uri(input)
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(CatalogError::ImageDecode("image payload is empty".to_string()));
    }

    let bytes = LENIENT_STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| CatalogError::ImageDecode(e.to_string()))?;

    Ok(DecodedImage { bytes, subtype })
}

/// Writes decoded images below a media root and maps stored references to public URLs.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        let mut url_prefix = url_prefix.into();
        if !url_prefix.ends_with('/') {
            url_prefix.push('/');
        }
        Self {
            root: root.into(),
            url_prefix,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores the image under `images/<sha256>.<ext>` and returns that relative path.
    /// Identical uploads share one file.
    pub fn save(&self, image: &DecodedImage) -> Result<String> {
        let mut hasher = Sha256::new();
        hasher.update(&image.bytes);
        let digest = hex::encode(hasher.finalize());

        let dir = self.root.join(IMAGE_DIR);
        fs::create_dir_all(&dir)?;

        let file_name = format!("{}.{}", digest, image.extension());
        let path = dir.join(&file_name);
        if !path.exists() {
            fs::write(&path, &image.bytes)?;
            debug!("Stored image {} ({} bytes)", path.display(), image.bytes.len());
        }
        Ok(format!("{IMAGE_DIR}/{file_name}"))
    }

    pub fn path_for(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }

    pub fn url_for(&self, reference: &str) -> String {
        format!("{}{}", self.url_prefix, reference.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // "hello image" in base64
    const PAYLOAD: &str = "aGVsbG8gaW1hZ2U=";

    #[test]
    fn test_prefixed_and_bare_payloads_decode_identically() {
        let bare = decode_image(PAYLOAD).unwrap();
        let prefixed = decode_image(&format!("data:image/jpeg;base64,{PAYLOAD}")).unwrap();

        assert_eq!(bare.bytes, b"hello image");
        assert_eq!(bare.bytes, prefixed.bytes);
        assert_eq!(bare.subtype, None);
        assert_eq!(prefixed.subtype.as_deref(), Some("jpeg"));
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        // Not a data URI, so a stray marker is left alone
        assert_eq!(strip_data_uri("xbase64,AAAA"), "xbase64,AAAA");
    }

    #[test]
    fn test_missing_padding_and_whitespace_are_tolerated() {
        let decoded = decode_image("aGVsbG8g\naW1hZ2U").unwrap();
        assert_eq!(decoded.bytes, b"hello image");
    }

    #[test]
    fn test_malformed_payload_is_a_decode_error() {
        let err = decode_image("data:image/png;base64,@@not base64@@").unwrap_err();
        assert!(matches!(err, CatalogError::ImageDecode(_)));
        assert!(err.to_string().starts_with("Error decoding image:"));

        assert!(matches!(
            decode_image("data:image/png;base64,"),
            Err(CatalogError::ImageDecode(_))
        ));
    }

    #[test]
    fn test_extension_follows_subtype() {
        let png = decode_image(&format!("data:image/png;base64,{PAYLOAD}")).unwrap();
        assert_eq!(png.extension(), "png");
        let jpeg = decode_image(&format!("data:image/jpeg;base64,{PAYLOAD}")).unwrap();
        assert_eq!(jpeg.extension(), "jpg");
        assert_eq!(decode_image(PAYLOAD).unwrap().extension(), "jpg");
    }

    #[test]
    fn test_save_is_content_addressed() {
        let dir = tempdir().unwrap();
        let store = MediaStore::new(dir.path(), "/media");
        let image = decode_image(PAYLOAD).unwrap();

        let first = store.save(&image).unwrap();
        let second = store.save(&image).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with("images/"));
        assert!(first.ends_with(".jpg"));
        assert_eq!(fs::read(store.path_for(&first)).unwrap(), b"hello image");
        assert_eq!(store.url_for(&first), format!("/media/{first}"));
    }
}
