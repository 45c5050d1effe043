use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::image_store::{ImageStore, StoredImage};

pub const IMAGES_DIR: &str = "images";

const MIME_EXTENSIONS: [(&str, &str); 3] = [
    ("image/png", "png"),
    ("image/jpeg", "jpeg"),
    ("image/jpg", "jpg"),
];

/// Maps an upload to its stored extension. Only PNG and JPEG are accepted; the
/// part's content type wins, the file name is a fallback.
pub fn image_extension(content_type: Option<&str>, filename: Option<&str>) -> Option<&'static str> {
    let declared = content_type
        .map(|ct| ct.trim().to_ascii_lowercase())
        .filter(|ct| !ct.is_empty() && ct != "application/octet-stream");
    let mime = match declared {
        Some(ct) => ct,
        None => mime_guess::from_path(filename?).first()?.essence_str().to_string(),
    };
    MIME_EXTENSIONS
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
}

pub struct FsImageStore {
    uploads_root: PathBuf,
}

impl FsImageStore {
    pub fn new(uploads_root: impl Into<PathBuf>) -> Self {
        Self {
            uploads_root: uploads_root.into(),
        }
    }

    pub fn images_dir(&self) -> PathBuf {
        self.uploads_root.join(IMAGES_DIR)
    }
}

// References look like `images/<file>`; anything else is refused so a stored
// value can never point outside the images directory.
fn resolve_reference(uploads_root: &Path, reference: &str) -> anyhow::Result<PathBuf> {
    let name = reference
        .strip_prefix(IMAGES_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| anyhow::anyhow!("not an image reference: {reference}"))?;
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.starts_with('.') {
        anyhow::bail!("invalid image file name: {reference}");
    }
    Ok(uploads_root.join(IMAGES_DIR).join(name))
}

async fn remove_image(uploads_root: &Path, reference: &str) -> anyhow::Result<()> {
    let path = resolve_reference(uploads_root, reference)?;
    match tokio::fs::remove_file(&path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store_image(&self, extension: &str, bytes: &[u8]) -> anyhow::Result<StoredImage> {
        let dir = self.images_dir();
        tokio::fs::create_dir_all(&dir).await?;
        let filename = format!("{}.{}", Uuid::new_v4(), extension);
        tokio::fs::write(dir.join(&filename), bytes).await?;
        Ok(StoredImage {
            reference: format!("{IMAGES_DIR}/{filename}"),
            size: bytes.len() as i64,
        })
    }

    fn discard_image(&self, reference: &str) {
        let root = self.uploads_root.clone();
        let reference = reference.to_string();
        tokio::spawn(async move {
            if let Err(err) = remove_image(&root, &reference).await {
                tracing::warn!(image = %reference, error = ?err, "failed to remove image");
            }
        });
    }
}
