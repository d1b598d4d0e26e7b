use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;

/// Public URL prefix under which stored images are served.
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

/// Fallback extension when the client did not send a usable file name.
const DEFAULT_EXTENSION: &str = "bin";

/// Stores uploaded product images on the local filesystem.
///
/// Files live under `<root>/products/<product_id>/` and are served by the
/// `actix-files` mount at [`UPLOADS_URL_PREFIX`]. The database keeps the
/// public URL paths, not filesystem paths.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

/// Public URL paths of a stored thumbnail and gallery.
#[derive(Debug, Clone)]
pub struct StoredImages {
    pub thumbnail: String,
    pub images: Vec<String>,
}

impl ImageStore {
    /// Create a store rooted at `root`. The directory is created lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist the uploaded thumbnail and gallery files for a product and
    /// return their public URL paths. Gallery order is preserved.
    pub fn save_product_images(
        &self,
        product_id: i32,
        thumbnail: &TempFile,
        images: &[TempFile],
    ) -> io::Result<StoredImages> {
        let dir = self.product_dir(product_id);
        fs::create_dir_all(&dir)?;

        let thumbnail_name = format!("thumbnail.{}", extension_for(thumbnail));
        self.save_file(thumbnail, &dir.join(&thumbnail_name))?;

        let mut image_urls = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            let name = format!("image-{index}.{}", extension_for(image));
            self.save_file(image, &dir.join(&name))?;
            image_urls.push(public_url(product_id, &name));
        }

        Ok(StoredImages {
            thumbnail: public_url(product_id, &thumbnail_name),
            images: image_urls,
        })
    }

    /// Remove every stored file for a product. Missing directories are fine.
    pub fn remove_product_images(&self, product_id: i32) -> io::Result<()> {
        match fs::remove_dir_all(self.product_dir(product_id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }

    fn product_dir(&self, product_id: i32) -> PathBuf {
        self.root.join("products").join(product_id.to_string())
    }

    fn save_file(&self, file: &TempFile, dest: &Path) -> io::Result<()> {
        // Copy instead of rename: the temp file may live on another
        // filesystem.
        fs::copy(file.file.path(), dest)?;
        Ok(())
    }
}

fn public_url(product_id: i32, name: &str) -> String {
    format!("{UPLOADS_URL_PREFIX}/products/{product_id}/{name}")
}

/// Extension taken from the client file name, restricted to short
/// alphanumeric suffixes.
fn extension_for(file: &TempFile) -> String {
    file.file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|ch| ch.is_ascii_alphanumeric())
        })
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
