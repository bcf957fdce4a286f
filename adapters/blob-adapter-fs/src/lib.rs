use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::{
	fs::{File, create_dir_all, metadata, remove_file, rename},
	io::{AsyncReadExt, AsyncWriteExt},
};

use keel::{blob_adapter, prelude::*};

/// Maps a slash separated key to a path below `base_dir`.
///
/// Only plain path segments are accepted, so a key can never escape the base
/// directory.
fn obj_file_path(base_dir: &Path, key: &str) -> ClResult<PathBuf> {
	let rel = Path::new(key);
	if key.is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
		return Err(Error::ValidationError(format!("invalid blob key: {:?}", key)));
	}
	Ok(base_dir.join(rel))
}

fn obj_tmp_file_path(path: &Path) -> PathBuf {
	let tmp_id = format!(".tmp-{}", keel::utils::random_string(24, false));
	path.with_file_name(tmp_id)
}

#[derive(Debug)]
pub struct BlobAdapterFs {
	base_dir: Box<Path>,
}

impl BlobAdapterFs {
	pub async fn new(base_dir: Box<Path>) -> Result<Self, Error> {
		create_dir_all(&base_dir).await?;
		Ok(Self { base_dir })
	}
}

#[async_trait]
impl blob_adapter::BlobAdapter for BlobAdapterFs {
	/// Writes to a temporary file first, then renames it into place
	async fn put_blob(&self, key: &str, data: &[u8], content_type: &str) -> ClResult<()> {
		let path = obj_file_path(&self.base_dir, key)?;
		info!("put_blob: {:?} ({}, {} bytes)", &path, content_type, data.len());
		if let Some(dir) = path.parent() {
			create_dir_all(dir).await?;
		}

		let tmp_path = obj_tmp_file_path(&path);
		let res = async {
			let mut file = File::create(&tmp_path).await?;
			file.write_all(data).await?;
			file.sync_all().await?;
			rename(&tmp_path, &path).await?;
			Ok::<(), Error>(())
		}
		.await;

		if res.is_err() {
			warn!("put_blob failed, removing tmpfile: {:?}", &tmp_path);
			let _ignore = remove_file(&tmp_path).await;
		}
		res
	}

	/// Checks if a blob exists, returns its size
	async fn stat_blob(&self, key: &str) -> Option<u64> {
		let path = obj_file_path(&self.base_dir, key).ok()?;
		let file_metadata = metadata(&path).await.ok()?;
		file_metadata.is_file().then(|| file_metadata.len())
	}

	async fn read_blob(&self, key: &str) -> ClResult<Box<[u8]>> {
		let mut file =
			File::open(obj_file_path(&self.base_dir, key)?).await.map_err(|_| Error::NotFound)?;
		let mut buf: Vec<u8> = Vec::new();
		file.read_to_end(&mut buf).await?;

		Ok(buf.into_boxed_slice())
	}

	async fn delete_blob(&self, key: &str) -> ClResult<()> {
		remove_file(obj_file_path(&self.base_dir, key)?).await.map_err(|err| {
			if err.kind() == std::io::ErrorKind::NotFound { Error::NotFound } else { Error::Io(err) }
		})
	}
}


// vim: ts=4
