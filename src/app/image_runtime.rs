//! Background thumbnail decoding.
//!
//! A small pool of worker threads pulls paths off a shared queue, decodes
//! them and publishes each result over a channel.  The UI thread never
//! touches the image codecs.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use tokio::sync::mpsc;

use crate::core::item::{decode_thumbnail, SourceError};

/// Longest side of a decoded thumbnail, in pixels.
pub const THUMBNAIL_MAX_SIDE: u32 = 256;

#[derive(Debug)]
pub struct ImageUpdate {
    pub path: PathBuf,
    pub result: Result<RgbaImage, SourceError>,
}

/// Handle to a running decode pool.
pub struct ImageLoader {
    cancel: Arc<AtomicBool>,
    workers: usize,
}

impl ImageLoader {
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn worker_count(&self) -> usize {
        self.workers
    }
}

/// Start decoding `paths` in the background.  Results arrive on `tx` in
/// completion order, not queue order.
pub fn spawn_image_loader(
    paths: Vec<PathBuf>,
    max_side: u32,
    tx: mpsc::UnboundedSender<ImageUpdate>,
) -> ImageLoader {
    let cancel = Arc::new(AtomicBool::new(false));
    if paths.is_empty() {
        return ImageLoader { cancel, workers: 0 };
    }

    let max_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .max(1);
    let workers = max_threads.min(paths.len());

    let queue = Arc::new(Mutex::new(VecDeque::from(paths)));
    for _ in 0..workers {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        let cancel = Arc::clone(&cancel);
        std::thread::spawn(move || loop {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let path = {
                let mut q = match queue.lock() {
                    Ok(guard) => guard,
                    Err(_) => break,
                };
                match q.pop_front() {
                    Some(p) => p,
                    None => break,
                }
            };
            let result = decode_thumbnail(&path, max_side);
            if tx.send(ImageUpdate { path, result }).is_err() {
                break; // receiver dropped
            }
        });
    }

    ImageLoader { cancel, workers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn decodes_every_path_once() {
        let dir = std::env::temp_dir().join(format!("photo-gallery-loader-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let good = dir.join("good.png");
        RgbaImage::from_pixel(600, 300, image::Rgba([1, 2, 3, 255]))
            .save(&good)
            .unwrap();
        let bad = dir.join("bad.png");
        std::fs::write(&bad, b"garbage").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let loader = spawn_image_loader(vec![good.clone(), bad.clone()], 64, tx);
        assert!(loader.worker_count() >= 1);

        let mut seen = HashSet::new();
        for _ in 0..2 {
            let update = rx.blocking_recv().unwrap();
            if update.path == good {
                let img = update.result.unwrap();
                assert_eq!(img.dimensions(), (64, 32));
            } else {
                assert_eq!(update.path, bad);
                assert!(update.result.is_err());
            }
            seen.insert(update.path);
        }
        assert_eq!(seen.len(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_queue_spawns_nothing() {
        let (tx, _rx) = mpsc::unbounded_channel();
        assert_eq!(spawn_image_loader(Vec::new(), 64, tx).worker_count(), 0);
    }
}
