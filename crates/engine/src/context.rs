//! Stream an on-disk directory tree into the shape `build_image` expects:
//! an uncompressed tar archive, written directly into a channel instead of
//! staged on disk.

use futures::stream::BoxStream;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

/// Build a tar stream of every regular file under `root`, named relative
/// to `root`. Directories and non-regular files (symlinks, sockets,
/// devices) are skipped as entries — their contents, if any, are still
/// reached by the walk. Runs the blocking walk+tar-write on a blocking
/// thread and forwards chunks through a bounded channel; the channel's
/// sender drops (closing the stream) once the archive is complete or a
/// walk error occurs.
pub fn stream_build_context(root: PathBuf) -> BoxStream<'static, io::Result<Vec<u8>>> {
    let (tx, rx) = mpsc::channel::<io::Result<Vec<u8>>>(16);

    tokio::task::spawn_blocking(move || {
        let writer = ChannelWriter { tx: tx.clone() };
        let mut builder = tar::Builder::new(writer);

        if let Err(e) = walk_and_append(&root, &mut builder) {
            let _ = tx.blocking_send(Err(e));
            return;
        }
        if let Err(e) = builder.finish() {
            let _ = tx.blocking_send(Err(e));
        }
    });

    ReceiverStream::new(rx).boxed()
}

fn walk_and_append<W: io::Write>(root: &Path, builder: &mut tar::Builder<W>) -> io::Result<()> {
    for entry in walkdir::WalkDir::new(root).into_iter() {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(io::Error::other)?;
        builder.append_path_with_name(entry.path(), relative)?;
    }
    Ok(())
}

/// Adapts a bounded `mpsc::Sender` into a blocking [`io::Write`] so
/// `tar::Builder` can write directly into the channel feeding the engine
/// call, with no intermediate buffer on disk.
struct ChannelWriter {
    tx: mpsc::Sender<io::Result<Vec<u8>>>,
}

impl io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .blocking_send(Ok(buf.to_vec()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "build context receiver dropped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::io::Write;

    async fn collect_entry_names(root: PathBuf) -> BTreeSet<String> {
        let mut stream = stream_build_context(root);
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            bytes.extend(chunk.unwrap());
        }
        let mut archive = tar::Archive::new(bytes.as_slice());
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[tokio::test]
    async fn streams_every_regular_file_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), b"FROM alpine\n").unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        let mut f = std::fs::File::create(dir.path().join("src/main.rs")).unwrap();
        f.write_all(b"fn main() {}").unwrap();

        let names = collect_entry_names(dir.path().to_path_buf()).await;
        assert!(names.contains("Dockerfile"));
        assert!(names.contains("src/main.rs"));
        assert_eq!(names.len(), 2);
    }

    #[tokio::test]
    async fn skips_nothing_but_non_regular_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty")).unwrap();
        std::fs::write(dir.path().join("a.txt"), b"a").unwrap();

        let names = collect_entry_names(dir.path().to_path_buf()).await;
        assert_eq!(names, BTreeSet::from(["a.txt".to_string()]));
    }
}
