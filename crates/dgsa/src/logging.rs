use std::fs::{self, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_NAME: &str = "dgsa.log";
const ROTATE_ABOVE_BYTES: u64 = 5 * 1024 * 1024;
const TAIL_BYTES: u64 = 1024 * 1024;

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Last `len` bytes of `path`, starting after the first newline in that window
fn read_tail_lines(path: &Path, len: u64) -> io::Result<Vec<u8>> {
    let mut file = fs::File::open(path)?;
    let size = file.metadata()?.len();
    file.seek(SeekFrom::Start(size.saturating_sub(len)))?;

    let mut tail = Vec::with_capacity(len as usize);
    file.read_to_end(&mut tail)?;
    if size > len {
        let first_line = tail.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);
        tail.drain(..first_line);
    }
    Ok(tail)
}

/// Shrink the log to its most recent whole lines once it exceeds `limit` bytes.
fn rotate_log_if_needed(path: &Path, limit: u64, keep: u64) -> io::Result<()> {
    match fs::metadata(path) {
        Ok(meta) if meta.len() > limit => {}
        Ok(_) => return Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    }

    let tail = read_tail_lines(path, keep)?;
    let mut file = fs::File::create(path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&tail)
}

/// Install the global subscriber.
///
/// Events go to stderr, keeping stdout for the report, unless `log_dir` is
/// given; then they are appended to `dgsa.log` in that directory, which is cut
/// back to its last megabyte whenever it has grown past five. `RUST_LOG`
/// replaces the `level` filter when set.
pub fn init_logging(log_dir: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let default_filter = format!("dgsa={level},dgsa_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let file_layer = match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let log_path = dir.join(LOG_FILE_NAME);
            if let Err(e) = rotate_log_if_needed(&log_path, ROTATE_ABOVE_BYTES, TAIL_BYTES) {
                eprintln!("Warning: Failed to rotate log file: {e}");
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(false),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| fmt::layer().with_writer(io::stderr).with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    match log_dir {
        Some(dir) => tracing::debug!(
            log_path = %dir.join(LOG_FILE_NAME).display(),
            "Logging initialized"
        ),
        None => tracing::debug!("Logging initialized on stderr"),
    }
    Ok(())
}
