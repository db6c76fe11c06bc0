// src/exec/stream.rs

//! Line-by-line draining of one child output pipe.

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error, info, warn};

use crate::logging::{CHILD_TARGET, SharedWriter};
use crate::types::StreamKind;

/// Read `reader` until end-of-stream.
///
/// Every line is decoded (invalid UTF-8 is replaced), stripped of trailing
/// whitespace, logged under [`CHILD_TARGET`] (stdout at INFO, stderr at
/// ERROR) and mirrored to `mirror` right away.
///
/// Mirror failures (e.g. a closed stdout) are reported once and otherwise
/// ignored: the pipe must keep draining or the child could block.
///
/// Returns the number of lines read.
pub async fn drain_lines<R>(
    reader: R,
    kind: StreamKind,
    mirror: SharedWriter,
) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    let mut lines = 0usize;
    let mut mirror_failed = false;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        lines += 1;

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end();

        match kind {
            StreamKind::Stdout => info!(target: CHILD_TARGET, "{line}"),
            StreamKind::Stderr => error!(target: CHILD_TARGET, "{line}"),
        }

        if let Err(e) = mirror.write_line(line) {
            if !mirror_failed {
                warn!(stream = %kind, error = %e, "failed to mirror child output to console");
                mirror_failed = true;
            }
        }
    }

    debug!(stream = %kind, lines, "stream reached end of file");
    Ok(lines)
}
