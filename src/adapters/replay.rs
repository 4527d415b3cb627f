//! JSON-lines frame source.
//!
//! One record per line, tagged by `type`:
//!
//! ```text
//! {"type":"pose","t_ms":120,"poses":[{"keypoints":[{"name":"nose","x":320,"y":200,"score":0.9}]}]}
//! {"type":"face","t_ms":150,"faces":[{"scaledMesh":[[1,2,0],[3,4,0]]}]}
//! {"type":"tick","t_ms":200}
//! ```
//!
//! `t_ms` is optional; without it the caller stamps the record on arrival.
//! Blank lines and `#` comments are skipped.

use std::io::BufRead;

use log::warn;
use serde::Deserialize;

use crate::app::inbox::InboundEvent;
use crate::error::{Error, Result};
use crate::frames::raw::{RawFace, RawPose, normalize_face_frame, normalize_pose_frame};

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawRecord {
    Pose {
        #[serde(default)]
        t_ms: Option<u64>,
        #[serde(default)]
        poses: Vec<RawPose>,
    },
    Face {
        #[serde(default)]
        t_ms: Option<u64>,
        #[serde(default)]
        faces: Vec<RawFace>,
    },
    Tick {
        #[serde(default)]
        t_ms: Option<u64>,
    },
}

/// A parsed record and its recorded time, if it carried one.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedInput {
    pub at_ms: Option<u64>,
    pub event: InboundEvent,
}

/// Parse one line.  `Ok(None)` for lines that carry no record.
pub fn parse_line(line: &str) -> Result<Option<TimedInput>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let record: RawRecord =
        serde_json::from_str(line).map_err(|_| Error::Input("malformed frame record"))?;

    let parsed = match record {
        RawRecord::Pose { t_ms, poses } => TimedInput {
            at_ms: t_ms,
            event: InboundEvent::Pose(normalize_pose_frame(&poses)),
        },
        RawRecord::Face { t_ms, faces } => TimedInput {
            at_ms: t_ms,
            event: InboundEvent::Face(normalize_face_frame(&faces)),
        },
        RawRecord::Tick { t_ms } => TimedInput {
            at_ms: t_ms,
            event: InboundEvent::Tick,
        },
    };
    Ok(Some(parsed))
}

/// Line counts from one [`read_records`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub records: usize,
    pub skipped: usize,
}

/// Parse every line of `reader`, handing records to `f` until it returns
/// `false`.  Malformed lines are logged and skipped.
pub fn read_records(
    reader: impl BufRead,
    mut f: impl FnMut(TimedInput) -> bool,
) -> std::io::Result<ReplayStats> {
    let mut stats = ReplayStats::default();
    for (idx, line) in reader.lines().enumerate() {
        match parse_line(&line?) {
            Ok(Some(input)) => {
                stats.records += 1;
                if !f(input) {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                stats.skipped += 1;
                warn!("Replay line {}: {}, skipped", idx + 1, e);
            }
        }
    }
    Ok(stats)
}
