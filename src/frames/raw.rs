//! Producer record shapes and their normalisation.
//!
//! Inference producers disagree on how a point looks:
//!
//! | Producer shape                         | Example                                  |
//! |----------------------------------------|------------------------------------------|
//! | Named keypoint record                  | `{"name":"nose","x":1,"y":2,"score":0.9}` |
//! | Positional keypoint array (COCO order) | `[1, 2, 0.9]`                             |
//! | Landmark pair / triple                 | `[1, 2]`, `[1, 2, -3]`                    |
//! | Landmark record                        | `{"x":1,"y":2,"z":-3}`                    |
//!
//! and on where a face keeps its mesh (`keypoints`, `scaledMesh` or
//! `points`).  This module is the only place that knows about any of that.

use log::debug;
use serde::Deserialize;

use super::{BodyPart, Face, FaceFrame, Point2D, Pose, PoseFrame, PoseKeypoint};

/// Confidence assumed when a producer omits it.
const DEFAULT_CONFIDENCE: f32 = 1.0;

// ---------------------------------------------------------------------------
// Raw shapes
// ---------------------------------------------------------------------------

/// A landmark as either a coordinate sequence or a named-field record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawPoint {
    Seq(Vec<f32>),
    Fields { x: f32, y: f32 },
}

impl RawPoint {
    pub fn to_point(&self) -> Option<Point2D> {
        let p = match self {
            Self::Seq(v) if v.len() >= 2 => Point2D::new(v[0], v[1]),
            Self::Seq(_) => return None,
            Self::Fields { x, y } => Point2D::new(*x, *y),
        };
        p.is_finite().then_some(p)
    }
}

/// A pose keypoint as a named record or a positional `[x, y, score?]` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawKeypoint {
    Named {
        name: String,
        x: f32,
        y: f32,
        #[serde(default)]
        confidence: Option<f32>,
        #[serde(default)]
        score: Option<f32>,
    },
    Seq(Vec<f32>),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPose {
    #[serde(default)]
    pub keypoints: Vec<RawKeypoint>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFace {
    #[serde(default)]
    pub keypoints: Option<Vec<RawPoint>>,
    #[serde(default, rename = "scaledMesh")]
    pub scaled_mesh: Option<Vec<RawPoint>>,
    #[serde(default)]
    pub points: Option<Vec<RawPoint>>,
}

impl RawFace {
    fn mesh(&self) -> Option<&[RawPoint]> {
        self.keypoints
            .as_deref()
            .or(self.scaled_mesh.as_deref())
            .or(self.points.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Normalise one keypoint; `index` is its position in the producer's list.
pub fn normalize_keypoint(index: usize, raw: &RawKeypoint) -> Option<PoseKeypoint> {
    let (part, position, confidence) = match raw {
        RawKeypoint::Named {
            name,
            x,
            y,
            confidence,
            score,
        } => (
            BodyPart::from_name(name)?,
            Point2D::new(*x, *y),
            confidence.or(*score).unwrap_or(DEFAULT_CONFIDENCE),
        ),
        RawKeypoint::Seq(v) if v.len() >= 2 => (
            BodyPart::from_coco_index(index)?,
            Point2D::new(v[0], v[1]),
            v.get(2).copied().unwrap_or(DEFAULT_CONFIDENCE),
        ),
        RawKeypoint::Seq(_) => return None,
    };
    if !position.is_finite() || !confidence.is_finite() {
        return None;
    }
    Some(PoseKeypoint {
        part,
        position,
        confidence,
    })
}

/// Keep the first detected person; unknown or malformed keypoints are dropped.
pub fn normalize_pose_frame(poses: &[RawPose]) -> PoseFrame {
    let Some(raw) = poses.first() else {
        return PoseFrame::empty();
    };
    let pose = Pose::from_keypoints(
        raw.keypoints
            .iter()
            .enumerate()
            .filter_map(|(i, kp)| normalize_keypoint(i, kp)),
    );
    PoseFrame::with_pose(pose)
}

/// Keep the first detected face.  A mesh with any unreadable point is
/// discarded whole, since dropping points would shift the fixed indices.
pub fn normalize_face_frame(faces: &[RawFace]) -> FaceFrame {
    let Some(mesh) = faces.first().and_then(RawFace::mesh) else {
        return FaceFrame::empty();
    };
    let landmarks: Option<Vec<Point2D>> = mesh.iter().map(RawPoint::to_point).collect();
    match landmarks {
        Some(landmarks) => FaceFrame::with_face(Face::new(landmarks)),
        None => {
            debug!("face mesh with malformed landmark discarded");
            FaceFrame::empty()
        }
    }
}
