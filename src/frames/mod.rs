//! Canonical keypoint frames.
//!
//! Every inference producer, whatever its record shape, is normalised into
//! these types at the boundary (see [`raw`]).  Detection code only ever sees
//! a [`PoseFrame`] or a [`FaceFrame`].
//!
//! Coordinates are device pixels in the un-mirrored camera frame, with `y`
//! growing downwards.

pub mod raw;

use heapless::Vec as FixedVec;

/// Upper bound on keypoints per pose (BlazePose emits 33, COCO models 17).
pub const MAX_KEYPOINTS: usize = 33;

/// Face mesh indices with a fixed meaning regardless of producer.
pub mod landmarks {
    /// Left mouth corner.
    pub const MOUTH_LEFT: usize = 61;
    /// Right mouth corner.
    pub const MOUTH_RIGHT: usize = 291;
    /// Upper lip centre.
    pub const UPPER_LIP: usize = 13;
    /// Lower lip centre.
    pub const LOWER_LIP: usize = 14;
    /// A face needs at least this many landmarks to address all of the above.
    pub const MIN_FACE_LANDMARKS: usize = 292;
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Reflect horizontally about a frame of the given width.
    pub fn mirrored(self, width: f32) -> Self {
        Self {
            x: width - self.x,
            y: self.y,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Pose
// ---------------------------------------------------------------------------

/// COCO-17 body parts, in the positional order used by array-shaped producers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyPart {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl BodyPart {
    pub const ALL: [Self; 17] = [
        Self::Nose,
        Self::LeftEye,
        Self::RightEye,
        Self::LeftEar,
        Self::RightEar,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
    ];

    pub fn from_coco_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Canonical snake_case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// Accepts `left_shoulder`, `leftShoulder` and `left-shoulder` alike.
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase());
        Self::ALL.into_iter().find(|part| {
            part.as_str()
                .chars()
                .filter(|c| *c != '_')
                .eq(wanted.clone())
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseKeypoint {
    pub part: BodyPart,
    pub position: Point2D,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f32,
}

/// One detected person.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    keypoints: FixedVec<PoseKeypoint, MAX_KEYPOINTS>,
}

impl Pose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from keypoints, silently keeping the first [`MAX_KEYPOINTS`].
    pub fn from_keypoints(keypoints: impl IntoIterator<Item = PoseKeypoint>) -> Self {
        let mut pose = Self::new();
        for kp in keypoints {
            if !pose.push(kp) {
                break;
            }
        }
        pose
    }

    /// Returns `false` if the pose is full.
    pub fn push(&mut self, keypoint: PoseKeypoint) -> bool {
        self.keypoints.push(keypoint).is_ok()
    }

    /// First keypoint for `part`, if the producer reported one.
    pub fn keypoint(&self, part: BodyPart) -> Option<&PoseKeypoint> {
        self.keypoints.iter().find(|k| k.part == part)
    }

    /// Keypoint for `part` only if it is at least `min_confidence`.
    pub fn confident(&self, part: BodyPart, min_confidence: f32) -> Option<Point2D> {
        self.keypoint(part)
            .filter(|k| k.confidence >= min_confidence)
            .map(|k| k.position)
    }

    pub fn len(&self) -> usize {
        self.keypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keypoints.is_empty()
    }
}

/// Pose stream sample: zero or one person.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseFrame {
    pub pose: Option<Pose>,
}

impl PoseFrame {
    pub fn empty() -> Self {
        Self { pose: None }
    }

    pub fn with_pose(pose: Pose) -> Self {
        Self { pose: Some(pose) }
    }
}

// ---------------------------------------------------------------------------
// Face
// ---------------------------------------------------------------------------

/// Index-addressable face mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Face {
    pub landmarks: Vec<Point2D>,
}

impl Face {
    pub fn new(landmarks: Vec<Point2D>) -> Self {
        Self { landmarks }
    }

    pub fn landmark(&self, idx: usize) -> Option<Point2D> {
        self.landmarks.get(idx).copied()
    }
}

/// Face stream sample: zero or one face.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FaceFrame {
    pub face: Option<Face>,
}

impl FaceFrame {
    pub fn empty() -> Self {
        Self { face: None }
    }

    pub fn with_face(face: Face) -> Self {
        Self { face: Some(face) }
    }
}
