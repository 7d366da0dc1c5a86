use serde::{Deserialize, Serialize};

use crate::utils::coordinate::{FrameSize, NormalizedLandmark, Point2D};

/// Number of landmarks in a full body pose
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Body landmark indices of the 33-point pose topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum PoseLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl PoseLandmark {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Skeleton edges drawn on the overlay
pub const POSE_CONNECTIONS: [(PoseLandmark, PoseLandmark); 35] = {
    use self::PoseLandmark::*;
    [
        (Nose, LeftEyeInner),
        (LeftEyeInner, LeftEye),
        (LeftEye, LeftEyeOuter),
        (LeftEyeOuter, LeftEar),
        (Nose, RightEyeInner),
        (RightEyeInner, RightEye),
        (RightEye, RightEyeOuter),
        (RightEyeOuter, RightEar),
        (MouthLeft, MouthRight),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (LeftWrist, LeftPinky),
        (LeftWrist, LeftIndex),
        (LeftWrist, LeftThumb),
        (LeftPinky, LeftIndex),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (RightWrist, RightPinky),
        (RightWrist, RightIndex),
        (RightWrist, RightThumb),
        (RightPinky, RightIndex),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (LeftAnkle, LeftHeel),
        (LeftHeel, LeftFootIndex),
        (LeftAnkle, LeftFootIndex),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
        (RightAnkle, RightHeel),
        (RightHeel, RightFootIndex),
        (RightAnkle, RightFootIndex),
    ]
};

/// Landmark set returned by a successful pose detection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoseLandmarks {
    landmarks: Vec<NormalizedLandmark>,
}

impl PoseLandmarks {
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Self {
        PoseLandmarks { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// A partial set cannot feed every joint angle.
    pub fn is_complete(&self) -> bool {
        self.landmarks.len() >= POSE_LANDMARK_COUNT
    }

    pub fn get(&self, landmark: PoseLandmark) -> Option<&NormalizedLandmark> {
        self.landmarks.get(landmark.index())
    }

    /// pixel returns the landmark position in pixels for the given frame.
    pub fn pixel(&self, landmark: PoseLandmark, size: FrameSize) -> Option<Point2D> {
        self.get(landmark).map(|lmk| lmk.to_pixel(size))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NormalizedLandmark> {
        self.landmarks.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::modules::pose_landmark::{PoseLandmark, PoseLandmarks, POSE_CONNECTIONS, POSE_LANDMARK_COUNT};
    use crate::utils::coordinate::{FrameSize, NormalizedLandmark, Point2D};

    #[test]
    fn test_indices() {
        assert_eq!(PoseLandmark::Nose.index(), 0);
        assert_eq!(PoseLandmark::LeftShoulder.index(), 11);
        assert_eq!(PoseLandmark::LeftWrist.index(), 15);
        assert_eq!(PoseLandmark::LeftHip.index(), 23);
        assert_eq!(PoseLandmark::LeftAnkle.index(), 27);
        assert_eq!(PoseLandmark::RightFootIndex.index(), POSE_LANDMARK_COUNT - 1);
    }

    #[test]
    fn test_connections_in_range() {
        for (a, b) in POSE_CONNECTIONS {
            assert!(a.index() < POSE_LANDMARK_COUNT);
            assert!(b.index() < POSE_LANDMARK_COUNT);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_lookup_and_partial_set() {
        let mut lmks = vec![NormalizedLandmark::new(0.0, 0.0); 12];
        lmks[11] = NormalizedLandmark::new(0.5, 0.25);
        let pose = PoseLandmarks::new(lmks);

        assert!(!pose.is_complete());
        assert_eq!(
            pose.pixel(PoseLandmark::LeftShoulder, FrameSize::new(640, 480)),
            Some(Point2D::new(320.0, 120.0))
        );
        assert_eq!(pose.get(PoseLandmark::LeftHip), None);
    }
}
