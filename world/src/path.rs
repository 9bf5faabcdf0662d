//! Arc-length parametrized polyline that enemies travel along.

use rampart_core::FieldPoint;
use thiserror::Error;

/// Reasons a path cannot be constructed from the provided waypoints.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// A path requires at least two waypoints.
    #[error("a path requires at least two waypoints, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints provided.
        count: usize,
    },
    /// Consecutive waypoints collapsed to a total arc length of zero.
    #[error("path waypoints produce a zero-length polyline")]
    ZeroLength,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    start: FieldPoint,
    end: FieldPoint,
    offset: f32,
    length: f32,
}

/// Immutable polyline with precomputed per-segment arc lengths.
///
/// The total arc length is fixed for the lifetime of the session; converting
/// a traveled distance into a position never fails and clamps overshoot to
/// the final waypoint.
#[derive(Clone, Debug)]
pub struct PathModel {
    waypoints: Vec<FieldPoint>,
    segments: Vec<Segment>,
    total_length: f32,
}

impl PathModel {
    /// Builds a path from ordered waypoints, validating at construction time.
    ///
    /// Degenerate inputs are a setup-time precondition violation and fail
    /// fast; they can never occur mid-session.
    pub fn new(waypoints: Vec<FieldPoint>) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        let mut offset = 0.0_f32;
        for pair in waypoints.windows(2) {
            let length = pair[0].distance_to(pair[1]);
            segments.push(Segment {
                start: pair[0],
                end: pair[1],
                offset,
                length,
            });
            offset += length;
        }

        if offset <= 0.0 {
            return Err(PathError::ZeroLength);
        }

        Ok(Self {
            waypoints,
            segments,
            total_length: offset,
        })
    }

    /// Ordered waypoints the path was built from.
    #[must_use]
    pub fn waypoints(&self) -> &[FieldPoint] {
        &self.waypoints
    }

    /// Total arc length of the polyline in field units.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Converts a traveled distance into a 2D position.
    ///
    /// The lookup scans segments in waypoint order and resolves boundaries to
    /// the first segment whose `[start, end)` span contains the distance.
    /// Distances at or beyond the total length clamp to the final segment, so
    /// the conversion has no failure modes.
    #[must_use]
    pub fn position_at(&self, distance: f32) -> FieldPoint {
        let distance = distance.max(0.0);
        let segment = self
            .segments
            .iter()
            .find(|segment| distance < segment.offset + segment.length)
            .unwrap_or_else(|| &self.segments[self.segments.len() - 1]);

        if segment.length <= 0.0 {
            return segment.end;
        }

        let along = ((distance - segment.offset) / segment.length).clamp(0.0, 1.0);
        FieldPoint::new(
            segment.start.x() + (segment.end.x() - segment.start.x()) * along,
            segment.start.y() + (segment.end.y() - segment.start.y()) * along,
        )
    }
}
