//! Emission gating for candidate headings

/// Suppresses candidate headings that moved less than the filter threshold
/// since the last emitted value
///
/// Owned by the session, never shared across sessions. Comparison against
/// the prior heading and the update of that prior happen inside a single
/// `&mut self` call, so the read-compare-write is atomic with respect to a
/// serialized sample stream.
#[derive(Debug, Clone, Copy)]
pub struct ChangeGate {
    /// Minimum movement in degrees required to admit a candidate
    threshold: f32,
    /// Last admitted heading, if any
    last: Option<f32>,
}

impl ChangeGate {
    /// Create a gate with the given threshold in degrees
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    /// Decide whether `candidate` (degrees, `[0, 360)`) should be emitted
    ///
    /// Admits when no heading has been admitted yet, or when the candidate
    /// moved at least the threshold away from the last admitted heading. On
    /// admission the candidate becomes the new reference.
    ///
    /// The difference is not wrapped at the 0/360 boundary: 359.9 and 0.1
    /// compare as 359.8 apart, so candidates straddling north always pass.
    pub fn admit(&mut self, candidate: f32) -> bool {
        match self.last {
            Some(last) if (last - candidate).abs() < self.threshold => false,
            _ => {
                self.last = Some(candidate);
                true
            }
        }
    }

    /// Last admitted heading
    pub fn last(&self) -> Option<f32> {
        self.last
    }
}
