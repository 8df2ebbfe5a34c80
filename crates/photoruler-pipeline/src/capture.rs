//! Interactive polygon capture.
//!
//! The UI itself is a [`PointPicker`]; [`InteractiveCapture`] owns the
//! pick, confirm and retry loop around it and exposes the result through
//! the [`PolygonCapture`] collaborator used by the rectifier.

use log::debug;
use photoruler_core::{order_clockwise, Polygon, Pt2, Result, RulerError};
use serde::{Deserialize, Serialize};

/// On-screen point selection. Every call blocks until the user answers.
pub trait PointPicker {
    type Image: ?Sized;

    /// Let the user click `n` points; `hint` is a polygon that may be drawn
    /// as a starting suggestion. `None` means the window was closed.
    fn pick(&mut self, image: &Self::Image, n: usize, hint: Option<&Polygon>) -> Option<Vec<Pt2>>;

    /// "Is that correct?"
    fn confirm(&mut self, polygon: &Polygon) -> bool;

    /// "Set the points again?"
    fn ask_retry(&mut self) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Captured(Polygon),
    Aborted,
}

/// Source of polygons drawn on an image.
pub trait PolygonCapture {
    type Image: ?Sized;

    fn capture(
        &mut self,
        image: &Self::Image,
        n_sides: usize,
        fallback: Option<&Polygon>,
    ) -> Result<CaptureOutcome>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureOptions {
    /// Number of picks before giving up, including the first.
    pub max_attempts: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self { max_attempts: 5 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CaptureState {
    Capturing { attempt: usize },
    Confirming { attempt: usize, polygon: Polygon },
    Retrying { attempt: usize },
    Aborted,
    Accepted(Polygon),
}

/// [`PolygonCapture`] that asks a [`PointPicker`] until the user accepts,
/// declines to retry, or the attempts run out.
#[derive(Debug)]
pub struct InteractiveCapture<P> {
    picker: P,
    options: CaptureOptions,
}

impl<P: PointPicker> InteractiveCapture<P> {
    pub fn new(picker: P, options: CaptureOptions) -> Self {
        Self { picker, options }
    }

    pub fn picker(&self) -> &P {
        &self.picker
    }

    pub fn into_picker(self) -> P {
        self.picker
    }

    /// Advance the state machine by one user interaction.
    pub fn step(
        &mut self,
        state: CaptureState,
        image: &P::Image,
        n_sides: usize,
        hint: Option<&Polygon>,
    ) -> Result<CaptureState> {
        let next = match state {
            CaptureState::Capturing { attempt } => match self.picker.pick(image, n_sides, hint) {
                None => CaptureState::Aborted,
                Some(points) => {
                    if points.len() != n_sides {
                        return Err(RulerError::InvalidPolygon(format!(
                            "picked {} points, expected {}",
                            points.len(),
                            n_sides
                        )));
                    }
                    let points: Vec<Pt2> = points.iter().map(|p| p.map(f64::abs)).collect();
                    let polygon = order_clockwise(&Polygon::from_pt2(&points)?)?;
                    CaptureState::Confirming { attempt, polygon }
                }
            },
            CaptureState::Confirming { attempt, polygon } => {
                if self.picker.confirm(&polygon) {
                    CaptureState::Accepted(polygon)
                } else {
                    CaptureState::Retrying { attempt }
                }
            }
            CaptureState::Retrying { attempt } => {
                if attempt < self.options.max_attempts && self.picker.ask_retry() {
                    CaptureState::Capturing { attempt: attempt + 1 }
                } else {
                    CaptureState::Aborted
                }
            }
            terminal @ (CaptureState::Aborted | CaptureState::Accepted(_)) => terminal,
        };
        debug!("capture: -> {:?}", next);
        Ok(next)
    }
}

impl<P: PointPicker> PolygonCapture for InteractiveCapture<P> {
    type Image = P::Image;

    fn capture(
        &mut self,
        image: &P::Image,
        n_sides: usize,
        fallback: Option<&Polygon>,
    ) -> Result<CaptureOutcome> {
        if self.options.max_attempts == 0 {
            return Err(RulerError::InvalidParameter(
                "capture needs at least one attempt".into(),
            ));
        }
        let mut state = CaptureState::Capturing { attempt: 1 };
        loop {
            state = match self.step(state, image, n_sides, fallback)? {
                CaptureState::Accepted(polygon) => return Ok(CaptureOutcome::Captured(polygon)),
                CaptureState::Aborted => return Ok(CaptureOutcome::Aborted),
                next => next,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers.
    #[derive(Default)]
    struct Scripted {
        picks: VecDeque<Option<Vec<Pt2>>>,
        confirms: VecDeque<bool>,
        retries: VecDeque<bool>,
        hints_seen: usize,
    }

    impl PointPicker for Scripted {
        type Image = ();

        fn pick(&mut self, _: &(), _: usize, hint: Option<&Polygon>) -> Option<Vec<Pt2>> {
            if hint.is_some() {
                self.hints_seen += 1;
            }
            self.picks.pop_front().flatten()
        }

        fn confirm(&mut self, _: &Polygon) -> bool {
            self.confirms.pop_front().unwrap_or(false)
        }

        fn ask_retry(&mut self) -> bool {
            self.retries.pop_front().unwrap_or(false)
        }
    }

    fn clicks() -> Vec<Pt2> {
        vec![
            Pt2::new(10.0, 90.0),
            Pt2::new(-90.0, 10.0),
            Pt2::new(10.0, 10.0),
            Pt2::new(90.0, 90.0),
        ]
    }

    #[test]
    fn accepted_points_are_absolute_and_ordered() {
        let picker = Scripted {
            picks: [Some(clicks())].into(),
            confirms: [true].into(),
            ..Default::default()
        };
        let mut capture = InteractiveCapture::new(picker, CaptureOptions::default());
        let CaptureOutcome::Captured(poly) = capture.capture(&(), 4, None).unwrap() else {
            panic!("expected a polygon");
        };
        let expected = order_clockwise(
            &Polygon::from_rows(&[[10.0, 90.0], [90.0, 10.0], [10.0, 10.0], [90.0, 90.0]]).unwrap(),
        )
        .unwrap();
        assert_eq!(poly, expected);
        assert!(poly.points().iter().all(|p| p.iter().all(|v| *v >= 0.0)));
    }

    #[test]
    fn retry_then_accept() {
        let picker = Scripted {
            picks: [Some(clicks()), Some(clicks())].into(),
            confirms: [false, true].into(),
            retries: [true].into(),
            ..Default::default()
        };
        let mut capture = InteractiveCapture::new(picker, CaptureOptions::default());
        let fallback = Polygon::from_pt2(&clicks()).unwrap();
        let outcome = capture.capture(&(), 4, Some(&fallback)).unwrap();
        assert!(matches!(outcome, CaptureOutcome::Captured(_)));
        assert_eq!(capture.picker().hints_seen, 2);
    }

    #[test]
    fn declined_retry_and_closed_window_abort() {
        let declined = Scripted {
            picks: [Some(clicks())].into(),
            confirms: [false].into(),
            retries: [false].into(),
            ..Default::default()
        };
        let mut capture = InteractiveCapture::new(declined, CaptureOptions::default());
        assert_eq!(capture.capture(&(), 4, None).unwrap(), CaptureOutcome::Aborted);

        let mut closed = InteractiveCapture::new(Scripted::default(), CaptureOptions::default());
        assert_eq!(closed.capture(&(), 4, None).unwrap(), CaptureOutcome::Aborted);
    }

    #[test]
    fn attempts_are_bounded() {
        let picker = Scripted {
            picks: std::iter::repeat(Some(clicks())).take(10).collect(),
            confirms: std::iter::repeat(false).take(10).collect(),
            retries: std::iter::repeat(true).take(10).collect(),
            ..Default::default()
        };
        let mut capture = InteractiveCapture::new(picker, CaptureOptions { max_attempts: 2 });
        assert_eq!(capture.capture(&(), 4, None).unwrap(), CaptureOutcome::Aborted);
        let picker = capture.into_picker();
        assert_eq!(picker.picks.len(), 8);
        assert_eq!(picker.retries.len(), 9);
    }

    #[test]
    fn wrong_point_count_is_an_error() {
        let picker = Scripted {
            picks: [Some(clicks()[..3].to_vec())].into(),
            ..Default::default()
        };
        let mut capture = InteractiveCapture::new(picker, CaptureOptions::default());
        assert!(matches!(
            capture.capture(&(), 4, None),
            Err(RulerError::InvalidPolygon(_))
        ));
    }

    #[test]
    fn step_walks_the_states() {
        let picker = Scripted {
            picks: [Some(clicks())].into(),
            confirms: [true].into(),
            ..Default::default()
        };
        let mut capture = InteractiveCapture::new(picker, CaptureOptions::default());
        let s = capture.step(CaptureState::Capturing { attempt: 1 }, &(), 4, None).unwrap();
        assert!(matches!(s, CaptureState::Confirming { attempt: 1, .. }));
        let s = capture.step(s, &(), 4, None).unwrap();
        assert!(matches!(s, CaptureState::Accepted(_)));
        assert_eq!(capture.step(s.clone(), &(), 4, None).unwrap(), s);
    }
}
