//! Boundary to the gesture classifier.

use crate::types::{Event, Frame};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("classification failed: {0}")]
    Failed(String),
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),
}

/// Whether the classifier should also return a diagnostic image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    #[default]
    Quiet,
    Verbose,
}

impl From<bool> for Verbosity {
    fn from(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Quiet
        }
    }
}

/// Result of classifying one region.
#[derive(Debug, Clone)]
pub enum Classification {
    Event(Event),
    /// Event plus an annotated image showing what the classifier saw.
    Diagnostic { event: Event, image: Frame },
}

impl Classification {
    pub fn event(&self) -> Event {
        match self {
            Classification::Event(event) => *event,
            Classification::Diagnostic { event, .. } => *event,
        }
    }

    /// Split into the event and the image to publish, falling back to
    /// `region` when no diagnostic image was produced.
    pub fn into_parts(self, region: Frame) -> (Event, Frame) {
        match self {
            Classification::Event(event) => (event, region),
            Classification::Diagnostic { event, image } => (event, image),
        }
    }
}

/// Maps a region of interest to a gesture event.
///
/// Implementations receive the region by shared reference and must not
/// rely on it outliving the call.
pub trait Classifier: Send {
    fn classify(
        &mut self,
        region: &Frame,
        verbosity: Verbosity,
    ) -> Result<Classification, ClassifierError>;
}

impl<F> Classifier for F
where
    F: FnMut(&Frame, Verbosity) -> Result<Classification, ClassifierError> + Send,
{
    fn classify(
        &mut self,
        region: &Frame,
        verbosity: Verbosity,
    ) -> Result<Classification, ClassifierError> {
        self(region, verbosity)
    }
}

/// Classifier for preview-only use: always reports [`Event::None`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassifier;

impl Classifier for NoopClassifier {
    fn classify(
        &mut self,
        region: &Frame,
        verbosity: Verbosity,
    ) -> Result<Classification, ClassifierError> {
        Ok(match verbosity {
            Verbosity::Quiet => Classification::Event(Event::None),
            Verbosity::Verbose => Classification::Diagnostic {
                event: Event::None,
                image: region.clone(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_into_parts_falls_back_to_region() {
        let region = Frame::from_pixel(2, 2, Rgb([1, 1, 1]));
        let (event, image) = Classification::Event(Event::Paper).into_parts(region.clone());
        assert_eq!(event, Event::Paper);
        assert_eq!(image, region);
    }

    #[test]
    fn test_into_parts_prefers_diagnostic() {
        let region = Frame::from_pixel(2, 2, Rgb([1, 1, 1]));
        let diag = Frame::from_pixel(3, 3, Rgb([9, 9, 9]));
        let c = Classification::Diagnostic {
            event: Event::Lizard,
            image: diag.clone(),
        };
        assert_eq!(c.event(), Event::Lizard);
        assert_eq!(c.into_parts(region), (Event::Lizard, diag));
    }

    #[test]
    fn test_noop_classifier_shapes() {
        let region = Frame::from_pixel(2, 2, Rgb([5, 5, 5]));
        let mut noop = NoopClassifier;
        let quiet = noop.classify(&region, Verbosity::Quiet).unwrap();
        assert!(matches!(quiet, Classification::Event(Event::None)));
        let verbose = noop.classify(&region, Verbosity::Verbose).unwrap();
        assert!(matches!(verbose, Classification::Diagnostic { event: Event::None, .. }));
    }

    #[test]
    fn test_closure_classifier() {
        let mut classify =
            |_: &Frame, _: Verbosity| Ok::<_, ClassifierError>(Classification::Event(Event::Rock));
        let region = Frame::new(1, 1);
        let c = Classifier::classify(&mut classify, &region, Verbosity::Quiet).unwrap();
        assert_eq!(c.event(), Event::Rock);
    }
}
