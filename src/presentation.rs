use crate::scoring::SkillVector;

/// Visual elements the engine can address without touching layout concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    PrimaryImage,
    SecondaryImage,
    SummaryPanel,
    SlotText(usize),
}

/// The two image positions on the game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Primary,
    Secondary,
}

/// Boundary to the presentation layer. The engine requests what should be
/// shown; implementations own widgets, pixels and control lifecycle.
pub trait Presentation {
    fn show_image(&mut self, slot: ImageSlot, asset: &str);
    fn set_caption(&mut self, text: &str);
    fn fade(&mut self, element: Element, from: f32, to: f32, duration_secs: f64);
    fn set_choice_visible(&mut self, index: usize, visible: bool);
    fn set_confirm_label(&mut self, text: &str);
    fn clear_all(&mut self);
}

/// Boundary to the screen registry; names are opaque to the engine.
pub trait Navigation {
    fn activate_screen(&mut self, name: &str);
}

/// Consumer of the final skill vector, once per completed session.
pub trait ResultSink {
    fn submit(&self, skills: SkillVector);
}

/// Every call the engine can make, captured for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationCall {
    ShowImage(ImageSlot, String),
    SetCaption(String),
    Fade(Element, f32, f32, f64),
    SetChoiceVisible(usize, bool),
    SetConfirmLabel(String),
    ClearAll,
}

/// Test double that records calls in order. Also serves as a no-op
/// presentation for headless runs.
#[derive(Debug, Default)]
pub struct RecordingPresentation {
    pub calls: Vec<PresentationCall>,
}

impl RecordingPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, matching: impl Fn(&PresentationCall) -> bool) -> usize {
        self.calls.iter().filter(|c| matching(c)).count()
    }
}

impl Presentation for RecordingPresentation {
    fn show_image(&mut self, slot: ImageSlot, asset: &str) {
        self.calls
            .push(PresentationCall::ShowImage(slot, asset.to_string()));
    }

    fn set_caption(&mut self, text: &str) {
        self.calls.push(PresentationCall::SetCaption(text.to_string()));
    }

    fn fade(&mut self, element: Element, from: f32, to: f32, duration_secs: f64) {
        self.calls
            .push(PresentationCall::Fade(element, from, to, duration_secs));
    }

    fn set_choice_visible(&mut self, index: usize, visible: bool) {
        self.calls
            .push(PresentationCall::SetChoiceVisible(index, visible));
    }

    fn set_confirm_label(&mut self, text: &str) {
        self.calls
            .push(PresentationCall::SetConfirmLabel(text.to_string()));
    }

    fn clear_all(&mut self) {
        self.calls.push(PresentationCall::ClearAll);
    }
}

/// Test double recording activated screen names.
#[derive(Debug, Default)]
pub struct RecordingNavigation {
    pub activated: Vec<String>,
}

impl Navigation for RecordingNavigation {
    fn activate_screen(&mut self, name: &str) {
        self.activated.push(name.to_string());
    }
}
