//! The linear step sequence and its navigation guard.
//!
//! Flow: Home → Shell → Features → Output → Client → Result

use crate::errors::SelectionError;
use crate::request::GenerationRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    Home,
    Shell,
    Features,
    Output,
    Client,
    Result,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::Home,
            WizardStep::Shell,
            WizardStep::Features,
            WizardStep::Output,
            WizardStep::Client,
            WizardStep::Result,
        ]
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Home => "Welcome",
            WizardStep::Shell => "Select Shell Technology",
            WizardStep::Features => "Select Features",
            WizardStep::Output => "Select Output",
            WizardStep::Client => "Select Client Technology",
            WizardStep::Result => "Result",
        }
    }

    pub fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Home => Some(WizardStep::Shell),
            WizardStep::Shell => Some(WizardStep::Features),
            WizardStep::Features => Some(WizardStep::Output),
            WizardStep::Output => Some(WizardStep::Client),
            WizardStep::Client => Some(WizardStep::Result),
            WizardStep::Result => None,
        }
    }

    // Result is left with "start over", not by stepping back.
    pub fn prev(&self) -> Option<WizardStep> {
        match self {
            WizardStep::Home => None,
            WizardStep::Shell => Some(WizardStep::Home),
            WizardStep::Features => Some(WizardStep::Shell),
            WizardStep::Output => Some(WizardStep::Features),
            WizardStep::Client => Some(WizardStep::Output),
            WizardStep::Result => None,
        }
    }

    /// Route of the screen; the features route embeds the chosen shell.
    pub fn route(&self, request: &GenerationRequest) -> String {
        match self {
            WizardStep::Home => "/".to_string(),
            WizardStep::Shell => "/shell".to_string(),
            WizardStep::Features => format!("/features/{}", request.shell()),
            WizardStep::Output => "/output".to_string(),
            WizardStep::Client => "/client".to_string(),
            WizardStep::Result => "/result".to_string(),
        }
    }

    /// Whether the step's required selection is present.
    pub fn is_complete(&self, request: &GenerationRequest) -> bool {
        match self {
            WizardStep::Home => true,
            WizardStep::Shell => !request.shell().is_empty(),
            // No minimum number of features; only the upstream shell choice matters.
            WizardStep::Features => !request.shell().is_empty(),
            WizardStep::Output => !request.output_format().is_empty(),
            WizardStep::Client => !request.client().is_empty(),
            WizardStep::Result => false,
        }
    }

    /// The step reached by "continue", or `None` when the guard blocks it.
    pub fn advance(&self, request: &GenerationRequest) -> Option<WizardStep> {
        if self.is_complete(request) {
            self.next()
        } else {
            None
        }
    }
}

/// Check every step up to (not including) Result, for scripted submissions.
pub fn ensure_submittable(request: &GenerationRequest) -> Result<(), SelectionError> {
    for step in WizardStep::all() {
        if *step == WizardStep::Result {
            break;
        }
        if !step.is_complete(request) {
            return Err(SelectionError::StepIncomplete(step.title()));
        }
    }
    Ok(())
}
