//! Wizard application state machine
//!
//! `App` owns the generation request for the whole session. Key events and
//! backend responses are the only two things that mutate it, and both are
//! handled on the UI thread.

mod calls;
mod screen;

pub use calls::{BackendCall, CallOutcome, CallResponse, InputResult, PendingCall};
pub use screen::{LoadState, RowRef, Screen};

use crate::links::ExternalLink;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{debug, info, warn};
use shellgen_core::backend::{BackendResult, GenerationResult};
use shellgen_core::catalog::{self, Catalog};
use shellgen_core::config::Config;
use shellgen_core::download::DownloadedArtifact;
use shellgen_core::options::{OptionGroup, OptionKind, SelectionEvent};
use shellgen_core::request::GenerationRequest;
use shellgen_core::wizard::WizardStep;
use std::path::PathBuf;
use url::Url;

/// State of the result screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultState {
    Pending,
    Success {
        result: GenerationResult,
        dependencies: Option<ExternalLink>,
    },
    Failed,
}

pub struct App {
    pub current_step: WizardStep,
    request: GenerationRequest,
    catalog: Catalog,
    pub screen: Screen,
    result: ResultState,
    api_base: Url,
    download_dir: PathBuf,
    timeout_secs: u64,
    pub status_message: String,
    /// Bumped on every screen mount; responses carrying an older value are dropped.
    mount_id: u64,
    link_index: usize,
    downloading: bool,
    downloads: Vec<DownloadedArtifact>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            current_step: WizardStep::Home,
            request: GenerationRequest::new(),
            catalog: Catalog::default(),
            screen: Screen::default(),
            result: ResultState::Pending,
            api_base: config.api_base.clone(),
            download_dir: config.download_dir.clone(),
            timeout_secs: config.timeout_secs,
            status_message: "Press Enter to start.".to_string(),
            mount_id: 0,
            link_index: 0,
            downloading: false,
            downloads: Vec::new(),
        }
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn result(&self) -> &ResultState {
        &self.result
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn mount_id(&self) -> u64 {
        self.mount_id
    }

    pub fn link_index(&self) -> usize {
        self.link_index
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn downloads(&self) -> &[DownloadedArtifact] {
        &self.downloads
    }

    pub fn route(&self) -> String {
        self.current_step.route(&self.request)
    }

    /// Links shown on a successful result, in display order.
    pub fn result_links(&self) -> Vec<ExternalLink> {
        match self.result {
            ResultState::Success {
                ref result,
                ref dependencies,
            } => {
                let mut links = vec![
                    ExternalLink::new("Web shell", &result.shell.url),
                    ExternalLink::new("Client", &result.client.url),
                ];
                links.extend(dependencies.iter().cloned());
                links
            }
            _ => Vec::new(),
        }
    }

    pub fn handle_input(&mut self, key: KeyEvent) -> InputResult {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return InputResult::Quit;
        }
        match self.current_step {
            WizardStep::Home => self.handle_home_input(key),
            WizardStep::Result => self.handle_result_input(key),
            _ => self.handle_selection_input(key),
        }
    }

    /// Move forward if the current step's guard holds; otherwise stay put.
    /// Nothing advances while the step's options are still loading.
    pub fn attempt_advance(&mut self) -> InputResult {
        if self.screen.load == LoadState::Loading {
            debug!("{} still loading, staying", self.current_step.title());
            return InputResult::Continue;
        }
        match self.current_step.advance(&self.request) {
            Some(next) => self.mount(next),
            None => {
                debug!("{} incomplete, staying", self.current_step.title());
                InputResult::Continue
            }
        }
    }

    pub fn go_back(&mut self) -> InputResult {
        match self.current_step.prev() {
            Some(prev) => self.mount(prev),
            None => InputResult::Continue,
        }
    }

    /// Reset the request to its default shape and return to Home.
    pub fn start_over(&mut self) -> InputResult {
        info!("Starting over");
        self.request.reset();
        self.result = ResultState::Pending;
        self.downloading = false;
        self.downloads.clear();
        self.status_message = "Press Enter to start.".to_string();
        self.mount(WizardStep::Home)
    }

    /// Mount `step`; returns the backend call the screen needs, if any.
    pub fn enter(&mut self, step: WizardStep) -> Option<PendingCall> {
        self.current_step = step;
        self.mount_id += 1;
        self.link_index = 0;
        info!("Entering {} ({})", step.title(), self.route());

        let call = match step {
            WizardStep::Home => {
                self.screen = Screen::default();
                None
            }
            WizardStep::Shell => {
                self.screen = Screen::loading();
                Some(BackendCall::ShellTechnologies)
            }
            WizardStep::Features => {
                self.catalog.features.clear();
                self.screen = Screen::loading();
                Some(BackendCall::Features {
                    technology: self.request.shell().to_string(),
                })
            }
            WizardStep::Output => {
                // Built from the features fetched on the previous screen.
                let groups = catalog::output_groups(&self.catalog.features);
                for group in &groups {
                    group.apply_mount_defaults(&mut self.request);
                }
                self.screen = Screen::with_groups(groups, &self.request);
                None
            }
            WizardStep::Client => {
                self.screen = Screen::loading();
                Some(BackendCall::ClientTechnologies)
            }
            WizardStep::Result => {
                self.screen = Screen::default();
                self.result = ResultState::Pending;
                self.downloading = false;
                self.downloads.clear();
                self.status_message = "⏳ Generating your web shell...".to_string();
                Some(BackendCall::Generate(self.request.clone()))
            }
        };
        call.map(|call| PendingCall {
            ticket: self.mount_id,
            call,
        })
    }

    /// Apply a finished backend call to the mounted screen.
    pub fn apply_response(&mut self, response: CallResponse) {
        if response.ticket != self.mount_id {
            debug!(
                "Dropping stale response (ticket {}, mounted {})",
                response.ticket, self.mount_id
            );
            return;
        }
        match response.outcome {
            CallOutcome::Shells(result) => {
                let groups = result.map(|shells| {
                    self.catalog.shells = shells;
                    vec![catalog::shell_group(&self.catalog.shells)]
                });
                self.show_groups(groups);
            }
            CallOutcome::Clients(result) => {
                let groups = result.map(|clients| {
                    self.catalog.clients = clients;
                    vec![catalog::client_group(&self.catalog.clients)]
                });
                self.show_groups(groups);
            }
            CallOutcome::Features(result) => {
                let groups = result.map(|features| {
                    self.catalog.features = features;
                    catalog::feature_groups(&self.catalog.features)
                });
                self.show_groups(groups);
            }
            CallOutcome::Generated(Ok(result)) => {
                info!("Generation succeeded: {}", result.shell.url);
                let dependencies = self.dependency_link();
                self.result = ResultState::Success {
                    result,
                    dependencies,
                };
                self.status_message = "✅ Your web shell is ready.".to_string();
            }
            CallOutcome::Generated(Err(err)) => {
                warn!("Generation failed: {}", err);
                self.result = ResultState::Failed;
                self.status_message = "❌ Generation failed.".to_string();
            }
            CallOutcome::Downloaded(Ok(files)) => {
                self.downloading = false;
                self.status_message = format!(
                    "✅ Saved {} file(s) to {}",
                    files.len(),
                    self.download_dir.display()
                );
                self.downloads = files;
            }
            CallOutcome::Downloaded(Err(err)) => {
                warn!("Download failed: {}", err);
                self.downloading = false;
                self.status_message = format!("❌ Download failed: {}", err);
            }
        }
    }

    fn mount(&mut self, step: WizardStep) -> InputResult {
        match self.enter(step) {
            Some(call) => InputResult::Call(call),
            None => InputResult::Continue,
        }
    }

    fn show_groups(&mut self, groups: BackendResult<Vec<OptionGroup>>) {
        match groups {
            Ok(groups) => {
                self.screen = Screen::with_groups(groups, &self.request);
            }
            Err(err) => {
                warn!(
                    "Failed to load options for {}: {}",
                    self.current_step.title(),
                    err
                );
                self.screen = Screen::failed();
            }
        }
    }

    fn dependency_link(&self) -> Option<ExternalLink> {
        let client = self.request.client();
        if client.is_empty() {
            return None;
        }
        let path = self.catalog.dependency_path(client)?;
        let url = catalog::resolve_backend_url(&self.api_base, path)?;
        Some(ExternalLink::new("Client dependencies", url.as_str()))
    }

    fn handle_home_input(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Enter => self.attempt_advance(),
            KeyCode::Esc | KeyCode::Char('q') => InputResult::Quit,
            _ => InputResult::Continue,
        }
    }

    fn handle_selection_input(&mut self, key: KeyEvent) -> InputResult {
        match key.code {
            KeyCode::Up | KeyCode::BackTab => {
                self.screen.move_cursor(-1);
                return InputResult::Continue;
            }
            KeyCode::Down | KeyCode::Tab => {
                self.screen.move_cursor(1);
                return InputResult::Continue;
            }
            KeyCode::Enter => return self.attempt_advance(),
            KeyCode::Esc => return self.go_back(),
            _ => {}
        }

        // Text rows take every other key.
        if let Some(option_key) = self.focused_argument_key() {
            self.edit_argument(&option_key, key);
            return InputResult::Continue;
        }

        match key.code {
            KeyCode::Char(' ') => {
                self.activate_focused();
                InputResult::Continue
            }
            KeyCode::Char('j') => {
                self.screen.move_cursor(1);
                InputResult::Continue
            }
            KeyCode::Char('k') => {
                self.screen.move_cursor(-1);
                InputResult::Continue
            }
            KeyCode::Char('q') => InputResult::Quit,
            _ => InputResult::Continue,
        }
    }

    fn handle_result_input(&mut self, key: KeyEvent) -> InputResult {
        let links = self.result_links();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.link_index = self.link_index.saturating_sub(1);
                InputResult::Continue
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.link_index + 1 < links.len() {
                    self.link_index += 1;
                }
                InputResult::Continue
            }
            KeyCode::Char('o') => match links.get(self.link_index) {
                Some(link) => InputResult::OpenLink(link.url.clone()),
                None => InputResult::Continue,
            },
            KeyCode::Char('d') => self.start_download(),
            KeyCode::Enter | KeyCode::Char('r') => self.start_over(),
            KeyCode::Char('q') => InputResult::Quit,
            _ => InputResult::Continue,
        }
    }

    fn start_download(&mut self) -> InputResult {
        let result = match self.result {
            ResultState::Success { ref result, .. } if !self.downloading => result.clone(),
            _ => return InputResult::Continue,
        };
        self.downloading = true;
        self.status_message = format!(
            "⬇️ Downloading artifacts to {}...",
            self.download_dir.display()
        );
        InputResult::Call(PendingCall {
            ticket: self.mount_id,
            call: BackendCall::Download {
                result,
                dir: self.download_dir.clone(),
                timeout_secs: self.timeout_secs,
            },
        })
    }

    fn focused_argument_key(&self) -> Option<String> {
        let (_, option) = self.screen.focused()?;
        (option.kind() == OptionKind::WithArgument).then(|| option.key.clone())
    }

    fn activate_focused(&mut self) {
        let Some((group, option)) = self.screen.focused() else {
            return;
        };
        match group.activate(&option.key, &mut self.request) {
            Ok(Some(event)) => self.status_message = describe(&event),
            Ok(None) => {}
            Err(err) => warn!("{}", err),
        }
    }

    fn edit_argument(&mut self, option_key: &str, key: KeyEvent) {
        let Some(field) = self.screen.field_mut(option_key) else {
            return;
        };
        if !field.handle_key(key) {
            return;
        }
        let value = field.value().to_string();
        let Some((group, _)) = self.screen.focused() else {
            return;
        };
        match group.set_argument(option_key, &value, &mut self.request) {
            Ok(Some(event)) => self.status_message = describe(&event),
            Ok(None) => {}
            Err(err) => warn!("{}", err),
        }
    }
}

fn describe(event: &SelectionEvent) -> String {
    match event {
        SelectionEvent::Selected { key } => format!("✅ Selected {}", key),
        SelectionEvent::Updated { key } => format!("✏️ Updated {}", key),
        SelectionEvent::Deselected { key } => format!("Removed {}", key),
    }
}
