use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use shellgen_core::backend::{Artifact, Backend, BackendResult, Checksum, GenerationResult};
use shellgen_core::catalog::{
    ClientTechnology, FeatureDescriptor, FeatureType, InputDescriptor, ShellTechnology,
};
use shellgen_core::config::Config;
use shellgen_core::errors::BackendError;
use shellgen_core::request::{GenerationRequest, SelectedFeature};
use shellgen_core::wizard::WizardStep;
use shellgen_tui::wizard::app::{
    App, BackendCall, CallOutcome, CallResponse, InputResult, LoadState, ResultState,
};
use shellgen_tui::wizard::{dump_all_steps, execute_call, ui};
use std::sync::Mutex;

fn config() -> Config {
    Config::defaults().unwrap()
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

#[derive(Default)]
struct FakeBackend {
    fail_shells: bool,
    fail_generate: bool,
    submitted: Mutex<Vec<GenerationRequest>>,
}

fn status_error(path: &str) -> BackendError {
    BackendError::Status {
        url: format!("http://localhost:8080/{}", path),
        status: 500,
    }
}

fn feature(key: &str, name: &str, kind: FeatureType) -> FeatureDescriptor {
    FeatureDescriptor {
        key: key.to_string(),
        name: name.to_string(),
        kind,
        description: format!("{} description", name),
        input: None,
    }
}

impl Backend for FakeBackend {
    fn shell_technologies(&self) -> BackendResult<Vec<ShellTechnology>> {
        if self.fail_shells {
            return Err(status_error("web-shell"));
        }
        Ok(["php", "asp"]
            .iter()
            .map(|t| ShellTechnology {
                technology: t.to_string(),
                url: Some(format!("/web-shell/{}", t)),
            })
            .collect())
    }

    fn client_technologies(&self) -> BackendResult<Vec<ClientTechnology>> {
        Ok(vec![
            ClientTechnology {
                technology: "python".to_string(),
                dependencies: Some("/client/python/requirements.txt".to_string()),
            },
            ClientTechnology {
                technology: "ruby".to_string(),
                dependencies: None,
            },
        ])
    }

    fn features(&self, technology: &str) -> BackendResult<Vec<FeatureDescriptor>> {
        if technology == "asp" {
            return Ok(vec![
                feature("command-execution", "Command Execution", FeatureType::Feature),
                feature("gif", "GIF", FeatureType::OutputFormat),
            ]);
        }
        let mut ip = feature("ip-validation", "IP Validation", FeatureType::Security);
        ip.input = Some(InputDescriptor {
            key: "IP_WHITELIST".to_string(),
            kind: "text".to_string(),
            placeholder: "10.128.20.1, ::1".to_string(),
            label: "Allowed IPs".to_string(),
        });
        Ok(vec![
            feature("command-execution", "Command Execution", FeatureType::Feature),
            feature("nonce-validation", "Nonce Validation", FeatureType::Security),
            ip,
            feature("jpg", "JPG", FeatureType::OutputFormat),
            feature("gif", "GIF", FeatureType::OutputFormat),
            feature("obfuscate-code", "Obfuscate code", FeatureType::OutputOption),
        ])
    }

    fn generate(&self, request: &GenerationRequest) -> BackendResult<GenerationResult> {
        self.submitted.lock().unwrap().push(request.clone());
        if self.fail_generate {
            return Err(status_error("generator"));
        }
        Ok(GenerationResult {
            shell: Artifact {
                url: "http://x/s.jpg".to_string(),
                checksum: Checksum {
                    algorithm: "SHA256".to_string(),
                    value: "abc".to_string(),
                },
            },
            client: Artifact {
                url: "http://x/c.rb".to_string(),
                checksum: Checksum {
                    algorithm: "SHA256".to_string(),
                    value: "def".to_string(),
                },
            },
        })
    }
}

/// Feed a key to the app and complete any backend call it issues.
fn press(app: &mut App, backend: &FakeBackend, code: KeyCode) -> InputResult {
    let result = app.handle_input(key(code));
    if let InputResult::Call(ref pending) = result {
        let outcome = execute_call(backend, pending.call.clone());
        app.apply_response(CallResponse {
            ticket: pending.ticket,
            outcome,
        });
    }
    result
}

fn type_text(app: &mut App, backend: &FakeBackend, text: &str) {
    for ch in text.chars() {
        press(app, backend, KeyCode::Char(ch));
    }
}

/// Home → Shell(php) → Features(command-execution) → Output.
fn reach_output(app: &mut App, backend: &FakeBackend) {
    press(app, backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Shell);
    press(app, backend, KeyCode::Char(' '));
    press(app, backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Features);
    assert_eq!(app.route(), "/features/php");
    press(app, backend, KeyCode::Char(' '));
    press(app, backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Output);
}

/// Output(jpg) → Client(`client_row`) → Result.
fn finish(app: &mut App, backend: &FakeBackend, client_row: usize) -> InputResult {
    press(app, backend, KeyCode::Char(' '));
    press(app, backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Client);
    for _ in 0..client_row {
        press(app, backend, KeyCode::Down);
    }
    press(app, backend, KeyCode::Char(' '));
    press(app, backend, KeyCode::Enter)
}

#[test]
fn output_guard_blocks_without_a_format() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);

    assert_eq!(app.request().shell(), "php");
    assert_eq!(
        app.request().features(),
        [SelectedFeature::basic("command-execution")]
    );
    assert_eq!(app.request().output_option("obfuscate-code"), Some(false));

    let before = app.request().clone();
    let status = app.status_message.clone();
    let result = press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(result, InputResult::Continue);
    assert_eq!(app.current_step, WizardStep::Output);
    assert_eq!(app.request(), &before);
    assert_eq!(app.status_message, status);
}

#[test]
fn shell_guard_blocks_until_a_technology_is_chosen() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    press(&mut app, &backend, KeyCode::Enter);
    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Shell);

    // Selecting twice clears the choice again.
    press(&mut app, &backend, KeyCode::Char(' '));
    press(&mut app, &backend, KeyCode::Char(' '));
    assert_eq!(app.request().shell(), "");
    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Shell);

    press(&mut app, &backend, KeyCode::Down);
    press(&mut app, &backend, KeyCode::Char(' '));
    assert_eq!(app.request().shell(), "asp");
}

#[test]
fn argument_rows_are_driven_by_typed_text() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    press(&mut app, &backend, KeyCode::Enter);
    press(&mut app, &backend, KeyCode::Char(' '));
    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.screen.load, LoadState::Ready);

    // command-execution, nonce-validation, ip-validation
    press(&mut app, &backend, KeyCode::Down);
    press(&mut app, &backend, KeyCode::Down);
    assert_eq!(
        app.screen.focused().map(|(_, o)| o.key.as_str()),
        Some("ip-validation")
    );

    // Space and `q` are text here, not toggle and quit.
    type_text(&mut app, &backend, "q ::1");
    assert_eq!(app.current_step, WizardStep::Features);
    let features = app.request().features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].argument_value("IP_WHITELIST"), Some("q ::1"));

    for _ in 0.."q ::1".len() {
        press(&mut app, &backend, KeyCode::Backspace);
    }
    assert!(app.request().features().is_empty());
}

#[test]
fn successful_generation_shows_links_and_checksums() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);

    let result = finish(&mut app, &backend, 1);
    match result {
        InputResult::Call(ref pending) => {
            assert_eq!(pending.call, BackendCall::Generate(app.request().clone()));
        }
        _ => panic!("entering Result must submit"),
    }
    assert_eq!(backend.submitted.lock().unwrap().len(), 1);
    assert_eq!(app.request().output_format(), "jpg");
    assert_eq!(app.request().client(), "ruby");

    let dump = ui::dump_step(&app);
    assert!(dump.contains("http://x/s.jpg"));
    assert!(dump.contains("Checksum (SHA256): abc"));
    assert!(dump.contains("Checksum (SHA256): def"));
    assert_eq!(app.result_links().len(), 2);

    let opened = press(&mut app, &backend, KeyCode::Char('o'));
    assert_eq!(opened, InputResult::OpenLink("http://x/s.jpg".to_string()));
    press(&mut app, &backend, KeyCode::Down);
    let opened = app.handle_input(key(KeyCode::Char('o')));
    assert_eq!(opened, InputResult::OpenLink("http://x/c.rb".to_string()));
}

#[test]
fn dependency_link_is_resolved_against_the_api_base() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);
    finish(&mut app, &backend, 0);

    assert_eq!(app.request().client(), "python");
    let links = app.result_links();
    assert_eq!(links.len(), 3);
    assert_eq!(
        links[2].url,
        "http://localhost:8080/client/python/requirements.txt"
    );
}

#[test]
fn failed_generation_shows_only_the_notice() {
    let backend = FakeBackend {
        fail_generate: true,
        ..Default::default()
    };
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);
    finish(&mut app, &backend, 1);

    assert_eq!(app.result(), &ResultState::Failed);
    let dump = ui::dump_step(&app);
    assert!(dump.contains("An error has occurred"));
    assert!(!dump.contains("Checksum"));
    assert!(app.result_links().is_empty());
    assert_eq!(
        press(&mut app, &backend, KeyCode::Char('d')),
        InputResult::Continue
    );
}

#[test]
fn start_over_resets_the_request() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);
    finish(&mut app, &backend, 1);

    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Home);
    assert!(app.request().is_default());
    assert_eq!(app.request(), &GenerationRequest::default());
}

#[test]
fn download_is_requested_from_the_result_screen() {
    let backend = FakeBackend::default();
    let config = config();
    let mut app = App::new(&config);
    reach_output(&mut app, &backend);
    finish(&mut app, &backend, 1);

    match app.handle_input(key(KeyCode::Char('d'))) {
        InputResult::Call(pending) => match pending.call {
            BackendCall::Download { dir, .. } => assert_eq!(dir, config.download_dir),
            other => panic!("unexpected call {:?}", other),
        },
        other => panic!("unexpected result {:?}", other),
    }
    assert!(app.is_downloading());
    // A second press while the first is running does nothing.
    assert_eq!(
        app.handle_input(key(KeyCode::Char('d'))),
        InputResult::Continue
    );
}

#[test]
fn stale_responses_are_dropped() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());

    let first = match app.handle_input(key(KeyCode::Enter)) {
        InputResult::Call(pending) => pending,
        other => panic!("unexpected result {:?}", other),
    };
    app.handle_input(key(KeyCode::Esc));
    assert_eq!(app.current_step, WizardStep::Home);
    let second = match app.handle_input(key(KeyCode::Enter)) {
        InputResult::Call(pending) => pending,
        other => panic!("unexpected result {:?}", other),
    };
    assert_ne!(first.ticket, second.ticket);

    app.apply_response(CallResponse {
        ticket: first.ticket,
        outcome: CallOutcome::Shells(Ok(vec![ShellTechnology {
            technology: "stale".to_string(),
            url: None,
        }])),
    });
    assert_eq!(app.screen.load, LoadState::Loading);

    app.apply_response(CallResponse {
        ticket: second.ticket,
        outcome: execute_call(&backend, second.call),
    });
    assert_eq!(app.screen.rows().len(), 2);
    assert_eq!(app.catalog().shells[0].technology, "php");
}

#[test]
fn back_navigation_keeps_selections() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);

    press(&mut app, &backend, KeyCode::Esc);
    assert_eq!(app.current_step, WizardStep::Features);
    press(&mut app, &backend, KeyCode::Esc);
    assert_eq!(app.current_step, WizardStep::Shell);
    assert_eq!(app.request().shell(), "php");
    assert!(app.request().has_feature("command-execution"));
}

#[test]
fn changing_shell_after_going_back_drops_old_choices() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    reach_output(&mut app, &backend);
    press(&mut app, &backend, KeyCode::Char(' '));
    assert_eq!(app.request().output_format(), "jpg");

    press(&mut app, &backend, KeyCode::Esc);
    press(&mut app, &backend, KeyCode::Esc);
    assert_eq!(app.current_step, WizardStep::Shell);
    press(&mut app, &backend, KeyCode::Down);
    press(&mut app, &backend, KeyCode::Char(' '));
    assert_eq!(app.request().shell(), "asp");
    assert!(app.request().features().is_empty());
    assert_eq!(app.request().output_format(), "");

    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.route(), "/features/asp");
    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Output);
    assert_eq!(app.request().output_option("obfuscate-code"), None);

    // jpg was php's format; asp's Output still needs a choice.
    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Output);

    finish(&mut app, &backend, 1);
    let submitted = backend.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].shell(), "asp");
    assert!(submitted[0].features().is_empty());
    assert_eq!(submitted[0].output_format(), "gif");
}

#[test]
fn enter_waits_for_features_to_load() {
    let backend = FakeBackend::default();
    let mut app = App::new(&config());
    press(&mut app, &backend, KeyCode::Enter);
    press(&mut app, &backend, KeyCode::Char(' '));

    let pending = match app.handle_input(key(KeyCode::Enter)) {
        InputResult::Call(pending) => pending,
        other => panic!("unexpected result {:?}", other),
    };
    assert_eq!(app.current_step, WizardStep::Features);
    assert_eq!(app.screen.load, LoadState::Loading);

    assert_eq!(app.handle_input(key(KeyCode::Enter)), InputResult::Continue);
    assert_eq!(app.current_step, WizardStep::Features);

    app.apply_response(CallResponse {
        ticket: pending.ticket,
        outcome: execute_call(&backend, pending.call),
    });
    assert_eq!(app.screen.load, LoadState::Ready);

    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Output);
    assert!(!app.screen.rows().is_empty());
}

#[test]
fn failed_option_load_shows_hint() {
    let backend = FakeBackend {
        fail_shells: true,
        ..Default::default()
    };
    let mut app = App::new(&config());
    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.screen.load, LoadState::Failed);
    assert!(ui::dump_step(&app).contains("No options available."));

    press(&mut app, &backend, KeyCode::Enter);
    assert_eq!(app.current_step, WizardStep::Shell);
}

#[test]
fn quit_keys() {
    let mut app = App::new(&config());
    assert_eq!(app.handle_input(key(KeyCode::Char('q'))), InputResult::Quit);
    let ctrl_c = KeyEvent {
        modifiers: KeyModifiers::CONTROL,
        ..key(KeyCode::Char('c'))
    };
    assert_eq!(app.handle_input(ctrl_c), InputResult::Quit);
}

#[test]
fn dump_covers_every_step() {
    let dump = dump_all_steps(&config());
    assert!(dump.contains("Welcome to the Web Shell Generator!"));
    for step in WizardStep::all() {
        assert!(dump.contains(&format!("STEP: {}", step.title())));
    }
    assert!(dump.contains("Generating your web shell"));
}
