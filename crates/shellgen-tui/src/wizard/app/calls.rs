use shellgen_core::backend::{BackendResult, GenerationResult};
use shellgen_core::catalog::{ClientTechnology, FeatureDescriptor, ShellTechnology};
use shellgen_core::download::DownloadedArtifact;
use shellgen_core::request::GenerationRequest;
use std::path::PathBuf;

/// Work the event loop runs off the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    ShellTechnologies,
    ClientTechnologies,
    Features { technology: String },
    /// Snapshot of the request at the moment the result screen was entered.
    Generate(GenerationRequest),
    Download {
        result: GenerationResult,
        dir: PathBuf,
        timeout_secs: u64,
    },
}

/// A call tagged with the mount it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    pub ticket: u64,
    pub call: BackendCall,
}

#[derive(Debug)]
pub enum CallOutcome {
    Shells(BackendResult<Vec<ShellTechnology>>),
    Clients(BackendResult<Vec<ClientTechnology>>),
    Features(BackendResult<Vec<FeatureDescriptor>>),
    Generated(BackendResult<GenerationResult>),
    Downloaded(Result<Vec<DownloadedArtifact>, String>),
}

#[derive(Debug)]
pub struct CallResponse {
    pub ticket: u64,
    pub outcome: CallOutcome,
}

/// Result of handling input
#[derive(Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Quit,
    Call(PendingCall),
    OpenLink(String),
}
