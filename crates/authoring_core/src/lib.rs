pub mod assembly;
pub mod domain;
pub mod generation;
pub mod memory;
pub mod ports;
pub mod prompts;
pub mod refinement;
pub mod service;
pub mod text;

pub use assembly::{assemble, ExportArtifact};
pub use domain::{
    Comment, DocType, ExportFormat, Feedback, FeedbackAction, NewProject, OutlineItem, Project,
    RefinementEntry, Section, User, UserCredentials,
};
pub use generation::{TextGenerator, GENERATION_ERROR_TAG};
pub use memory::InMemoryStore;
pub use ports::{
    GenerationOptions, PortError, PortResult, ProjectStore, TextGenerationService, UserStore,
};
pub use refinement::{GenerationReport, RefinementEngine};
pub use service::ProjectService;
