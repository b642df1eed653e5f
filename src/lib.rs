//! Figspec - extract Figma designs and generate BDD scenarios

pub mod config;
pub mod error;
pub mod extract;
pub mod figma;
pub mod model;
pub mod prompt;
pub mod render;

pub use config::TransportConfig;
pub use error::{FigspecError, FixSuggestion};
pub use extract::{
    normalize_document, normalize_element, normalize_frame, DesignDocument, Element,
    ElementDetail, Frame, Page,
};
pub use figma::FigmaClient;
pub use model::{ClaudeModel, MockModel, ScenarioModel};
pub use prompt::{build_prompt, ScenarioKind};
pub use render::{save_design_data, write_scenarios, OutputFormat};
