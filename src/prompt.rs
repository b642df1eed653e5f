//! Prompt templates for scenario generation
//!
//! Builds the natural-language instruction sent to the model, embedding
//! the normalized design document pretty-printed. The functional kind
//! uses the comprehensive BDD template; the remaining kinds use
//! specialized templates.

use clap::ValueEnum;
use serde_json::Value;

/// Scenario category selectable from the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenarioKind {
    /// Business logic and workflow coverage
    Functional,
    /// Element visibility and layout coverage
    Ui,
    /// WCAG and assistive-technology coverage
    Accessibility,
    /// Load-time and responsiveness coverage
    Performance,
}

impl ScenarioKind {
    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Functional => "functional",
            ScenarioKind::Ui => "ui",
            ScenarioKind::Accessibility => "accessibility",
            ScenarioKind::Performance => "performance",
        }
    }
}

impl std::fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the prompt for the given scenario kind
pub fn build_prompt(kind: ScenarioKind, design: &Value) -> String {
    let design_json =
        serde_json::to_string_pretty(design).unwrap_or_else(|_| design.to_string());
    match kind {
        ScenarioKind::Functional => bdd_prompt(&design_json),
        ScenarioKind::Ui => ui_prompt(&design_json),
        ScenarioKind::Accessibility => accessibility_prompt(&design_json),
        ScenarioKind::Performance => performance_prompt(&design_json),
    }
}

fn bdd_prompt(design_json: &str) -> String {
    format!(
        r#"You are a Business Analyst and Test Automation expert. Based on the following
Figma design data, generate comprehensive BDD (Behavior Driven Development)
scenarios in Gherkin format.

Design Data:
{design_json}

Analyze the design and create BDD scenarios that cover:

1. User Interface Elements:
   - All interactive elements (buttons, forms, links)
   - Text content and labels
   - Navigation elements
   - Visual components

2. User Journeys:
   - Primary and secondary user flows
   - Error scenarios and edge cases

3. Functional Requirements:
   - Form validations and data entry
   - Search, filter and sorting features

Generate the scenarios in proper Gherkin format with feature descriptions,
background steps where applicable, scenario outlines with examples,
Given-When-Then steps, and tags for categorization.

The scenarios must be testable, clear, comprehensive without redundancy,
and aligned with user experience goals. Format the output as a complete
BDD document with proper Gherkin syntax."#
    )
}

fn ui_prompt(design_json: &str) -> String {
    format!(
        r#"Generate UI-focused BDD test scenarios for the following design:

{design_json}

Focus on:
- Element visibility and positioning
- Responsive design behavior
- Visual consistency
- Interaction feedback
- Layout validation

Use Gherkin syntax with visual verification steps."#
    )
}

fn accessibility_prompt(design_json: &str) -> String {
    format!(
        r#"Generate accessibility-focused BDD test scenarios for the following design:

{design_json}

Focus on:
- WCAG 2.1 compliance
- Keyboard navigation
- Screen reader compatibility
- Color contrast
- Focus management
- Alt text for images

Use Gherkin syntax with accessibility-specific verification steps."#
    )
}

fn performance_prompt(design_json: &str) -> String {
    format!(
        r#"Generate performance-focused BDD test scenarios for the following design:

{design_json}

Focus on:
- Page load times
- Image optimization
- API response times
- Resource loading
- Mobile performance

Use Gherkin syntax with performance metrics validation."#
    )
}
