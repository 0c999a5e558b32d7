//! Multi-step form navigation
//!
//! The wizard is a small state machine over named steps. Which steps are
//! active depends on whether the product has variants; the current position
//! always points into the active set. `next` on the last active step does not
//! move and reports [`Transition::Finish`] instead.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

/// When a step is part of the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepVisibility {
    #[default]
    Always,
    WithVariants,
    WithoutVariants,
}

impl StepVisibility {
    pub fn applies(self, has_variants: bool) -> bool {
        match self {
            Self::Always => true,
            Self::WithVariants => has_variants,
            Self::WithoutVariants => !has_variants,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardStep {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub visibility: StepVisibility,
}

impl WizardStep {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            visibility: StepVisibility::Always,
        }
    }

    pub fn visibility(mut self, visibility: StepVisibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// Outcome of [`Wizard::next`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved,
    /// Already on the last step; the caller submits the form
    Finish,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    steps: Vec<WizardStep>,
    /// Indices into `steps` of the active set
    active: Vec<usize>,
    /// Position within `active`
    position: usize,
    has_variants: bool,
}

impl Wizard {
    /// Build a wizard; step ids must be unique and both step sets non-empty.
    pub fn new(steps: Vec<WizardStep>, has_variants: bool) -> CatalogResult<Self> {
        validate_steps(&steps)?;

        let mut wizard = Self {
            steps,
            active: Vec::new(),
            position: 0,
            has_variants,
        };
        wizard.reinitialize(has_variants);
        Ok(wizard)
    }

    /// Steps of the product form
    pub fn product_form(has_variants: bool) -> Self {
        let steps = vec![
            WizardStep::new("basics", "Basic information"),
            WizardStep::new("pricing", "Price and stock")
                .visibility(StepVisibility::WithoutVariants),
            WizardStep::new("attributes", "Attributes").visibility(StepVisibility::WithVariants),
            WizardStep::new("variants", "Variants").visibility(StepVisibility::WithVariants),
            WizardStep::new("review", "Review"),
        ];
        Self {
            active: active_indices(&steps, has_variants),
            steps,
            position: 0,
            has_variants,
        }
    }

    /// Recompute the active set and go back to its first step
    pub fn reinitialize(&mut self, has_variants: bool) {
        self.has_variants = has_variants;
        self.active = active_indices(&self.steps, has_variants);
        self.position = 0;
        tracing::debug!(has_variants, steps = self.active.len(), "wizard reinitialized");
    }

    pub fn has_variants(&self) -> bool {
        self.has_variants
    }

    pub fn current(&self) -> &WizardStep {
        &self.steps[self.active[self.position]]
    }

    /// 0-based position within the active steps
    pub fn position(&self) -> usize {
        self.position
    }

    /// Active steps in order
    pub fn steps(&self) -> impl Iterator<Item = &WizardStep> {
        self.active.iter().map(|&ix| &self.steps[ix])
    }

    pub fn step_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position + 1 == self.active.len()
    }

    pub fn next(&mut self) -> Transition {
        if self.is_last() {
            return Transition::Finish;
        }
        self.position += 1;
        Transition::Moved
    }

    /// Step back; returns false on the first step
    pub fn previous(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        true
    }

    /// Jump to an active step. Unknown or inactive ids are ignored.
    pub fn go_to(&mut self, step_id: &str) -> bool {
        match self.active.iter().position(|&ix| self.steps[ix].id == step_id) {
            Some(position) => {
                self.position = position;
                true
            }
            None => {
                tracing::trace!(step_id, "go_to unknown or inactive step ignored");
                false
            }
        }
    }
}

fn validate_steps(steps: &[WizardStep]) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    if let Some(step) = steps.iter().find(|step| !seen.insert(step.id.as_str())) {
        return Err(CatalogError::InvalidWizard(format!(
            "duplicate step id '{}'",
            step.id
        )));
    }
    for flag in [true, false] {
        if !steps.iter().any(|step| step.visibility.applies(flag)) {
            return Err(CatalogError::InvalidWizard(format!(
                "no steps when has_variants is {flag}"
            )));
        }
    }
    Ok(())
}

fn active_indices(steps: &[WizardStep], has_variants: bool) -> Vec<usize> {
    steps
        .iter()
        .enumerate()
        .filter(|(_, step)| step.visibility.applies(has_variants))
        .map(|(ix, _)| ix)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ids(wizard: &Wizard) -> Vec<&str> {
        wizard.steps().map(|step| step.id.as_str()).collect()
    }

    #[test]
    fn test_product_form_step_sets() {
        let simple = Wizard::product_form(false);
        assert_eq!(ids(&simple), vec!["basics", "pricing", "review"]);

        let with_variants = Wizard::product_form(true);
        assert_eq!(ids(&with_variants), vec!["basics", "attributes", "variants", "review"]);
    }

    #[test]
    fn test_next_finishes_on_last_step() {
        let mut wizard = Wizard::product_form(false);
        assert!(wizard.is_first());
        assert_eq!(wizard.next(), Transition::Moved);
        assert_eq!(wizard.next(), Transition::Moved);
        assert!(wizard.is_last());
        assert_eq!(wizard.next(), Transition::Finish);
        assert_eq!(wizard.current().id, "review");
    }

    #[test]
    fn test_previous_stops_at_first() {
        let mut wizard = Wizard::product_form(true);
        assert!(!wizard.previous());
        wizard.next();
        assert!(wizard.previous());
        assert_eq!(wizard.current().id, "basics");
    }

    #[test]
    fn test_go_to_ignores_inactive_steps() {
        let mut wizard = Wizard::product_form(false);
        assert!(!wizard.go_to("variants"));
        assert!(!wizard.go_to("nope"));
        assert_eq!(wizard.current().id, "basics");

        assert!(wizard.go_to("review"));
        assert!(wizard.is_last());
    }

    #[test]
    fn test_reinitialize_resets_to_first_step() {
        let mut wizard = Wizard::product_form(false);
        wizard.go_to("review");

        wizard.reinitialize(true);

        assert_eq!(wizard.current().id, "basics");
        assert_eq!(wizard.step_count(), 4);
        assert!(wizard.has_variants());
    }

    #[test]
    fn test_new_validates_steps() {
        let duplicate = Wizard::new(
            vec![WizardStep::new("a", "A"), WizardStep::new("a", "Again")],
            false,
        );
        assert!(matches!(duplicate, Err(CatalogError::InvalidWizard(_))));

        let variants_only = Wizard::new(
            vec![WizardStep::new("v", "V").visibility(StepVisibility::WithVariants)],
            true,
        );
        assert!(matches!(variants_only, Err(CatalogError::InvalidWizard(_))));

        let ok = Wizard::new(vec![WizardStep::new("only", "Only")], true).unwrap();
        assert!(ok.is_first() && ok.is_last());
    }
}
