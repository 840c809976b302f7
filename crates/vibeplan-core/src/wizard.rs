use crate::error::Result;
use crate::prompt::ProjectBrief;
use crate::types::{DocumentType, UserLevel};
use crate::{io, paths};
use llm_client::Vendor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 5;

/// In-progress state of the five-step planning wizard:
///
/// 1. app type
/// 2. name and descriptions
/// 3. core features
/// 4. vendor, key and document selection
/// 5. generation
///
/// The API key is held in memory only and never written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardDraft {
    pub step: u8,
    pub app_type: String,
    pub app_name: String,
    pub short_description: String,
    pub detailed_description: String,
    pub core_features: Vec<String>,
    pub target_users: String,
    pub reference_apps: String,
    pub user_level: UserLevel,
    pub provider: Vendor,
    #[serde(skip)]
    pub api_key: String,
    pub document_types: Vec<DocumentType>,
    pub generated: BTreeMap<DocumentType, String>,
    /// Set once the generated documents were saved as a project.
    pub project_uid: Option<String>,
}

impl Default for WizardDraft {
    fn default() -> Self {
        Self {
            step: FIRST_STEP,
            app_type: String::new(),
            app_name: String::new(),
            short_description: String::new(),
            detailed_description: String::new(),
            core_features: Vec::new(),
            target_users: String::new(),
            reference_apps: String::new(),
            user_level: UserLevel::default(),
            provider: Vendor::default(),
            api_key: String::new(),
            document_types: Vec::new(),
            generated: BTreeMap::new(),
            project_uid: None,
        }
    }
}

fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

impl WizardDraft {
    pub fn load(data_dir: &Path) -> Result<Self> {
        match io::read_optional(&paths::wizard_path(data_dir))? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::wizard_path(data_dir), data.as_bytes())
    }

    /// Discard the stored draft. Returns false if there was none.
    pub fn reset(data_dir: &Path) -> Result<bool> {
        io::remove_if_exists(&paths::wizard_path(data_dir))
    }

    /// Whether the inputs gathered at `step` allow moving past it.
    pub fn can_proceed(&self, step: u8) -> bool {
        match step {
            1 => filled(&self.app_type),
            2 => {
                filled(&self.app_name)
                    && filled(&self.short_description)
                    && filled(&self.detailed_description)
            }
            3 => self.core_features.iter().any(|f| filled(f)),
            4 => filled(&self.api_key) && !self.document_types.is_empty(),
            5 => {
                !self.document_types.is_empty()
                    && self
                        .document_types
                        .iter()
                        .all(|t| self.generated.get(t).is_some_and(|c| filled(c)))
            }
            _ => false,
        }
    }

    /// Advance one step if the current one is complete.
    pub fn advance(&mut self) -> bool {
        if self.step < LAST_STEP && self.can_proceed(self.step) {
            self.step += 1;
            true
        } else {
            false
        }
    }

    pub fn back(&mut self) {
        self.step = self.step.saturating_sub(1).max(FIRST_STEP);
    }

    pub fn brief(&self) -> ProjectBrief {
        ProjectBrief {
            app_type: self.app_type.clone(),
            app_name: self.app_name.clone(),
            short_description: self.short_description.clone(),
            detailed_description: self.detailed_description.clone(),
            core_features: self
                .core_features
                .iter()
                .filter(|f| filled(f))
                .cloned()
                .collect(),
            target_users: self.target_users.clone(),
            reference_apps: self.reference_apps.clone(),
            user_level: self.user_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete_through_three() -> WizardDraft {
        WizardDraft {
            app_type: "mobile".into(),
            app_name: "Shelf".into(),
            short_description: "track books".into(),
            detailed_description: "A reading log.".into(),
            core_features: vec!["log".into()],
            ..Default::default()
        }
    }

    #[test]
    fn steps_gate_on_their_inputs() {
        let mut d = WizardDraft::default();
        assert!(!d.can_proceed(1));
        d.app_type = "web".into();
        assert!(d.can_proceed(1));

        d.app_name = "x".into();
        d.short_description = "y".into();
        assert!(!d.can_proceed(2));
        d.detailed_description = "z".into();
        assert!(d.can_proceed(2));

        d.core_features = vec!["  ".into()];
        assert!(!d.can_proceed(3));
    }

    #[test]
    fn step_four_needs_key_and_selection() {
        let mut d = complete_through_three();
        d.document_types = vec![DocumentType::Prd];
        assert!(!d.can_proceed(4));
        d.api_key = "sk".into();
        assert!(d.can_proceed(4));
    }

    #[test]
    fn step_five_needs_every_requested_document() {
        let mut d = complete_through_three();
        d.document_types = vec![DocumentType::Prd, DocumentType::Todo];
        d.generated.insert(DocumentType::Prd, "# PRD".into());
        assert!(!d.can_proceed(5));
        d.generated.insert(DocumentType::Todo, "- [ ] a".into());
        assert!(d.can_proceed(5));
    }

    #[test]
    fn advance_stops_at_incomplete_step() {
        let mut d = complete_through_three();
        assert!(d.advance());
        assert!(d.advance());
        assert!(d.advance());
        assert_eq!(d.step, 4);
        assert!(!d.advance());
        d.back();
        assert_eq!(d.step, 3);
    }

    #[test]
    fn api_key_is_never_persisted() {
        let dir = TempDir::new().unwrap();
        let mut d = complete_through_three();
        d.api_key = "sk-very-secret".into();
        d.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(paths::wizard_path(dir.path())).unwrap();
        assert!(!raw.contains("sk-very-secret"));

        let loaded = WizardDraft::load(dir.path()).unwrap();
        assert!(loaded.api_key.is_empty());
        assert_eq!(loaded.app_name, "Shelf");
    }

    #[test]
    fn reset_removes_draft() {
        let dir = TempDir::new().unwrap();
        WizardDraft::default().save(dir.path()).unwrap();
        assert!(WizardDraft::reset(dir.path()).unwrap());
        assert_eq!(WizardDraft::load(dir.path()).unwrap(), WizardDraft::default());
    }
}
