//! Element display/edit state.

use serde::{Deserialize, Serialize};

/// The four mutually exclusive states an element can be in.
///
/// | state      | visible | editable | in panel value |
/// |------------|---------|----------|----------------|
/// | `Normal`   | yes     | yes      | yes            |
/// | `Disabled` | yes     | no       | yes            |
/// | `Hidden`   | no      | no       | yes            |
/// | `Inactive` | no      | no       | no             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementState {
    #[default]
    Normal,
    Disabled,
    Hidden,
    Inactive,
}

impl ElementState {
    /// Whether the element is shown.
    pub fn is_visible(self) -> bool {
        matches!(self, Self::Normal | Self::Disabled)
    }

    /// Whether the user can edit the element.
    pub fn is_editable(self) -> bool {
        matches!(self, Self::Normal)
    }

    /// Whether the element's value is included in its container's value.
    pub fn contributes_value(self) -> bool {
        !matches!(self, Self::Inactive)
    }

    /// Lowercase name, as used in layout descriptions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Disabled => "disabled",
            Self::Hidden => "hidden",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for ElementState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
