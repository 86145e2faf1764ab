//! Section router.
//!
//! The active section is a closed enumeration: navigation can only name
//! one of the nine sections, so rendering never meets an unknown one.

pub mod views;

pub use views::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    #[default]
    Home,
    Login,
    Profile,
    Symptoms,
    Chat,
    Diseases,
    Reports,
    Treatments,
    Settings,
}

impl Section {
    /// Navigation bar order.
    pub const ALL: [Section; 9] = [
        Section::Home,
        Section::Login,
        Section::Profile,
        Section::Symptoms,
        Section::Chat,
        Section::Diseases,
        Section::Reports,
        Section::Treatments,
        Section::Settings,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Login => "login",
            Self::Profile => "profile",
            Self::Symptoms => "symptoms",
            Self::Chat => "chat",
            Self::Diseases => "diseases",
            Self::Reports => "reports",
            Self::Treatments => "treatments",
            Self::Settings => "settings",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Home => "🏠 Home",
            Self::Login => "🔐 Login",
            Self::Profile => "🧾 Profile",
            Self::Symptoms => "🧠 Symptoms",
            Self::Chat => "🤖 Chat",
            Self::Diseases => "🫀 Diseases",
            Self::Reports => "📈 Reports",
            Self::Treatments => "💊 Treatments",
            Self::Settings => "⚙️ Settings",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One navigation button.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub section: Section,
    pub label: &'static str,
    pub active: bool,
}

/// The nine destinations, with `current` marked active.
pub fn navigation_bar(current: Section) -> Vec<NavItem> {
    Section::ALL
        .iter()
        .map(|&section| NavItem {
            section,
            label: section.label(),
            active: section == current,
        })
        .collect()
}
