use std::fmt;

/// Category of source file sharing one transform chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetClass {
    Style,
    Script,
    Template,
    Image,
}

impl AssetClass {
    /// All classes in the order the `default` task builds them.
    pub const ALL: [AssetClass; 4] = [
        AssetClass::Style,
        AssetClass::Script,
        AssetClass::Template,
        AssetClass::Image,
    ];

    /// Name of the built-in build task bound to this class.
    pub fn task_name(self) -> &'static str {
        match self {
            AssetClass::Style => "styles",
            AssetClass::Script => "scripts",
            AssetClass::Template => "templates",
            AssetClass::Image => "images",
        }
    }

    /// Reverse of [`AssetClass::task_name`].
    pub fn from_task_name(name: &str) -> Option<Self> {
        AssetClass::ALL.into_iter().find(|c| c.task_name() == name)
    }

    /// Whether `_`-prefixed sources are include-only fragments.
    ///
    /// Images are copied as they are, underscores and all.
    pub fn has_partials(self) -> bool {
        !matches!(self, AssetClass::Image)
    }

    /// What kind of browser refresh a successful write of this class causes.
    pub fn reload_kind(self) -> ReloadKind {
        match self {
            AssetClass::Style => ReloadKind::StylesheetInject,
            AssetClass::Script | AssetClass::Template => ReloadKind::FullPage,
            AssetClass::Image => ReloadKind::None,
        }
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_name())
    }
}

/// Browser refresh triggered after a class writes its outputs.
///
/// - `FullPage`: reload the whole page. Repeated signals within one burst of
///   work are coalesced into one.
/// - `StylesheetInject`: swap the changed stylesheet in place.
/// - `None`: write silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadKind {
    None,
    FullPage,
    StylesheetInject,
}

impl Default for ReloadKind {
    fn default() -> Self {
        ReloadKind::None
    }
}
