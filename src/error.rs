use thiserror::Error;

/// Everything that can go wrong while wiring or driving a drawer.
///
/// Markup problems are reported with the offending id so the page author can
/// find the broken element; none of them leave the document half-mutated.
#[derive(Debug, Error)]
pub enum DrawerError {
    #[error("invalid drawer settings: {0}")]
    InvalidSettings(String),

    #[error("could not parse drawer settings: {0}")]
    SettingsFormat(#[from] serde_json::Error),

    #[error("unsupported selector: {0:?}")]
    UnsupportedSelector(String),

    #[error("trigger has no aria-controls attribute")]
    TriggerWithoutControls,

    #[error("no element with id {0:?} for trigger to open")]
    PanelNotFound(String),

    #[error("close element is not inside a drawer panel")]
    NotInPanel,

    #[error("drawer panel has no id")]
    PanelWithoutId,

    #[error("no trigger references drawer panel {0:?}")]
    TriggerNotFound(String),

    #[error("browser environment unavailable: {0}")]
    Browser(String),
}
