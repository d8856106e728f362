use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
pub struct Logging {
    /// Logging level. Possible values are: `Off`, `Error`, `Warn`, `Info`,
    /// `Debug` and `Trace`. Default is `Info`.
    #[serde(default = "Logging::default_threshold")]
    pub threshold: Threshold,

    /// Output format. Possible values are: `Full`, `Pretty`, `Compact` and
    /// `Json`. Default is `Full`.
    #[serde(default = "Logging::default_style")]
    pub style: TraceStyle,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            threshold: Self::default_threshold(),
            style: Self::default_style(),
        }
    }
}

impl Logging {
    fn default_threshold() -> Threshold {
        Threshold::Info
    }

    fn default_style() -> TraceStyle {
        TraceStyle::Full
    }
}

#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Threshold {
    /// A threshold lower than all security levels.
    Off,
    /// Corresponds to the `Error` security level.
    Error,
    /// Corresponds to the `Warn` security level.
    Warn,
    /// Corresponds to the `Info` security level.
    Info,
    /// Corresponds to the `Debug` security level.
    Debug,
    /// Corresponds to the `Trace` security level.
    Trace,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TraceStyle {
    Full,
    /// Multi-line output with the source file paths.
    Pretty,
    Compact,
    /// Newline-delimited JSON records.
    Json,
}

impl std::fmt::Display for TraceStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let style = match self {
            TraceStyle::Full => "Full Style",
            TraceStyle::Pretty => "Pretty Style with File Paths",
            TraceStyle::Compact => "Compact Style",
            TraceStyle::Json => "Json Format",
        };

        f.write_str(style)
    }
}
