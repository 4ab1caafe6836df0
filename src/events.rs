//! History event codes and how they are presented.

use std::fmt;

/// Server-defined code classifying a history entry. Unknown codes are kept
/// verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    TrolleyAttached,
    ProcessInput,
    ProcessOutput,
    TrolleyTransferred,
    Other(String),
}

/// Visual weight of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    Success,
    Warning,
    Info,
    Error,
}

impl EventType {
    pub fn parse(code: &str) -> Self {
        match code {
            "trolley_attached" => EventType::TrolleyAttached,
            "process_input" => EventType::ProcessInput,
            "process_output" => EventType::ProcessOutput,
            "trolley_transferred" => EventType::TrolleyTransferred,
            other => EventType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EventType::TrolleyAttached => "Trolley Attached",
            EventType::ProcessInput => "Process Started",
            EventType::ProcessOutput => "Process Completed",
            EventType::TrolleyTransferred => "Trolley Transferred",
            EventType::Other(raw) => raw,
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            EventType::TrolleyAttached | EventType::ProcessOutput => Badge::Success,
            EventType::ProcessInput => Badge::Warning,
            EventType::TrolleyTransferred | EventType::Other(_) => Badge::Info,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an optional code; `None` renders as an empty string.
pub fn event_label(code: Option<&str>) -> String {
    code.map(|c| EventType::parse(c).label().to_string())
        .unwrap_or_default()
}
