//! Error types for widget construction and value decoding.
//!
//! Validation failures are not represented here: they are recoverable and are
//! reported through [`CheckResult`](crate::widgets::traits::CheckResult).

use crate::core::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error("cannot build a widget without a column or an explicit type")]
    MissingSource,

    #[error("missing {anchor} anchor for widget at {node}")]
    MissingAnchor { anchor: &'static str, node: NodeId },

    #[error("unsupported io type: {0:?}")]
    UnsupportedType(String),

    #[error("malformed enum declaration: {0:?}")]
    MalformedEnum(String),

    #[error("no original value to restore for widget at {0}")]
    NothingToRestore(NodeId),

    #[error("malformed {field} value {raw:?}: {source}")]
    Decode {
        field: &'static str,
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{variant} widget cannot hold {value}")]
    InvalidValue { variant: &'static str, value: String },

    #[error("{0:?} matches no available choice")]
    UnknownChoice(String),

    #[error("{0} choices are checked in a single-choice set")]
    AmbiguousChoice(usize),

    #[error("{operation} is not supported by {variant} widgets")]
    Unsupported {
        operation: &'static str,
        variant: &'static str,
    },

    #[error("no widget registered for {0}")]
    UnknownWidget(NodeId),

    #[error("element {0} is not part of the document")]
    DetachedNode(NodeId),

    #[error("label layout requires a bound column")]
    UnboundColumn,

    #[error("a widget is already registered on {0}")]
    DuplicateWidget(NodeId),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl IoError {
    pub fn decode(field: &'static str, raw: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            field,
            raw: raw.into(),
            source,
        }
    }

    pub fn invalid_value(variant: &'static str, value: impl ToString) -> Self {
        Self::InvalidValue {
            variant,
            value: value.to_string(),
        }
    }

    /// Programmer mistakes that should abort construction.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingSource
                | Self::MissingAnchor { .. }
                | Self::UnsupportedType(_)
                | Self::MalformedEnum(_)
                | Self::DuplicateWidget(_)
                | Self::Config(_)
        )
    }
}
