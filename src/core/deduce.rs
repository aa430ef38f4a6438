//! Column → widget deduction.
//!
//! Rules are checked in a fixed order and the first match wins. Several
//! predicates overlap (an `is_active` varchar, a short `description`), so the
//! order is part of the contract.

use crate::core::column::{ColumnMetadata, parse_enum_declaration};
use crate::core::error::IoError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    #[default]
    Text,
    Number,
    Date,
    Time,
    Datetime,
    Email,
}

impl InputKind {
    /// `type` attribute of the editable element.
    pub fn html_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime-local",
            Self::Email => "email",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    File,
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceMode {
    Single,
    Multiple,
}

/// Closed set of widget variants with their construction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "io", rename_all = "snake_case")]
pub enum IoSpec {
    ReadOnly,
    PrimaryKey,
    ForeignKey {
        #[serde(default)]
        referenced_entity: Option<String>,
    },
    Checkbox,
    Textarea,
    Input {
        #[serde(default)]
        kind: InputKind,
    },
    File {
        kind: FileKind,
    },
    Url,
    Select {
        choices: Vec<String>,
    },
    Radio {
        group: String,
        literal: String,
    },
    Choice {
        mode: ChoiceMode,
        choices: Vec<String>,
    },
}

impl IoSpec {
    pub fn input(kind: InputKind) -> Self {
        Self::Input { kind }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::PrimaryKey => "primary_key",
            Self::ForeignKey { .. } => "foreign_key",
            Self::Checkbox => "checkbox",
            Self::Textarea => "textarea",
            Self::Input { .. } => "input",
            Self::File { .. } => "file",
            Self::Url => "url",
            Self::Select { .. } => "select",
            Self::Radio { .. } => "radio",
            Self::Choice { .. } => "choice",
        }
    }

    /// Build a spec from a markup discriminant such as `data-io="select"`.
    /// `param` looks up the variant parameters (`choices`, `group`, `literal`,
    /// `references`).
    pub fn from_discriminant(
        discriminant: &str,
        param: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, IoError> {
        let list = |key: &str| -> Vec<String> {
            param(key)
                .map(|raw| {
                    raw.split(',')
                        .map(|entry| entry.trim().to_string())
                        .filter(|entry| !entry.is_empty())
                        .collect()
                })
                .unwrap_or_default()
        };

        let spec = match discriminant.trim().to_ascii_lowercase().as_str() {
            "readonly" | "read_only" => Self::ReadOnly,
            "primary" | "primary_key" => Self::PrimaryKey,
            "foreign" | "foreign_key" => Self::ForeignKey {
                referenced_entity: param("references"),
            },
            "checkbox" => Self::Checkbox,
            "textarea" => Self::Textarea,
            "input" | "text" => Self::input(InputKind::Text),
            "number" => Self::input(InputKind::Number),
            "date" => Self::input(InputKind::Date),
            "time" => Self::input(InputKind::Time),
            "datetime" => Self::input(InputKind::Datetime),
            "email" => Self::input(InputKind::Email),
            "file" => Self::File {
                kind: FileKind::File,
            },
            "image" => Self::File {
                kind: FileKind::Image,
            },
            "url" => Self::Url,
            "select" => match param("enum") {
                Some(declaration) => Self::Select {
                    choices: parse_enum_declaration(&declaration)?,
                },
                None => Self::Select {
                    choices: list("choices"),
                },
            },
            "radio" => Self::Radio {
                group: param("group").unwrap_or_default(),
                literal: param("literal").unwrap_or_default(),
            },
            "single_choice" | "choice" => Self::Choice {
                mode: ChoiceMode::Single,
                choices: list("choices"),
            },
            "multiple_choice" => Self::Choice {
                mode: ChoiceMode::Multiple,
                choices: list("choices"),
            },
            other => return Err(IoError::UnsupportedType(other.to_string())),
        };
        Ok(spec)
    }
}

const BOOLEAN_TYPES: &[&str] = &["tinyint", "bool", "boolean"];
const DATE_TYPES: &[&str] = &["date", "time", "datetime"];
const IMAGE_NAMES: &[&str] = &["logo", "picture", "profile", "image", "photo"];
const FILE_NAMES: &[&str] = &["filename", "file"];
const URL_NAMES: &[&str] = &["website", "url", "webpage"];
const TEXT_TYPES: &[&str] = &["varchar", "text"];
const NUMERIC_TYPES: &[&str] = &[
    "float",
    "double",
    "int",
    "decimal",
    "serial",
    "bit",
    "mediumint",
    "real",
];

const TEXTAREA_MIN_LENGTH: u32 = 100;

/// Pick the widget variant for a column. An explicit spec always wins.
pub fn deduce(column: Option<&ColumnMetadata>, explicit: Option<IoSpec>) -> Result<IoSpec, IoError> {
    if let Some(spec) = explicit {
        return Ok(spec);
    }
    let Some(column) = column else {
        return Err(IoError::MissingSource);
    };
    let spec = deduce_from_column(column)?;
    tracing::debug!(column = %column.name, data_type = %column.data_type, io = spec.name(), "deduced widget");
    Ok(spec)
}

fn deduce_from_column(column: &ColumnMetadata) -> Result<IoSpec, IoError> {
    let name = column.name.as_str();
    let data_type = column.data_type_key();
    let data_type = data_type.as_str();

    if column.read_only {
        return Ok(IoSpec::ReadOnly);
    }
    if column.is_primary_key {
        return Ok(IoSpec::PrimaryKey);
    }
    if column.is_foreign_key {
        return Ok(IoSpec::ForeignKey {
            referenced_entity: column.referenced_entity.clone(),
        });
    }
    if name.starts_with("is_") || BOOLEAN_TYPES.contains(&data_type) || column.length == 1 {
        return Ok(IoSpec::Checkbox);
    }
    if column.length >= TEXTAREA_MIN_LENGTH || name == "description" {
        return Ok(IoSpec::Textarea);
    }
    if data_type == "timestamp" {
        return Ok(IoSpec::ReadOnly);
    }
    if DATE_TYPES.contains(&data_type) {
        let kind = match data_type {
            "time" => InputKind::Time,
            "datetime" => InputKind::Datetime,
            _ => InputKind::Date,
        };
        return Ok(IoSpec::input(kind));
    }
    if IMAGE_NAMES.contains(&name) {
        return Ok(IoSpec::File {
            kind: FileKind::Image,
        });
    }
    if FILE_NAMES.contains(&name) {
        return Ok(IoSpec::File {
            kind: FileKind::File,
        });
    }
    if URL_NAMES.contains(&name) {
        return Ok(IoSpec::Url);
    }
    if data_type == "enum" {
        return Ok(IoSpec::Select {
            choices: column.enum_values()?,
        });
    }
    if TEXT_TYPES.contains(&data_type) {
        return Ok(IoSpec::input(InputKind::Text));
    }
    if NUMERIC_TYPES.contains(&data_type) {
        return Ok(IoSpec::input(InputKind::Number));
    }
    Ok(IoSpec::ReadOnly)
}
