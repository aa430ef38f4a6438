use crate::core::error::IoError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Schema description of one database column, as handed out by the schema
/// service. Never mutated once a widget is bound to it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: String,
    pub length: u32,
    pub nullable: bool,
    /// Full raw SQL type, e.g. `enum('a','b')` or `varchar(20)`.
    #[serde(rename = "type")]
    pub raw_type: String,
    pub enumerated_values: Option<Vec<String>>,
    pub comment: Option<String>,
    pub read_only: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub referenced_entity: Option<String>,
    pub entity: EntityRef,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityRef {
    pub name: String,
    pub dbase: DatabaseRef,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseRef {
    pub name: String,
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, length: u32) -> Self {
        let data_type = data_type.into();
        Self {
            name: name.into(),
            raw_type: data_type.clone(),
            data_type,
            length,
            ..Self::default()
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_raw_type(mut self, raw_type: impl Into<String>) -> Self {
        self.raw_type = raw_type.into();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self
    }

    pub fn foreign_key(mut self, referenced_entity: impl Into<String>) -> Self {
        self.is_foreign_key = true;
        self.referenced_entity = Some(referenced_entity.into());
        self
    }

    pub fn in_entity(mut self, entity: impl Into<String>, database: impl Into<String>) -> Self {
        self.entity = EntityRef {
            name: entity.into(),
            dbase: DatabaseRef {
                name: database.into(),
            },
        };
        self
    }

    /// Lowercased data type used by the deduction rules.
    pub fn data_type_key(&self) -> String {
        self.data_type.trim().to_ascii_lowercase()
    }

    /// Choices of an enum column: explicit values win over the raw declaration.
    pub fn enum_values(&self) -> Result<Vec<String>, IoError> {
        if let Some(values) = &self.enumerated_values {
            return Ok(values.clone());
        }
        parse_enum_declaration(&self.raw_type)
    }
}

fn enum_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)^\s*enum\s*\((.*)\)\s*$").expect("enum declaration pattern")
    })
}

/// Parse `enum('a','b')` into `["a", "b"]`.
pub fn parse_enum_declaration(declaration: &str) -> Result<Vec<String>, IoError> {
    let Some(captures) = enum_pattern().captures(declaration) else {
        return Err(IoError::MalformedEnum(declaration.to_string()));
    };
    let body = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

    let values: Vec<String> = body
        .split(',')
        .map(|entry| entry.trim().trim_matches(|ch| ch == '\'' || ch == '"').trim())
        .map(str::to_string)
        .collect();

    if values.iter().all(String::is_empty) {
        return Err(IoError::MalformedEnum(declaration.to_string()));
    }
    Ok(values)
}
