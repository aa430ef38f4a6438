pub mod core;
pub mod ui;
pub mod widgets;

pub use crate::core::column::ColumnMetadata;
pub use crate::core::deduce::{IoSpec, deduce};
pub use crate::core::error::IoError;
pub use crate::core::options::{IoOptions, Mode, OptionsChain, ResolvedOptions};
pub use crate::core::registry::WidgetRegistry;
pub use crate::core::value::BasicValue;
pub use crate::core::NodeId;
pub use crate::ui::dom::Document;
pub use crate::widgets::factory::{FormSchema, attach_fragment, build_form};
pub use crate::widgets::io::Io;
pub use crate::widgets::traits::{CheckResult, DomEvent, IoAction};
