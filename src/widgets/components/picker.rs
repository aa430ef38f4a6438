use std::future::Future;

/// Record chooser shown while editing a foreign key.
///
/// `show` completes once the user has picked a record or dismissed the
/// chooser; `selection` then reports the picked `(primary key, friendly)`.
pub trait RecordPicker {
    fn show(&mut self) -> impl Future<Output = ()>;

    fn selection(&self) -> Option<(i64, String)>;

    fn close(&mut self) {}
}

/// Picker that resolves immediately with a preset choice.
#[derive(Debug, Clone, Default)]
pub struct PresetPicker {
    choice: Option<(i64, String)>,
    shown: bool,
    closed: bool,
}

impl PresetPicker {
    pub fn new(choice: Option<(i64, String)>) -> Self {
        Self {
            choice,
            shown: false,
            closed: false,
        }
    }

    pub fn was_shown(&self) -> bool {
        self.shown
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl RecordPicker for PresetPicker {
    async fn show(&mut self) {
        self.shown = true;
        self.closed = false;
    }

    fn selection(&self) -> Option<(i64, String)> {
        if self.shown {
            self.choice.clone()
        } else {
            None
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
