/// Label and enabled state of a trigger button
///
/// A control is disabled and relabelled for exactly the duration of one
/// outstanding request, then put back to its idle label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    idle_label: String,
    busy_label: String,
    busy: bool,
}

impl ControlState {
    pub fn new(idle_label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        Self {
            idle_label: idle_label.into(),
            busy_label: busy_label.into(),
            busy: false,
        }
    }

    pub fn label(&self) -> &str {
        if self.busy {
            &self.busy_label
        } else {
            &self.idle_label
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.busy
    }

    /// Disable the control; false if it was already disabled
    pub fn begin(&mut self) -> bool {
        if self.busy {
            return false;
        }
        self.busy = true;
        true
    }

    pub fn restore(&mut self) {
        self.busy = false;
    }
}
