use crate::location::Location;

/// Browser-style navigation stack. Following a link pushes, pagination
/// replaces the current entry so page clicks never pile up.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Location>,
}

impl History {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
        }
    }

    pub fn current(&self) -> &Location {
        // never empty: `back` refuses to pop the last entry
        &self.entries[self.entries.len() - 1]
    }

    pub fn push(&mut self, location: Location) {
        tracing::debug!("history push {}", location);
        self.entries.push(location);
    }

    pub fn replace(&mut self, location: Location) {
        tracing::debug!("history replace {}", location);
        if let Some(last) = self.entries.last_mut() {
            *last = location;
        }
    }

    /// Pop the current entry. Returns false when already at the root.
    pub fn back(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }
}
