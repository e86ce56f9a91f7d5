//! A single form input and its validation state.

/// A form value with the outcome of its last validation.
///
/// A fresh field is neither valid nor invalid: nothing has been checked yet.
/// [`validate_with`](Self::validate_with) settles it one way or the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<T> {
    initial: T,
    value: T,
    valid: bool,
    invalid: bool,
    errors: Vec<String>,
}

impl<T: Clone> Field<T> {
    /// Creates an unchecked field holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            initial: value.clone(),
            value,
            valid: false,
            invalid: false,
            errors: Vec::new(),
        }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    /// Replaces the value. The previous validation outcome is kept until the
    /// next [`validate_with`](Self::validate_with).
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    pub fn invalid(&self) -> bool {
        self.invalid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Runs `rule` against the current value and records the outcome.
    ///
    /// Returns true if the rule produced no messages.
    pub fn validate_with<F>(&mut self, rule: F) -> bool
    where
        F: FnOnce(&T) -> Vec<String>,
    {
        self.errors = rule(&self.value);
        self.valid = self.errors.is_empty();
        self.invalid = !self.valid;
        self.valid
    }

    /// Clears validation state.
    ///
    /// `Some(v)` loads a known-good value (for example a record fetched from
    /// the server) and marks the field valid. `None` restores the value the
    /// field was created with and leaves it unchecked.
    pub fn reset(&mut self, value: Option<T>) {
        self.valid = value.is_some();
        self.invalid = false;
        self.errors.clear();
        self.value = value.unwrap_or_else(|| self.initial.clone());
    }
}

impl<T: Clone + Default> Default for Field<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
