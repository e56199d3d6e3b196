//! Comparison configuration.

/// CompareOptions configures one comparison run.
///
/// Construct with [`CompareOptions::new`] and chain the setters; the
/// value is never mutated once a comparison starts.
#[derive(Debug, Clone)]
pub struct CompareOptions {
    /// Treat list reorderings as no change.
    pub ignore_order_changes: bool,
    /// Compare strings after trimming leading/trailing whitespace.
    pub ignore_whitespace_changes: bool,
    /// Suppress modifications; additions and removals still report.
    pub ignore_value_changes: bool,
    /// Match Kubernetes-shaped documents by resource identity.
    pub detect_kubernetes: bool,
    /// Reserved; rename detection is not implemented yet.
    pub detect_renames: bool,
    /// Extra identifier fields tried before the built-in `name`/`id`.
    pub additional_identifiers: Vec<String>,
    /// Exchange the two inputs after parsing.
    pub swap: bool,
    /// Re-root every left-hand document at this dotted path.
    pub chroot_from: Option<String>,
    /// Re-root every right-hand document at this dotted path.
    pub chroot_to: Option<String>,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            ignore_order_changes: false,
            ignore_whitespace_changes: false,
            ignore_value_changes: false,
            detect_kubernetes: true,
            detect_renames: false,
            additional_identifiers: Vec::new(),
            swap: false,
            chroot_from: None,
            chroot_to: None,
        }
    }
}

impl CompareOptions {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_order_changes(mut self, ignore: bool) -> Self {
        self.ignore_order_changes = ignore;
        self
    }

    pub fn ignore_whitespace_changes(mut self, ignore: bool) -> Self {
        self.ignore_whitespace_changes = ignore;
        self
    }

    pub fn ignore_value_changes(mut self, ignore: bool) -> Self {
        self.ignore_value_changes = ignore;
        self
    }

    pub fn detect_kubernetes(mut self, detect: bool) -> Self {
        self.detect_kubernetes = detect;
        self
    }

    pub fn detect_renames(mut self, detect: bool) -> Self {
        self.detect_renames = detect;
        self
    }

    /// Appends one identifier field tried ahead of `name` and `id`.
    pub fn additional_identifier(mut self, field: impl Into<String>) -> Self {
        self.additional_identifiers.push(field.into());
        self
    }

    pub fn swap(mut self, swap: bool) -> Self {
        self.swap = swap;
        self
    }

    pub fn chroot_from(mut self, path: impl Into<String>) -> Self {
        self.chroot_from = Some(path.into());
        self
    }

    pub fn chroot_to(mut self, path: impl Into<String>) -> Self {
        self.chroot_to = Some(path.into());
        self
    }

    /// Re-roots both sides at the same dotted path.
    pub fn chroot(self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.chroot_from(path.clone()).chroot_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = CompareOptions::new();
        assert!(!opts.ignore_order_changes);
        assert!(!opts.ignore_whitespace_changes);
        assert!(!opts.ignore_value_changes);
        assert!(opts.detect_kubernetes);
        assert!(!opts.swap);
        assert!(opts.additional_identifiers.is_empty());
        assert_eq!(opts.chroot_from, None);
    }

    #[test]
    fn test_builder_chaining() {
        let opts = CompareOptions::new()
            .ignore_order_changes(true)
            .additional_identifier("uuid")
            .additional_identifier("ref")
            .chroot("spec");

        assert!(opts.ignore_order_changes);
        assert_eq!(opts.additional_identifiers, vec!["uuid", "ref"]);
        assert_eq!(opts.chroot_from.as_deref(), Some("spec"));
        assert_eq!(opts.chroot_to.as_deref(), Some("spec"));
    }
}
