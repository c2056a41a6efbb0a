//! Progress events emitted between components

use packwright_core::ComponentId;
use serde::Serialize;

/// One component finished
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,

    /// Component that just finished
    pub component: ComponentId,
}

impl Progress {
    /// Completion as a whole percentage
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.completed * 100) / self.total) as u8
    }

    /// Every component is done; only the closing files remain
    pub fn is_last(&self) -> bool {
        self.completed == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(completed: usize, total: usize) -> Progress {
        Progress {
            completed,
            total,
            component: ComponentId::new("docs").unwrap(),
        }
    }

    #[test]
    fn test_percent() {
        assert_eq!(progress(1, 2).percent(), 50);
        assert_eq!(progress(1, 3).percent(), 33);
        assert_eq!(progress(3, 3).percent(), 100);
        assert_eq!(progress(0, 0).percent(), 100);
    }

    #[test]
    fn test_is_last() {
        assert!(!progress(1, 2).is_last());
        assert!(progress(2, 2).is_last());
    }
}
