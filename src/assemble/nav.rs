//! Prev/next navigation context.

use crate::content::ProjectIndex;

/// Active project and the order projects are browsed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavContext {
    pub current_id: Option<String>,
    pub order: Vec<String>,
}

impl NavContext {
    pub fn new(order: Vec<String>) -> Self {
        Self {
            current_id: None,
            order,
        }
    }

    pub fn from_index(index: &ProjectIndex) -> Self {
        Self::new(index.ids())
    }

    pub fn set_current(&mut self, id: &str) {
        self.current_id = Some(id.to_string());
    }

    pub fn position(&self) -> Option<usize> {
        let current = self.current_id.as_deref()?;
        self.order.iter().position(|id| id == current)
    }

    /// Following project, wrapping to the first.
    pub fn next_id(&self) -> Option<&str> {
        let pos = self.position()?;
        let next = (pos + 1) % self.order.len();
        self.order.get(next).map(String::as_str)
    }

    /// Preceding project, wrapping to the last.
    pub fn prev_id(&self) -> Option<&str> {
        let pos = self.position()?;
        let prev = (pos + self.order.len() - 1) % self.order.len();
        self.order.get(prev).map(String::as_str)
    }

    /// Whether there is anything to navigate to.
    pub fn can_navigate(&self) -> bool {
        self.order.len() > 1 && self.position().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nav(current: Option<&str>) -> NavContext {
        NavContext {
            current_id: current.map(str::to_string),
            order: vec!["a".into(), "b".into(), "c".into()],
        }
    }

    #[test]
    fn test_next_prev_wrap() {
        assert_eq!(nav(Some("a")).next_id(), Some("b"));
        assert_eq!(nav(Some("c")).next_id(), Some("a"));
        assert_eq!(nav(Some("a")).prev_id(), Some("c"));
        assert_eq!(nav(Some("b")).prev_id(), Some("a"));
    }

    #[test]
    fn test_no_current() {
        assert_eq!(nav(None).next_id(), None);
        assert_eq!(nav(Some("zzz")).prev_id(), None);
        assert!(!nav(None).can_navigate());
    }

    #[test]
    fn test_single_project() {
        let single = NavContext {
            current_id: Some("a".into()),
            order: vec!["a".into()],
        };
        assert_eq!(single.next_id(), Some("a"));
        assert!(!single.can_navigate());
    }
}
