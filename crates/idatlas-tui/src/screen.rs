//! Screen identifier enum.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    #[default]
    Map, // 1
    Schemes, // 2
    Filters, // 3
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 3] = [Self::Map, Self::Schemes, Self::Filters];

    /// Numeric key (1-3) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Map => 1,
            Self::Schemes => 2,
            Self::Filters => 3,
        }
    }

    /// Screen from a numeric key (1-3). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Map),
            2 => Some(Self::Schemes),
            3 => Some(Self::Filters),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Map => "Map",
            Self::Schemes => "Schemes",
            Self::Filters => "Filters",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tab_order_wraps_both_ways() {
        assert_eq!(ScreenId::Filters.next(), ScreenId::Map);
        assert_eq!(ScreenId::Map.prev(), ScreenId::Filters);
    }

    #[test]
    fn number_round_trips() {
        for screen in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(screen.number()), Some(screen));
        }
        assert_eq!(ScreenId::from_number(4), None);
    }
}
