//! The [`Cell`] type: a grid square's role and its search label.

/// A cell's fixed classification, set only by grid editing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    #[default]
    Empty,
    Start,
    End,
    Obstacle,
}

impl Role {
    /// Whether this role is Start or End.
    #[inline]
    pub const fn is_endpoint(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}

/// Search-progress label, purely for visualization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchState {
    #[default]
    Unvisited,
    Open,
    Closed,
    Path,
}

/// A single grid square.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub role: Role,
    pub state: SearchState,
}

impl Cell {
    /// Set the role (builder).
    #[inline]
    pub const fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    #[inline]
    pub const fn is_obstacle(self) -> bool {
        matches!(self.role, Role::Obstacle)
    }

    /// Drop the search label, keeping the role.
    #[inline]
    pub fn reset(&mut self) {
        self.state = SearchState::Unvisited;
    }
}
