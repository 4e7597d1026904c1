//! Navigation between console views.

/// Every screen the console can mount. The detail views sit outside the tab
/// cycle and belong to their parent list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Agents,
    Jobs,
    Tokens,
    Admins,
    AuditLogs,
    TargetMappings,
    AgentDetail,
    JobDetail,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::Agents => "Agents",
            View::Jobs => "Jobs",
            View::Tokens => "Tokens",
            View::Admins => "Admins",
            View::AuditLogs => "Audit Logs",
            View::TargetMappings => "Target Mappings",
            View::AgentDetail => "Agent",
            View::JobDetail => "Job",
        }
    }

    /// Tab order.
    pub fn all() -> &'static [View] {
        &[
            View::Dashboard,
            View::Agents,
            View::Jobs,
            View::Tokens,
            View::Admins,
            View::AuditLogs,
            View::TargetMappings,
        ]
    }

    /// The tab a view lives under.
    pub fn parent(&self) -> View {
        match self {
            View::AgentDetail => View::Agents,
            View::JobDetail => View::Jobs,
            other => *other,
        }
    }

    pub fn is_detail(&self) -> bool {
        self.parent() != *self
    }

    pub fn index(&self) -> usize {
        let tab = self.parent();
        Self::all().iter().position(|v| *v == tab).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<View> {
        Self::all().get(index).copied()
    }

    pub fn next(&self) -> View {
        let all = Self::all();
        all[(self.index() + 1) % all.len()]
    }

    pub fn previous(&self) -> View {
        let all = Self::all();
        let idx = self.index();
        let prev = if idx == 0 { all.len() - 1 } else { idx - 1 };
        all[prev]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_views_cycle_from_parent() {
        assert_eq!(View::JobDetail.next(), View::Tokens);
        assert_eq!(View::AgentDetail.previous(), View::Dashboard);
        assert_eq!(View::JobDetail.index(), View::Jobs.index());
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(View::TargetMappings.next(), View::Dashboard);
        assert_eq!(View::Dashboard.previous(), View::TargetMappings);
    }

    #[test]
    fn test_detail_flags() {
        assert!(View::AgentDetail.is_detail());
        assert!(!View::Agents.is_detail());
        assert_eq!(View::from_index(7), None);
    }
}
