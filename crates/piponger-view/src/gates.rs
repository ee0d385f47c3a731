use piponger_model::{CurrentIteration, IterationStatus, Snapshot};

pub const START_DISABLED_HINT: &str = "A new iteration can start once the current one is FINISHED";
pub const ARTIFACT_DISABLED_HINT: &str = "The result graph is not generated yet";

/// User-triggered commands of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    StartIteration,
    OpenPlot,
    OpenGraph,
}

/// Availability of one action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub enabled: bool,
    pub hint: Option<&'static str>,
}

impl Gate {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            hint: None,
        }
    }

    pub fn disabled(hint: &'static str) -> Self {
        Self {
            enabled: false,
            hint: Some(hint),
        }
    }

    fn when(condition: bool, hint: &'static str) -> Self {
        if condition {
            Self::enabled()
        } else {
            Self::disabled(hint)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionGates {
    pub start: Gate,
    pub plot: Gate,
    pub graph: Gate,
}

impl Default for ActionGates {
    fn default() -> Self {
        Self {
            start: Gate::disabled(START_DISABLED_HINT),
            plot: Gate::disabled(ARTIFACT_DISABLED_HINT),
            graph: Gate::disabled(ARTIFACT_DISABLED_HINT),
        }
    }
}

impl ActionGates {
    /// Start is open only for a FINISHED iteration; artifacts only when the
    /// graph exists. Missing fields count as "not yet".
    pub fn for_iteration(iteration: &CurrentIteration) -> Self {
        let finished = iteration.status == Some(IterationStatus::Finished);
        let has_graph = iteration.has_graph == Some(true);
        Self {
            start: Gate::when(finished, START_DISABLED_HINT),
            plot: Gate::when(has_graph, ARTIFACT_DISABLED_HINT),
            graph: Gate::when(has_graph, ARTIFACT_DISABLED_HINT),
        }
    }

    pub fn for_snapshot(snapshot: Option<&Snapshot>) -> Self {
        snapshot
            .and_then(|snapshot| snapshot.master_info.as_ref())
            .and_then(|master| master.current_iteration.as_ref())
            .map(Self::for_iteration)
            .unwrap_or_default()
    }

    pub fn get(&self, kind: ActionKind) -> &Gate {
        match kind {
            ActionKind::StartIteration => &self.start,
            ActionKind::OpenPlot => &self.plot,
            ActionKind::OpenGraph => &self.graph,
        }
    }

    pub fn get_mut(&mut self, kind: ActionKind) -> &mut Gate {
        match kind {
            ActionKind::StartIteration => &mut self.start,
            ActionKind::OpenPlot => &mut self.plot,
            ActionKind::OpenGraph => &mut self.graph,
        }
    }

    pub fn is_enabled(&self, kind: ActionKind) -> bool {
        self.get(kind).enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iteration(status: Option<IterationStatus>, has_graph: Option<bool>) -> CurrentIteration {
        CurrentIteration {
            status,
            has_graph,
            ..CurrentIteration::default()
        }
    }

    #[test]
    fn start_is_enabled_only_when_finished() {
        for status in IterationStatus::ALL {
            let gates = ActionGates::for_iteration(&iteration(Some(status), None));
            assert_eq!(
                gates.is_enabled(ActionKind::StartIteration),
                status == IterationStatus::Finished,
                "{status}"
            );
        }
        let unknown = ActionGates::for_iteration(&iteration(None, None));
        assert_eq!(unknown.start.hint, Some(START_DISABLED_HINT));
    }

    #[test]
    fn artifacts_follow_has_graph() {
        let ready = ActionGates::for_iteration(&iteration(None, Some(true)));
        assert!(ready.is_enabled(ActionKind::OpenPlot));
        assert!(ready.is_enabled(ActionKind::OpenGraph));
        assert_eq!(ready.plot.hint, None);

        for has_graph in [Some(false), None] {
            let gates = ActionGates::for_iteration(&iteration(None, has_graph));
            assert!(!gates.is_enabled(ActionKind::OpenPlot));
            assert!(!gates.is_enabled(ActionKind::OpenGraph));
            assert_eq!(gates.graph.hint, Some(ARTIFACT_DISABLED_HINT));
        }
    }

    #[test]
    fn no_master_info_disables_everything() {
        assert_eq!(ActionGates::for_snapshot(None), ActionGates::default());
        let pinger_only = Snapshot::default();
        let gates = ActionGates::for_snapshot(Some(&pinger_only));
        assert!(!gates.is_enabled(ActionKind::StartIteration));
        assert!(!gates.is_enabled(ActionKind::OpenPlot));
    }
}
