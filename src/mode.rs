use tracing::debug;

use crate::draw::Primitive;
use crate::instrument::{ConfigField, FrameContext, InstrumentConfig, Visualization, VisualizationKind};
use crate::speed_filter::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Hidden,
    Showing(VisualizationKind),
}

/// Tracks which visualization is on screen.
///
/// Every kind is allocated up front and lives for the whole session, so
/// settings reach hidden visualizations too.
#[derive(Debug, Clone)]
pub struct ModeMachine {
    mode: Mode,
    last_selected: VisualizationKind,
    visualizations: [Visualization; 2],
}

impl ModeMachine {
    pub fn new(config: &InstrumentConfig, default_kind: VisualizationKind, show_on_startup: bool) -> Self {
        let mode = if show_on_startup {
            Mode::Showing(default_kind)
        } else {
            Mode::Hidden
        };

        Self {
            mode,
            last_selected: default_kind,
            visualizations: VisualizationKind::ALL.map(|kind| Visualization::new(kind, config)),
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn last_selected(&self) -> VisualizationKind {
        self.last_selected
    }

    pub fn is_visible(&self) -> bool {
        matches!(self.mode, Mode::Showing(_))
    }

    pub fn toggle(&mut self) {
        match self.mode {
            Mode::Hidden => self.select(self.last_selected),
            Mode::Showing(_) => self.hide(),
        }
    }

    pub fn select(&mut self, kind: VisualizationKind) {
        if self.mode == Mode::Showing(kind) {
            return;
        }
        debug!(from = ?self.mode, to = ?kind, "selecting visualization");
        self.mode = Mode::Showing(kind);
        self.last_selected = kind;
    }

    pub fn hide(&mut self) {
        if self.mode != Mode::Hidden {
            debug!(from = ?self.mode, "hiding visualization");
        }
        self.mode = Mode::Hidden;
    }

    /// Applies a setting to every visualization, shown or not.
    pub fn update_config(&mut self, field: ConfigField, value: f32) {
        for visualization in &mut self.visualizations {
            visualization.apply(field, value);
        }
    }

    pub fn visualization(&self, kind: VisualizationKind) -> &Visualization {
        &self.visualizations[kind.index()]
    }

    pub fn active(&self) -> Option<&Visualization> {
        match self.mode {
            Mode::Showing(kind) => Some(self.visualization(kind)),
            Mode::Hidden => None,
        }
    }

    pub fn active_mut(&mut self) -> Option<&mut Visualization> {
        match self.mode {
            Mode::Showing(kind) => Some(&mut self.visualizations[kind.index()]),
            Mode::Hidden => None,
        }
    }

    /// Runs one frame for the active visualization: feeds the sample (or
    /// resets on `None`) and returns what to draw. Hidden yields nothing.
    pub fn frame(&mut self, sample: Option<Position>, now: f64, frame: &FrameContext<'_>) -> Vec<Primitive> {
        let Some(active) = self.active_mut() else {
            return Vec::new();
        };
        active.update(sample, now);
        active.render(frame)
    }

    /// Consumes a pending dismiss click on the active visualization and hides it.
    pub fn take_dismiss(&mut self) -> bool {
        let dismissed = self.active_mut().is_some_and(|active| active.was_dismiss_clicked());
        if dismissed {
            self.hide();
        }
        dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(show: bool) -> ModeMachine {
        ModeMachine::new(&InstrumentConfig::default(), VisualizationKind::Trail, show)
    }

    #[test]
    fn startup_honours_flag() {
        assert_eq!(machine(true).mode(), Mode::Showing(VisualizationKind::Trail));
        assert_eq!(machine(false).mode(), Mode::Hidden);
    }

    #[test]
    fn toggle_restores_last_selected() {
        let mut machine = machine(false);
        machine.select(VisualizationKind::Gauge);
        machine.toggle();
        assert!(!machine.is_visible());
        machine.toggle();
        assert_eq!(machine.mode(), Mode::Showing(VisualizationKind::Gauge));
    }

    #[test]
    fn selecting_active_kind_is_noop() {
        let mut machine = machine(true);
        machine.select(VisualizationKind::Trail);
        assert_eq!(machine.mode(), Mode::Showing(VisualizationKind::Trail));
        assert_eq!(machine.last_selected(), VisualizationKind::Trail);
    }
}
