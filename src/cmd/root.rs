use crate::data::PersistenceGateway;
use crate::planner::{AutosavePolicy, PlannerController};
use crate::ui::planner_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(data_dir: &Path, policy: AutosavePolicy) -> Result<()> {
    let holidays = super::holiday_table(data_dir)?;
    let (mut planner, warnings) =
        PlannerController::open(PersistenceGateway::new(data_dir), &holidays, policy);

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(&mut planner, warnings);
    let result = run_app(&mut terminal, &mut app);
    drop(app);
    restore_terminal(&mut terminal)?;

    // Final flush happens even when the event loop failed.
    planner
        .on_shutdown()
        .with_context(|| format!("failed to save planner to {}", data_dir.display()))?;

    result
}
