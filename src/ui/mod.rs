/// egui views over `AppState`.
///
/// `panels` edits the state (filters, file menu); the other modules only
/// draw from the current `Report`.

pub mod cards;
pub mod charts;
pub mod panels;
pub mod tables;
