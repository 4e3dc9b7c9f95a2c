// Tabspace state managers
// Managers own the stateful parts: the window/tab tracking table and workspace reconciliation.

pub mod tracking_table;
pub mod workspace_manager;
