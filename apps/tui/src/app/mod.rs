// App module for realty_timeline
// Handles dashboard state and key handling

pub mod input;
pub mod state;

pub use input::handle_input;
pub use state::{App, Focus, SidebarField};
