// crates/cropline-ui/src/modules/mod.rs
//
// Panel registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing PanelModule
//   2. Add `pub mod mypanel;` below
//   3. Give it a panel in app.rs::update

pub mod controls;
pub mod preview;

use cropline_core::commands::CropCommand;
use cropline_core::state::SessionState;
use egui::Ui;

use crate::context::AppContext;

/// Every panel implements this. Panels read state and emit commands; they
/// never mutate SessionState directly. Runtime handles they need (current
/// frame texture, the crop-input focus id) live on AppContext.
pub trait PanelModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &SessionState,
        rt:    &mut AppContext,
        cmd:   &mut Vec<CropCommand>,
    );
}
