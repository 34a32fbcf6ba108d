//! Bulk roster import: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering and helpers.
//!
//! Workflow
//! 1. The user picks a CSV file. It is read in the browser and previewed with
//!    `common::roster::build_preview` (no network call).
//! 2. The preview lists every row with its issues. Missing headers disable
//!    the import button; row issues do not.
//! 3. Import sends the original bytes to the backend (`importer::HttpImporter`).
//!    The answer replaces the preview issues with the authoritative ones.
//! 4. Issues can be downloaded as an issue report or a correction skeleton.
//!
//! All transitions go through `common::roster::ImportSession`, which drops
//! file reads and import answers that belong to an older selection.

use yew::prelude::*;

mod helpers;
mod importer;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::RosterImportProps;
pub use state::RosterImportComponent;

impl Component for RosterImportComponent {
    type Message = Msg;
    type Properties = RosterImportProps;

    fn create(_ctx: &Context<Self>) -> Self {
        RosterImportComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }
}
