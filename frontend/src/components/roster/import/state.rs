use common::roster::ImportSession;

pub struct RosterImportComponent {
    /// Selection, preview and import state.
    pub session: ImportSession,
}

impl RosterImportComponent {
    pub fn new() -> Self {
        Self {
            session: ImportSession::new(),
        }
    }
}
