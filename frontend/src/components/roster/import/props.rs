use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct RosterImportProps {
    /// Course the roster is imported into. Used in the import URL.
    pub course_id: String,
}
