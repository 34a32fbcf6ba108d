use serde::{Deserialize, Serialize};

/// Request payload for the single-student invite endpoint.
/// Every field is required; the programme must belong to the configured vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleInviteRequest {
    pub email: String,
    #[serde(alias = "name")]
    pub full_name: String,
    pub student_number: String,
    pub programme: String,
}
