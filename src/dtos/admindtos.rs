use serde::{Deserialize, Serialize};
use validator::Validate;

/// "approve" or "reject"; anything else is rejected at the handler.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProviderApprovalDto {
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,

    #[validate(length(max = 255, message = "Reason must be at most 255 characters"))]
    pub reason: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct ReviewPendingUpdateDto {
    #[validate(length(min = 1, message = "Action is required"))]
    pub action: String,
}
