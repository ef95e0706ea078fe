pub mod drafts;
pub mod versions;

use serde_json::Value;
use wikidraft_core::content::DraftContent;

use crate::error::AppResult;

/// Shape-check a request body as draft content.
pub(crate) fn parse_content(body: &Value) -> AppResult<DraftContent> {
    Ok(DraftContent::from_value(body)?)
}
