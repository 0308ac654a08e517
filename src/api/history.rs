use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::{ApiError, ApiResponse, AppState, HistoryEntryDto, HistoryListDto, HistoryQuery};

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// GET /api/history
/// The caller's own history records, newest first.
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    user: CurrentUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<HistoryListDto>>, ApiError> {
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_LIMIT))?;

    let records = state
        .store()
        .recent_history(&user.username, limit)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let total = state
        .store()
        .count_history(&user.username)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let entries = records
        .into_iter()
        .map(|r| HistoryEntryDto {
            id: r.id,
            user_preferences: r.user_preferences,
            created_at: r.created_at,
        })
        .collect();

    Ok(Json(ApiResponse::success(HistoryListDto { entries, total })))
}

fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    if !(1..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between 1 and {MAX_LIMIT}"
        )));
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit_bounds() {
        assert!(validate_limit(0).is_err());
        assert_eq!(validate_limit(1).unwrap(), 1);
        assert_eq!(validate_limit(100).unwrap(), 100);
        assert!(validate_limit(101).is_err());
    }
}
