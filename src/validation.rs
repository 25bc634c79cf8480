use crate::error::ApiError;

pub fn validate_lead_hours(value: i64) -> Result<i64, ApiError> {
    if (1..=24).contains(&value) {
        Ok(value)
    } else {
        Err(ApiError::BadRequest(
            "lead_hours must be between 1 and 24".into(),
        ))
    }
}
