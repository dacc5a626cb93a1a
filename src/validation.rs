use crate::errors::AppError;
use crate::models::HabitRequest;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;

/// Trims and checks a create/edit payload, returning `(name, icon)`.
pub fn validate_habit(request: &HabitRequest) -> Result<(String, String), AppError> {
    let name = request.name.trim();
    let icon = request.icon.trim();

    let len = name.chars().count();
    if len < NAME_MIN {
        return Err(AppError::bad_request("Name must be at least 2 characters."));
    }
    if len > NAME_MAX {
        return Err(AppError::bad_request("Name must be less than 50 characters."));
    }
    if icon.is_empty() {
        return Err(AppError::bad_request("Please select an icon."));
    }

    Ok((name.to_string(), icon.to_string()))
}
