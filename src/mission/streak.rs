use chrono::NaiveDate;

use crate::models::UserProfile;

/// Roll the day streak forward to `today`. A session on the day after the
/// last one extends the streak; any longer gap starts over at 1.
pub fn update_streak(profile: &mut UserProfile, today: NaiveDate) {
    if profile.last_session_date == Some(today) {
        return;
    }

    let continues = today
        .pred_opt()
        .is_some_and(|yesterday| profile.last_session_date == Some(yesterday));

    profile.consecutive_days = if continues {
        profile.consecutive_days + 1
    } else {
        1
    };
    profile.last_session_date = Some(today);
}
