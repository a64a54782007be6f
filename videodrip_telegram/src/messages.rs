use videodrip_models::session::{Rating, SessionState};
use videodrip_scheduler::SessionStatus;

pub const RESUMED_START: &str = "You are already registered. Continuing to send videos.";
pub const ALREADY_FINISHED: &str =
    "You have already received all the videos. Thank you for watching!";
pub const AWAITING_RATING_START: &str =
    "You have already received all the videos. Please rate them when the buttons arrive.";
pub const PAUSED: &str = "Video sending paused. Use /resume to continue.";
pub const ALREADY_PAUSED: &str = "Video sending is already paused. Use /resume to continue.";
pub const RESUMED: &str = "Video sending resumed.";
pub const NOT_PAUSED: &str = "Video sending is not paused.";
pub const NOTHING_LEFT: &str = "All videos have already been sent.";
pub const NOT_STARTED: &str = "You have not started yet. Send /start to begin.";
pub const RATING_PROMPT: &str = "Thank you for watching the videos! Please rate them from 1 to 10.";
pub const RATING_TOO_EARLY: &str = "Please wait until all the videos have been sent.";
pub const UNKNOWN_MESSAGE: &str = "I don't understand that. Use /help to see the commands.";

pub fn intro(commands: &str) -> String {
    format!(
        "Hi! I am a bot that sends you useful videos.\n\n\
To begin, I will send you a few videos to watch. \
Once they are all sent, you will be able to rate them.\n\n\
{commands}"
    )
}

pub fn video_sent(number: usize) -> String {
    format!("Video {number} sent.")
}

pub fn rating_thanks(rating: Rating) -> String {
    format!("Thank you for your rating: {rating}!")
}

pub fn status(status: &SessionStatus) -> String {
    let progress = format!("Videos sent: {} of {}.", status.sent, status.total);
    let state = match status.state {
        SessionState::Sending => "Sending is in progress.".to_string(),
        SessionState::Paused => "Sending is paused.".to_string(),
        SessionState::AwaitingRating => "Waiting for your rating.".to_string(),
        SessionState::Rated(rating) => format!("Your rating: {rating}."),
    };

    format!("{progress}\n{state}")
}
