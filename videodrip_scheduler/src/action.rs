use videodrip_models::{catalog::VideoCatalog, session::UserSession};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TickAction<'a> {
    Skip,
    Send { index: usize, url: &'a str },
    Finish,
}

/// Decides what a single tick does for `session`. A paused session is skipped
/// even when the catalog is exhausted, so the rating prompt waits for resume.
pub fn next_action<'a>(session: &UserSession, catalog: &'a VideoCatalog) -> TickAction<'a> {
    if session.paused {
        return TickAction::Skip;
    }

    match catalog.get(session.video_index) {
        Some(url) => TickAction::Send {
            index: session.video_index,
            url,
        },
        None => TickAction::Finish,
    }
}
