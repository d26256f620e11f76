//! Single-consumer event loop between input capture and the overlay display

use crossbeam_channel::Receiver;
use log::debug;

use crate::session::{DisplayCommand, MeasurementSession, SessionEvent};

/// Receiver of overlay instructions (click-through prompt window, console, ...)
pub trait DisplaySink {
    fn show_prompt(&mut self, text: &str, auto_close_ms: Option<u64>);
    fn close_prompt(&mut self);
}

/// Records every command, for replays and tests
impl DisplaySink for Vec<DisplayCommand> {
    fn show_prompt(&mut self, text: &str, auto_close_ms: Option<u64>) {
        self.push(DisplayCommand::ShowPrompt {
            text: text.to_string(),
            auto_close_ms,
        });
    }

    fn close_prompt(&mut self) {
        self.push(DisplayCommand::ClosePrompt);
    }
}

/// Apply one event and forward its commands to the sink, in order
pub fn dispatch<S: DisplaySink + ?Sized>(session: &mut MeasurementSession, event: SessionEvent, sink: &mut S) {
    for command in session.handle(event) {
        match command {
            DisplayCommand::ShowPrompt { text, auto_close_ms } => sink.show_prompt(&text, auto_close_ms),
            DisplayCommand::ClosePrompt => sink.close_prompt(),
        }
    }
}

/// Drain `events` on the current thread until every sender is dropped
///
/// Producers (keyboard/mouse hooks) may run on any thread; all session state
/// is only touched here. Returns the session so its calibration and readout
/// can be inspected afterwards.
pub fn run_session<S: DisplaySink + ?Sized>(
    mut session: MeasurementSession,
    events: Receiver<SessionEvent>,
    sink: &mut S,
) -> MeasurementSession {
    for event in events.iter() {
        dispatch(&mut session, event, sink);
    }
    debug!("event channel closed, session in {:?}", session.state());
    session
}
