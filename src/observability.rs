use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("chatterm.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("chatterm.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("chatterm.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("chatterm.session.turns");
pub(crate) static SESSION_TURN_FAILURES: Counter = Counter::new("chatterm.session.turn_failures");
pub(crate) static SESSION_CONTEXT_FILES: Counter = Counter::new("chatterm.session.context_files");
pub(crate) static SESSION_MULTILINE_FLUSHES: Counter =
    Counter::new("chatterm.session.multiline_flushes");

pub(crate) static RENDER_FAILURES: Counter = Counter::new("chatterm.render.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_TURN_FAILURES);
    collector.register_counter(&SESSION_CONTEXT_FILES);
    collector.register_counter(&SESSION_MULTILINE_FLUSHES);

    collector.register_counter(&RENDER_FAILURES);
}
