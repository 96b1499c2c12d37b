//! Failure containment at the host boundary
//!
//! Classifiers and annotators are caller-supplied code running inside the
//! host's completion loop. A panic in one of them must not take the session
//! down; it is logged and reported as "no opinion".

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Run `f`, turning a panic into `None`.
///
/// `stage` and `subject` only label the log line, e.g. `("classifier", "by-prompt")`.
pub fn contained<T, F>(stage: &str, subject: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Option<T>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            log::warn!(
                "{} {:?} failed and was ignored: {}",
                stage,
                subject,
                panic_message(payload.as_ref())
            );
            None
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
