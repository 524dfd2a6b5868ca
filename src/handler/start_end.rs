//! Start/end annotation handler
//!
//! Wraps each job's output in a `::group::` block and annotates the
//! outcome when the job ends:
//! - success with test failures: `::warning` on the info sink
//! - aborted (interrupt sentinel): `::error` on the info sink
//! - any other nonzero exit: `::error` on the error sink
//!
//! Every line is flushed before `handle` returns, so annotations stay
//! ordered relative to subprocess output the orchestrator interleaves.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::time::Instant;

use super::{EventHandler, HandlerError};
use crate::duration::format_duration;
use crate::event::JobEvent;

pub struct StartEndHandler {
    interrupt_code: i32,
    start_times: HashMap<String, Instant>,
    with_test_failures: HashSet<String>,
    info: Box<dyn Write + Send>,
    error: Box<dyn Write + Send>,
}

impl StartEndHandler {
    /// Handler writing to the process stdout/stderr.
    pub fn stdio(interrupt_code: i32) -> Self {
        Self::with_sinks(interrupt_code, Box::new(std::io::stdout()), Box::new(std::io::stderr()))
    }

    /// Handler with injected sinks; tests capture output through these.
    pub fn with_sinks(interrupt_code: i32, info: Box<dyn Write + Send>, error: Box<dyn Write + Send>) -> Self {
        Self {
            interrupt_code,
            start_times: HashMap::new(),
            with_test_failures: HashSet::new(),
            info,
            error,
        }
    }

    fn on_started(&mut self, id: &str) -> Result<(), HandlerError> {
        writeln!(self.info, "::group::{id}")?;
        self.info.flush()?;
        if self.start_times.insert(id.to_string(), Instant::now()).is_some() {
            log::debug!("Job '{id}' started twice; start time overwritten");
        }
        Ok(())
    }

    fn on_ended(&mut self, id: &str, rc: i32) -> Result<(), HandlerError> {
        // Removing (not just reading) the start time keeps the map bounded
        // over long runs.
        let started = self
            .start_times
            .remove(id)
            .ok_or_else(|| HandlerError::UnknownJob { id: id.to_string() })?;
        let duration = format_duration(started.elapsed());

        match rc {
            0 => {
                if self.with_test_failures.contains(id) {
                    writeln!(self.info, "::warning title={id}::Finished [ with test failures ]")?;
                    self.info.flush()?;
                }
            }
            rc if rc == self.interrupt_code => {
                // Aborted jobs annotate the info sink, unlike ordinary failures.
                writeln!(self.info, "::error title={id}::Aborted [{duration}]")?;
                self.info.flush()?;
            }
            rc => {
                writeln!(self.error, "::error title={id}::Failed [{duration}, exited with code {rc}]")?;
                self.error.flush()?;
            }
        }

        writeln!(self.info, "::endgroup::")?;
        self.info.flush()?;
        Ok(())
    }
}

impl EventHandler for StartEndHandler {
    fn name(&self) -> &'static str {
        "start_end"
    }

    fn api_requirement(&self) -> &'static str {
        "^1.0"
    }

    fn handle(&mut self, event: &JobEvent) -> Result<(), HandlerError> {
        match event {
            JobEvent::JobStarted { id } => self.on_started(id),
            JobEvent::TestFailure { job } => {
                self.with_test_failures.insert(job.clone());
                Ok(())
            }
            JobEvent::JobEnded { id, rc } => self.on_ended(id, *rc),
            JobEvent::Unknown => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SIGINT_CODE;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn handler() -> (StartEndHandler, SharedBuf, SharedBuf) {
        let info = SharedBuf::default();
        let error = SharedBuf::default();
        let h = StartEndHandler::with_sinks(SIGINT_CODE, Box::new(info.clone()), Box::new(error.clone()));
        (h, info, error)
    }

    fn started(id: &str) -> JobEvent {
        JobEvent::JobStarted { id: id.to_string() }
    }

    fn ended(id: &str, rc: i32) -> JobEvent {
        JobEvent::JobEnded { id: id.to_string(), rc }
    }

    fn test_failure(job: &str) -> JobEvent {
        JobEvent::TestFailure { job: job.to_string() }
    }

    #[test]
    fn test_clean_success_emits_only_group_markers() {
        let (mut h, info, error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&ended("pkg_a", 0)).unwrap();

        assert_eq!(info.contents(), "::group::pkg_a\n::endgroup::\n");
        assert_eq!(error.contents(), "");
    }

    #[test]
    fn test_success_with_test_failures_warns() {
        let (mut h, info, error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&test_failure("pkg_a")).unwrap();
        h.handle(&ended("pkg_a", 0)).unwrap();

        assert_eq!(
            info.contents(),
            "::group::pkg_a\n::warning title=pkg_a::Finished [ with test failures ]\n::endgroup::\n"
        );
        assert_eq!(error.contents(), "");
    }

    #[test]
    fn test_test_failure_alone_emits_nothing() {
        let (mut h, info, error) = handler();
        h.handle(&test_failure("pkg_a")).unwrap();

        assert_eq!(info.contents(), "");
        assert_eq!(error.contents(), "");
    }

    #[test]
    fn test_failure_goes_to_error_sink() {
        let (mut h, info, error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&ended("pkg_a", 2)).unwrap();

        assert_eq!(info.contents(), "::group::pkg_a\n::endgroup::\n");
        assert_eq!(error.contents(), "::error title=pkg_a::Failed [0s, exited with code 2]\n");
    }

    #[test]
    fn test_aborted_goes_to_info_sink() {
        let (mut h, info, error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&ended("pkg_a", SIGINT_CODE)).unwrap();

        assert_eq!(info.contents(), "::group::pkg_a\n::error title=pkg_a::Aborted [0s]\n::endgroup::\n");
        assert_eq!(error.contents(), "");
    }

    #[test]
    fn test_custom_interrupt_code() {
        let info = SharedBuf::default();
        let error = SharedBuf::default();
        let mut h = StartEndHandler::with_sinks(99, Box::new(info.clone()), Box::new(error.clone()));

        h.handle(&started("pkg_a")).unwrap();
        h.handle(&ended("pkg_a", 99)).unwrap();

        assert!(info.contents().contains("::error title=pkg_a::Aborted [0s]"));
        assert_eq!(error.contents(), "");
    }

    #[test]
    fn test_interleaved_jobs_keyed_by_identifier() {
        let (mut h, info, error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&started("pkg_b")).unwrap();
        h.handle(&ended("pkg_b", 0)).unwrap();
        h.handle(&ended("pkg_a", 1)).unwrap();

        assert_eq!(info.contents(), "::group::pkg_a\n::group::pkg_b\n::endgroup::\n::endgroup::\n");
        assert_eq!(error.contents(), "::error title=pkg_a::Failed [0s, exited with code 1]\n");
    }

    #[test]
    fn test_failure_for_other_job_does_not_warn() {
        let (mut h, info, _error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&test_failure("pkg_b")).unwrap();
        h.handle(&ended("pkg_a", 0)).unwrap();

        assert_eq!(info.contents(), "::group::pkg_a\n::endgroup::\n");
    }

    #[test]
    fn test_end_without_start_is_typed_error() {
        let (mut h, info, error) = handler();
        let result = h.handle(&ended("pkg_a", 0));

        assert!(matches!(result, Err(HandlerError::UnknownJob { id }) if id == "pkg_a"));
        assert_eq!(info.contents(), "");
        assert_eq!(error.contents(), "");
    }

    #[test]
    fn test_end_consumes_start_time() {
        let (mut h, _info, _error) = handler();
        h.handle(&started("pkg_a")).unwrap();
        h.handle(&ended("pkg_a", 0)).unwrap();

        let result = h.handle(&ended("pkg_a", 0));
        assert!(matches!(result, Err(HandlerError::UnknownJob { .. })));
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let (mut h, info, error) = handler();
        h.handle(&JobEvent::Unknown).unwrap();

        assert_eq!(info.contents(), "");
        assert_eq!(error.contents(), "");
    }
}
