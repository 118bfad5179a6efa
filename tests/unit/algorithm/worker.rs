//! Tests for the background worker and its command protocol

#[cfg(test)]
mod tests {
    use pixelbloom::algorithm::scheduler::generate;
    use pixelbloom::io::error::ErrorKind;
    use pixelbloom::{Command, GenerationError, GenerationRequest, Response, Worker};
    use std::thread;
    use std::time::Duration;

    const WAIT: Option<Duration> = Some(Duration::from_secs(120));

    fn sized(width: u32, height: u32) -> GenerationRequest {
        GenerationRequest {
            width,
            height,
            seed: 3,
            ..GenerationRequest::default()
        }
    }

    // Tests a run on the worker matches the same run on the caller thread
    // Verified by seeding the worker run differently
    #[test]
    fn test_worker_matches_blocking_run() {
        let request = sized(40, 30);
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(request.clone()).expect("worker alive");

        let mut progress = Vec::new();
        let image = worker
            .wait_for_result(WAIT, |p| progress.push(p))
            .expect("run succeeds");

        assert_eq!(image, generate(&request).expect("run succeeds"));
        assert_eq!(progress.last(), Some(&100));
        assert!(progress.windows(2).all(|w| w.first() <= w.get(1)));
    }

    // Tests rejected requests come back as an error keeping their category
    // Verified by reporting every worker error as a runtime fault
    #[test]
    fn test_worker_reports_rejection() {
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(sized(5000, 5000)).expect("worker alive");

        let result = worker.wait_for_result(WAIT, |_| {});

        match result {
            Err(error) => {
                assert!(error.is_resource_exhausted(), "unexpected error: {error:?}");
                assert_eq!(error.kind(), ErrorKind::ResourceExhausted);
                assert!(
                    error.to_string().starts_with("Image size too large"),
                    "unexpected message: {error}"
                );
            }
            Ok(image) => panic!("expected a rejection, got {image:?}"),
        }
        assert!(worker.try_recv().is_none());
    }

    // Tests invalid parameters keep their category across the worker
    // Verified by classifying worker errors as resource exhaustion
    #[test]
    fn test_worker_reports_invalid_parameter() {
        let worker = Worker::spawn().expect("worker starts");
        worker
            .generate(GenerationRequest {
                growth_rate: 0.0,
                ..sized(16, 16)
            })
            .expect("worker alive");

        let error = worker
            .wait_for_result(WAIT, |_| {})
            .expect_err("zero growth rate is rejected");

        assert_eq!(error.kind(), ErrorKind::InvalidParameter);
        assert!(!error.is_resource_exhausted());
        assert!(error.to_string().contains("growthRate"));
    }

    // Tests pausing and resuming does not change the result
    // Verified by skipping slices while paused
    #[test]
    fn test_pause_resume_preserves_output() {
        let request = sized(64, 64);
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(request.clone()).expect("worker alive");
        worker.pause().expect("worker alive");
        worker.resume().expect("worker alive");
        worker.send(Command::Pause).expect("worker alive");
        worker.send(Command::Resume).expect("worker alive");

        let image = worker.wait_for_result(WAIT, |_| {}).expect("run succeeds");

        assert_eq!(image, generate(&request).expect("run succeeds"));
    }

    // Tests a new request replaces the run in flight
    // Verified by queueing requests instead of replacing
    #[test]
    fn test_generate_replaces_current_run() {
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(sized(512, 512)).expect("worker alive");
        worker.generate(sized(12, 10)).expect("worker alive");

        let mut completions = Vec::new();
        while let Some(response) = worker.recv_timeout(Duration::from_secs(120)) {
            if let Response::Complete(image) = response {
                completions.push(image.metadata.width);
                break;
            }
        }

        assert_eq!(completions, vec![12]);
        assert_eq!(worker.current_run(), 2);
    }

    // Tests replacing a finished run never yields the old run's result
    // Verified by accepting responses without checking their run
    #[test]
    fn test_replacing_finished_run_skips_its_result() {
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(sized(16, 16)).expect("worker alive");
        thread::sleep(Duration::from_millis(200));
        let replacement = sized(40, 30);
        worker.generate(replacement.clone()).expect("worker alive");

        let mut progress = Vec::new();
        let image = worker
            .wait_for_result(WAIT, |p| progress.push(p))
            .expect("run succeeds");

        assert_eq!(
            (image.metadata.width, image.metadata.height),
            (40, 30)
        );
        assert_eq!(image, generate(&replacement).expect("run succeeds"));
        assert!(progress.windows(2).all(|w| w.first() < w.get(1)));
        assert_eq!(progress.last(), Some(&100));
        assert!(worker.try_recv().is_none());
    }

    // Tests queued responses of a replaced run are never returned
    // Verified by returning the oldest queued response
    #[test]
    fn test_replaced_run_responses_are_dropped() {
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(sized(5000, 5000)).expect("worker alive");
        thread::sleep(Duration::from_millis(200));
        worker.generate(sized(6000, 6000)).expect("worker alive");

        let response = worker.recv_timeout(Duration::from_secs(120));

        assert!(
            matches!(&response, Some(Response::Error(error)) if error.message.contains("6000x6000")),
            "unexpected response: {response:?}"
        );
        assert!(worker.try_recv().is_none());
    }

    // Tests a paused worker with no pending work shuts down on drop
    // Verified by joining without sending stop
    #[test]
    fn test_drop_stops_paused_worker() {
        let worker = Worker::spawn().expect("worker starts");
        worker.generate(sized(256, 256)).expect("worker alive");
        worker.pause().expect("worker alive");

        drop(worker);
    }

    // Tests the wait gives up after the timeout
    // Verified by waiting without a deadline
    #[test]
    fn test_wait_times_out() {
        let worker = Worker::spawn().expect("worker starts");

        let result = worker.wait_for_result(Some(Duration::from_millis(20)), |_| {});

        assert!(matches!(result, Err(GenerationError::TimedOut { .. })));
        assert!(worker.try_recv().is_none());
    }
}
