//! Tests for slice execution, progress reporting and buffer delivery

#[cfg(test)]
mod tests {
    use pixelbloom::algorithm::growth::{GrowthEngine, StepOutcome};
    use pixelbloom::algorithm::profile::BatchPolicy;
    use pixelbloom::algorithm::scheduler::{
        Response, ResponseSink, RunContext, RunState, Scheduler, SliceOutcome, deliver, finalize,
        generate, run_blocking,
    };
    use pixelbloom::io::output::{GeneratedImage, OutputMetadata};
    use pixelbloom::{GenerationError, GenerationRequest};
    use std::sync::mpsc;
    use std::time::Duration;

    fn sized(width: u32, height: u32) -> GenerationRequest {
        GenerationRequest {
            width,
            height,
            seed: 7,
            ..GenerationRequest::default()
        }
    }

    fn tiny_policy(max_iterations: usize, progress_interval: Duration) -> BatchPolicy {
        BatchPolicy {
            max_iterations,
            time_limit: Duration::from_secs(60),
            progress_interval,
            time_check_stride: 500,
        }
    }

    fn sample_image() -> GeneratedImage {
        GeneratedImage {
            buffer: vec![1, 2, 3, 4],
            metadata: OutputMetadata {
                width: 1,
                height: 1,
                color_space: pixelbloom::io::output::ColorSpace::Srgb,
                pattern_complexity: 128,
                transparent: false,
                dpi: 300,
            },
        }
    }

    /// Sink refusing the first `refusals` messages
    struct Refusing {
        refusals: usize,
        accepted: Vec<Response>,
    }

    impl ResponseSink for Refusing {
        fn send(&mut self, response: Response) -> Result<(), Response> {
            if self.refusals > 0 {
                self.refusals -= 1;
                return Err(response);
            }
            self.accepted.push(response);
            Ok(())
        }
    }

    // Tests the context reports floored percentages and lifecycle changes
    // Verified by rounding the percentage up
    #[test]
    fn test_context_lifecycle() {
        let mut context = RunContext::new(300);

        assert_eq!(context.state(), RunState::Seeding);
        assert_eq!(context.percent(), 0);
        assert_eq!(RunContext::new(0).percent(), 100);

        context.pause();
        assert!(context.is_paused());
        assert_eq!(context.state(), RunState::Paused);
        context.resume();
        assert!(!context.is_paused());

        context.fail();
        assert_eq!(context.state(), RunState::Error);
        context.pause();
        assert!(!context.is_paused());
    }

    // Tests a slice stops at the iteration cap and tracks filled pixels
    // Verified by ignoring the iteration cap
    #[test]
    fn test_slice_respects_iteration_cap() {
        let mut engine = GrowthEngine::new(&sized(64, 64)).expect("valid request");
        let mut context = RunContext::for_engine(&engine);
        let scheduler = Scheduler::new(tiny_policy(10, Duration::from_secs(60)));
        let mut sink = Vec::new();

        let outcome = scheduler
            .run_slice(&mut engine, &mut context, &mut sink)
            .expect("slice succeeds");

        assert_eq!(outcome, SliceOutcome::Continue);
        assert_eq!(context.state(), RunState::Growing);
        assert_eq!(context.slices(), 1);
        assert_eq!(context.filled(), engine.canvas().filled_count());
        assert!(context.filled() > 0 && context.filled() <= 40);
        assert!(sink.is_empty());
    }

    // Tests a paused context does no work
    // Verified by running the slice regardless of the pause flag
    #[test]
    fn test_paused_slice_is_noop() {
        let mut engine = GrowthEngine::new(&sized(32, 32)).expect("valid request");
        let mut context = RunContext::for_engine(&engine);
        context.pause();
        let scheduler = Scheduler::for_engine(&engine);

        let outcome = scheduler
            .run_slice(&mut engine, &mut context, &mut Vec::new())
            .expect("slice succeeds");

        assert_eq!(outcome, SliceOutcome::Paused);
        assert_eq!(engine.canvas().filled_count(), 0);
        assert_eq!(
            scheduler
                .drive(&mut engine, &mut context, &mut Vec::new())
                .expect("drive succeeds"),
            None
        );
    }

    // Tests progress is non-decreasing and completion follows 100
    // Verified by reporting progress before updating the filled count
    #[test]
    fn test_progress_then_completion() {
        let mut engine = GrowthEngine::new(&sized(32, 32)).expect("valid request");
        let mut context = RunContext::for_engine(&engine);
        let scheduler = Scheduler::new(tiny_policy(25, Duration::ZERO));
        let mut sink = Vec::new();

        let stopped = scheduler
            .drive(&mut engine, &mut context, &mut sink)
            .expect("drive succeeds");
        assert_eq!(stopped, Some(StepOutcome::FrontierExhausted));
        assert_eq!(context.state(), RunState::Finalizing);
        assert!(context.slices() > 1);

        finalize(engine, &mut context, &mut sink).expect("finalize succeeds");
        assert_eq!(context.state(), RunState::Done);

        let percents: Vec<u8> = sink
            .iter()
            .filter_map(|response| match response {
                Response::Progress(p) => Some(*p),
                _ => None,
            })
            .collect();
        assert!(percents.len() > 2);
        assert!(percents.windows(2).all(|w| w.first() < w.get(1)));
        assert_eq!(percents.last(), Some(&100));

        match sink.last() {
            Some(Response::Complete(image)) => {
                assert_eq!(image.buffer.len(), 32 * 32 * 4);
                assert_eq!(image.metadata.width, 32);
            }
            other => panic!("expected completion, got {other:?}"),
        }
    }

    // Tests a refused handoff is retried once with a copy
    // Verified by returning the first refusal as an error
    #[test]
    fn test_deliver_retries_once() {
        let mut sink = Refusing {
            refusals: 1,
            accepted: Vec::new(),
        };

        deliver(sample_image(), &mut sink).expect("retry succeeds");

        assert_eq!(sink.accepted, vec![Response::Complete(sample_image())]);
    }

    // Tests a second refusal becomes a transfer failure
    // Verified by retrying indefinitely
    #[test]
    fn test_deliver_fails_after_retry() {
        let mut sink = Refusing {
            refusals: 2,
            accepted: Vec::new(),
        };

        let result = deliver(sample_image(), &mut sink);

        assert!(matches!(result, Err(GenerationError::TransferFailure { .. })));
        assert!(sink.accepted.is_empty());
    }

    // Tests channel senders act as sinks and hand back refused messages
    // Verified by discarding the message on send failure
    #[test]
    fn test_channel_sink() {
        let (mut tx, rx) = mpsc::channel::<Response>();
        ResponseSink::send(&mut tx, Response::Progress(5)).expect("receiver alive");
        assert_eq!(rx.recv().ok(), Some(Response::Progress(5)));

        drop(rx);
        assert_eq!(
            ResponseSink::send(&mut tx, Response::Progress(6)),
            Err(Response::Progress(6))
        );
    }

    // Tests blocking runs deliver the buffer through the sink
    // Verified by skipping delivery in finalize
    #[test]
    fn test_run_blocking_and_generate() {
        let request = sized(20, 12);
        let mut sink = Vec::new();
        run_blocking(&request, &mut sink).expect("run succeeds");

        let image = generate(&request).expect("run succeeds");
        assert_eq!(image.buffer.len(), 20 * 12 * 4);
        assert_eq!(sink.last(), Some(&Response::Complete(image)));

        assert!(run_blocking(&sized(0, 5), &mut Vec::new()).is_err());
    }
}
