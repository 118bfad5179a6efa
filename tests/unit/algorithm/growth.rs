//! Tests for the growth engine state machine and its termination rules

#[cfg(test)]
mod tests {
    use pixelbloom::algorithm::growth::{GrowthEngine, GrowthMode, StepOutcome, probe_memory};
    use pixelbloom::spatial::{Coord, SeedShape, SymmetryMode};
    use pixelbloom::{GenerationError, GenerationRequest};
    use std::collections::HashSet;

    fn sized(width: u32, height: u32) -> GenerationRequest {
        GenerationRequest {
            width,
            height,
            seed: 42,
            ..GenerationRequest::default()
        }
    }

    fn filled_colors(engine: &GrowthEngine) -> Vec<[u8; 3]> {
        let canvas = engine.canvas();
        let mut colors = Vec::new();
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if let Some(color) = canvas.color_at(Coord::new(x, y)) {
                    colors.push(color);
                }
            }
        }
        colors
    }

    // Tests oversized requests fail before any allocation
    // Verified by validating after allocating the canvas
    #[test]
    fn test_rejects_oversized_canvas() {
        let result = GrowthEngine::new(&sized(5000, 5000));

        assert!(matches!(
            result,
            Err(GenerationError::DimensionsTooLarge { .. })
        ));
    }

    // Tests the first step fills the four central pixels
    // Verified by seeding at (width - 1) / 2
    #[test]
    fn test_first_step_fills_center_block() {
        let mut engine = GrowthEngine::new(&sized(128, 128)).expect("valid request");
        assert_eq!(engine.frontier().len(), 1);

        let outcome = engine.step().expect("step succeeds");

        assert_eq!(outcome, StepOutcome::Progressed { filled: 4 });
        for (x, y) in [(64, 64), (63, 64), (64, 63), (63, 63)] {
            assert!(engine.canvas().is_filled(Coord::new(x, y)));
        }
        assert!(!engine.frontier().is_empty());
    }

    // Tests a small canvas is filled completely when colors suffice
    // Verified by skipping neighbors of mirrored images
    #[test]
    fn test_small_canvas_fills_completely() {
        let mut engine = GrowthEngine::new(&sized(16, 16)).expect("valid request");

        let outcome = engine.run_to_end().expect("run succeeds");

        assert_eq!(outcome, StepOutcome::FrontierExhausted);
        assert!(engine.canvas().mask().is_full());
        assert!(engine.step().expect("step succeeds").is_terminal());
    }

    // Tests the run stops when the palette runs out
    // Verified by recycling used colors
    #[test]
    fn test_palette_exhaustion() {
        let mut engine = GrowthEngine::new(&sized(128, 128)).expect("valid request");
        let palette_size = engine.palette().len();
        assert_eq!(palette_size, 4096);

        let outcome = engine.run_to_end().expect("run succeeds");

        assert_eq!(outcome, StepOutcome::PaletteExhausted);
        assert_eq!(engine.canvas().filled_count(), palette_size);
        assert!(engine.palette().is_empty());
    }

    // Tests every committed color is used exactly once
    // Verified by taking colors without removing them
    #[test]
    fn test_colors_are_exclusive() {
        let mut engine = GrowthEngine::new(&sized(48, 40)).expect("valid request");
        engine.run_to_end().expect("run succeeds");

        let colors = filled_colors(&engine);
        let unique: HashSet<[u8; 3]> = colors.iter().copied().collect();

        assert_eq!(colors.len(), engine.canvas().filled_count());
        assert_eq!(unique.len(), colors.len());
    }

    // Tests identical requests produce identical canvases
    // Verified by seeding jitter from the clock
    #[test]
    fn test_deterministic_for_seed() {
        let request = GenerationRequest {
            growth_mode: GrowthMode::Nebula,
            ..sized(40, 40)
        };
        let mut a = GrowthEngine::new(&request).expect("valid request");
        let mut b = GrowthEngine::new(&request).expect("valid request");
        a.run_to_end().expect("run succeeds");
        b.run_to_end().expect("run succeeds");

        let mut c = GrowthEngine::new(&GenerationRequest { seed: 43, ..request }).expect("valid request");
        c.run_to_end().expect("run succeeds");

        let a = a.into_canvas().into_rgba();
        assert_eq!(a, b.into_canvas().into_rgba());
        assert_ne!(a, c.into_canvas().into_rgba());
    }

    // Tests every mode, shape and symmetry reaches every pixel
    // Verified by dropping the last neighbor offset
    #[test]
    fn test_all_modes_cover_canvas() {
        for growth_mode in [GrowthMode::Crystal, GrowthMode::Nebula, GrowthMode::Rings] {
            for seed_shape in [SeedShape::Point, SeedShape::Circle, SeedShape::Line] {
                for symmetry_mode in [
                    SymmetryMode::None,
                    SymmetryMode::Bilateral,
                    SymmetryMode::Quadrantal,
                    SymmetryMode::Radial,
                ] {
                    let request = GenerationRequest {
                        growth_mode,
                        seed_shape,
                        symmetry_mode,
                        ..sized(24, 20)
                    };
                    let mut engine = GrowthEngine::new(&request).expect("valid request");
                    engine.run_to_end().expect("run succeeds");

                    assert!(
                        engine.canvas().mask().is_full(),
                        "{growth_mode:?}/{seed_shape:?}/{symmetry_mode:?} left gaps"
                    );
                }
            }
        }
    }

    // Tests exports finish once the fill threshold is reached
    // Verified by disabling the early finish check
    #[test]
    fn test_export_early_finish() {
        let mut engine = GrowthEngine::new(&sized(300, 10)).expect("valid request");
        assert!(engine.profile().is_export);

        let outcome = engine.run_to_end().expect("run succeeds");
        let fraction = engine.canvas().filled_count() as f64 / 3000.0;

        assert_eq!(outcome, StepOutcome::EarlyFinish);
        assert!(fraction >= 0.8);
        assert!(fraction < 0.81);
    }

    // Tests exports stop queueing neighbors once the frontier passes its cap
    // Verified by enqueueing neighbors regardless of the cap
    #[test]
    fn test_export_queue_cap_bounds_frontier() {
        let request = GenerationRequest {
            seed_shape: SeedShape::Line,
            ..sized(300, 4)
        };
        let mut engine = GrowthEngine::new(&request).expect("valid request");
        let cap = engine.profile().queue_cap.expect("exports cap the queue");
        assert_eq!(cap, 300);

        let mut largest = engine.frontier().len();
        let outcome = loop {
            let outcome = engine.step().expect("step succeeds");
            largest = largest.max(engine.frontier().len());
            assert!(
                engine.frontier().len() <= cap + 4,
                "frontier grew to {} past cap {cap}",
                engine.frontier().len()
            );
            if outcome.is_terminal() {
                break outcome;
            }
        };

        assert!(largest > cap, "cap never reached, largest frontier {largest}");
        assert_ne!(outcome, StepOutcome::PaletteExhausted);
        assert!(engine.canvas().filled_count() < engine.canvas().pixel_count());
    }

    // Tests the growth rate only rescales priorities
    // Verified by adding the growth rate instead of dividing
    #[test]
    fn test_growth_rate_preserves_order() {
        let base = sized(32, 32);
        let mut slow = GrowthEngine::new(&base).expect("valid request");
        let mut fast =
            GrowthEngine::new(&GenerationRequest { growth_rate: 4.0, ..base }).expect("valid request");
        slow.run_to_end().expect("run succeeds");
        fast.run_to_end().expect("run succeeds");

        assert_eq!(slow.into_canvas().into_rgba(), fast.into_canvas().into_rgba());
    }

    // Tests the memory probe accepts a modest allocation
    // Verified by probing with usize::MAX
    #[test]
    fn test_probe_memory() {
        assert!(probe_memory(1024).is_ok());
        assert!(probe_memory(usize::MAX).is_err());
    }
}
