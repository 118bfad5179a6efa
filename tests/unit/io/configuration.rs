//! Tests for generation limits, caps and defaults

#[cfg(test)]
mod tests {
    use pixelbloom::io::configuration::{
        DEFAULT_COLOR_SAMPLE_SIZE, DEFAULT_DPI, DEFAULT_SEED, DEFAULT_SIZE, DEFAULT_TIMEOUT_SECS,
        EXPORT_BATCH_ITERATIONS, EXPORT_EARLY_FINISH_FRACTION, EXPORT_MAX_COLORS,
        EXPORT_SAMPLE_SIZE_CAP, EXPORT_WIDTH_THRESHOLD, LARGE_EXPORT_MAX_COLORS,
        LARGE_EXPORT_SAMPLE_SIZE_CAP, MAX_COLOR_STEPS, MAX_EXPORT_COLOR_STEPS, MAX_PIXELS,
        MEMORY_PROBE_BYTES, MIN_COLOR_STEPS, PREVIEW_BATCH_ITERATIONS, PREVIEW_MAX_COLORS,
        TIME_CHECK_STRIDE,
    };

    // Tests the pixel cap matches a 4096 square
    // Verified by changing the cap to 4096 * 4095
    #[test]
    fn test_pixel_cap() {
        assert_eq!(MAX_PIXELS, 4096 * 4096);
        assert_eq!(MEMORY_PROBE_BYTES, 10 * 1024 * 1024);
    }

    // Tests palette step bounds
    // Verified by raising the export cap above the maximum
    #[test]
    fn test_step_bounds() {
        assert_eq!(MIN_COLOR_STEPS, 16);
        assert_eq!(MAX_EXPORT_COLOR_STEPS, 24);
        assert_eq!(MAX_COLOR_STEPS, 32);
    }

    // Tests palette and sample caps per mode
    // Verified by swapping the preview and export color caps
    #[test]
    fn test_mode_caps() {
        assert_eq!(PREVIEW_MAX_COLORS, 100_000);
        assert_eq!(EXPORT_MAX_COLORS, 20_000);
        assert_eq!(LARGE_EXPORT_MAX_COLORS, 10_000);
        assert_eq!(DEFAULT_COLOR_SAMPLE_SIZE, 100);
        assert_eq!(EXPORT_SAMPLE_SIZE_CAP, 50);
        assert_eq!(LARGE_EXPORT_SAMPLE_SIZE_CAP, 30);
    }

    // Tests batch limits and clock stride
    // Verified by checking the clock every iteration
    #[test]
    fn test_batch_limits() {
        assert_eq!(PREVIEW_BATCH_ITERATIONS, 10_000);
        assert_eq!(EXPORT_BATCH_ITERATIONS, 2_000);
        assert_eq!(TIME_CHECK_STRIDE, 500);
        assert!((EXPORT_EARLY_FINISH_FRACTION - 0.8).abs() < f64::EPSILON);
    }

    // Tests defaults describe a reproducible preview
    // Verified by lowering the export threshold below the default size
    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_SEED, 1);
        assert_eq!(DEFAULT_SIZE, 128);
        assert_eq!(EXPORT_WIDTH_THRESHOLD, 256);
        assert_eq!(DEFAULT_DPI, 300);
        assert_eq!(DEFAULT_TIMEOUT_SECS, 180);
    }
}
