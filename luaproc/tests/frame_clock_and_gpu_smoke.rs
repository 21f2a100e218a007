mod support;

use std::time::{Duration, Instant};

use luaproc::backend::frame_clock::FrameClock;

#[test]
fn frame_clock_paces_at_the_target_rate() {
    let start = Instant::now();
    let mut clock = FrameClock::with_start(50, start);
    assert_eq!(clock.frame_duration(), Duration::from_millis(20));
    assert_eq!(clock.next_deadline(), start + Duration::from_millis(20));

    clock.set_fps(25);
    assert_eq!(clock.frame_duration(), Duration::from_millis(40));
}

#[test]
fn gpu_probe_is_opt_in() {
    if !support::gpu_tests_enabled() {
        eprintln!(
            "Skipping GPU smoke probe. Set LUAPROC_RUN_GPU_TESTS=1 to run."
        );
        return;
    }

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(
        &wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            force_fallback_adapter: true,
            compatible_surface: None,
        },
    ))
    .expect("expected a headless adapter for GPU smoke probe");

    let info = adapter.get_info();
    assert!(!info.name.is_empty());
}
