mod support;

use luaproc::api::Arity;
use luaproc::prelude::*;
use support::{Harness, sketch};

fn output_of(draw: &str) -> String {
    let mut harness = Harness::new(&sketch("", draw)).expect("load");
    harness.run(1).expect("run");
    harness.output.contents()
}

fn error_of(draw: &str) -> HostError {
    let mut harness = Harness::new(&sketch("", draw)).expect("load");
    harness.run(1).expect_err("draw should fail")
}

#[test]
fn print_joins_arguments_with_spaces() {
    assert_eq!(
        output_of("  print(1, 2.5, 'a', true, nil)\n  print('|')"),
        "1 2.5 a true nil|"
    );
    assert_eq!(output_of("  println()"), "\n");
}

#[test]
fn wrong_argument_count_is_fatal() {
    let err = error_of("  background(1, 2, 3, 4, 5)");
    assert_eq!(
        err.to_string(),
        "'background' expects 1 to 4 arguments but got 5"
    );
    assert_eq!(err.origin(), Origin::Script);

    let err = error_of("  line(0, 0, 1)");
    assert_eq!(
        err,
        HostError::arg_count("line", Arity::OneOf(&[4, 6]), 3)
    );
}

#[test]
fn wrong_argument_type_is_fatal() {
    let err = error_of("  fill('red')");
    assert_eq!(err, HostError::arg_type("fill", "number"));
    assert_eq!(err.to_string(), "'fill' expects arguments of type 'number'");

    let err = error_of("  windowTitle(42)");
    assert_eq!(err, HostError::arg_type("windowTitle", "string"));
}

#[test]
fn pcall_cannot_swallow_host_errors() {
    let mut harness = Harness::new(&sketch(
        "",
        "  local ok = pcall(fill, 'red')\n  if not ok then print('recovered') end",
    ))
    .expect("load");
    let err = harness.run(1).expect_err("error stays fatal");

    assert_eq!(err, HostError::arg_type("fill", "number"));
    assert_eq!(harness.output.contents(), "");
}

#[test]
fn lua_runtime_errors_surface_as_script_errors() {
    let err = error_of("  error('boom')");
    assert!(matches!(&err, HostError::Script(message) if message.contains("boom")));
    assert_eq!(err.origin(), Origin::Script);
}

#[test]
fn syntax_errors_fail_the_load() {
    let err = Harness::new("function setup(")
        .err()
        .expect("load should fail");
    assert!(matches!(err, HostError::Script(_)));
}

#[test]
fn unreadable_files_are_usage_errors() {
    let host = ScriptHost::new(Box::new(HeadlessBackend::new())).expect("host");
    let err = host
        .load_file(std::path::Path::new("does/not/exist.lua"))
        .expect_err("missing file");
    assert!(matches!(err, HostError::Usage(_)));
    assert_eq!(err.origin(), Origin::Host);
}

#[test]
fn colors_are_userdata() {
    assert_eq!(
        output_of(
            "  local c = color(10, 20, 30, 40)\n  \
             println(c.r, c.g, c.b, c.a, c == color(10, 20, 30, 40))\n  \
             println(c)"
        ),
        "10 20 30 40 true\nColor(10, 20, 30, 40)\n"
    );
}

#[test]
fn lerp_color_mixes_channels() {
    assert_eq!(
        output_of(
            "  println(lerpColor(color(0, 0, 0), color(200, 100, 50), 0.5))"
        ),
        "Color(100, 50, 25, 255)\n"
    );

    let err = error_of("  lerpColor(color(0), color(1), 'half')");
    assert!(matches!(err, HostError::ArgType { .. }));
}

#[test]
fn hsb_color_mode_round_trips_through_color() {
    assert_eq!(
        output_of("  colorMode(HSB)\n  println(color(0.5, 1, 1))"),
        "Color(0, 255, 255, 255)\n"
    );

    let err = error_of("  colorMode(7)");
    assert!(matches!(err, HostError::OutOfRange { .. }));
}

#[test]
fn math_helpers() {
    assert_eq!(
        output_of(
            "  println(min(3, 1, 2), max(3, 1, 2), constrain(15, 0, 10))\n  \
             println(map(5, 0, 10, 0, 100), lerp(0, 10, 0.25), abs(-4))\n  \
             println(pow(2, 10), sqrt(81), degrees(PI), radians(180) == PI)"
        ),
        "1 3 10\n50 2.5 4\n1024 9 180 true\n"
    );
}

#[test]
fn math_domain_errors() {
    assert!(matches!(
        error_of("  sqrt(-1)"),
        HostError::OutOfRange { .. }
    ));
    assert_eq!(
        error_of("  map(1, 2, 2, 0, 1)"),
        HostError::out_of_range(
            "map",
            "expects an input range with distinct bounds"
        )
    );
}

#[test]
fn environment_queries() {
    assert_eq!(
        output_of(
            "  println(width(), height(), displayWidth(), displayHeight())\n  \
             println(frameRate(), focused())"
        ),
        "640 360 1920 1080\n60 true\n"
    );

    let mut harness =
        Harness::new(&sketch("", "  println(focused())")).expect("load");
    harness.probe.set_focused(false);
    harness.run(1).expect("run");
    assert_eq!(harness.output.contents(), "false\n");
}

#[test]
fn frame_rate_must_be_positive() {
    assert_eq!(
        error_of("  frameRate(0)"),
        HostError::out_of_range("frameRate", "expects a value greater than 0")
    );
}

#[test]
fn window_calls_during_draw_reach_the_backend() {
    let mut harness = Harness::new(&sketch(
        "",
        "  windowTitle('live')\n  fullScreen()\n  frameRate(24)",
    ))
    .expect("load");
    harness.run(1).expect("run");

    assert_eq!(harness.probe.title(), "live");
    assert!(harness.probe.fullscreen());
    assert_eq!(harness.probe.target_fps(), 24);
}

#[test]
fn oversized_window_arguments_do_not_wrap() {
    let mut harness =
        Harness::new(&sketch("", "  println(frameRate(4294967297))"))
            .expect("load");
    let err = harness.run(1).expect_err("frame rate does not fit");
    assert_eq!(
        err,
        HostError::out_of_range("frameRate", "value is too large")
    );
    assert_eq!(harness.output.contents(), "");
    assert_eq!(harness.probe.target_fps(), 60);

    assert!(matches!(
        error_of("  windowResize(4294967936, 100)"),
        HostError::OutOfRange { .. }
    ));
    assert!(matches!(
        error_of("  windowMove(0, -4294967296)"),
        HostError::OutOfRange { .. }
    ));
}
