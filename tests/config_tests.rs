// Host-side tests for data-attribute options and backend selection.

use flight_core::*;

fn parse(pairs: &[(&str, &str)]) -> Result<RendererConfig, ConfigError> {
    RendererConfig::from_pairs(pairs.iter().copied())
}

#[test]
fn empty_attributes_give_defaults() {
    let cfg = parse(&[]).unwrap();
    assert_eq!(cfg, RendererConfig::default());
    assert_eq!(cfg.mode, ModePreference::Auto);
    assert_eq!(cfg.max_pixel_ratio, 1.5);
    assert_eq!(cfg.stars, STAR_COUNT_MAX);
}

#[test]
fn recognized_keys_override_defaults() {
    let cfg = parse(&[
        ("mode", "2D"),
        ("max-dpr", "1.25"),
        ("particles", "180"),
        ("buildings", "12"),
        ("stars", "800"),
        ("texture-width", "1024"),
        ("seed", "9"),
        ("theme", "dark"),
    ])
    .unwrap();
    assert_eq!(cfg.mode, ModePreference::Field);
    assert_eq!(cfg.max_pixel_ratio, 1.25);
    assert_eq!(cfg.particles, 180);
    assert_eq!(cfg.buildings, 12);
    assert_eq!(cfg.stars, 800);
    assert_eq!(cfg.texture_width, 1024);
    assert_eq!(cfg.seed, 9);
}

#[test]
fn counts_are_clamped_into_supported_ranges() {
    let cfg = parse(&[("particles", "10"), ("buildings", "99"), ("stars", "100000")]).unwrap();
    assert_eq!(cfg.particles, 150);
    assert_eq!(cfg.buildings, 20);
    assert_eq!(cfg.stars, STAR_COUNT_MAX);
}

#[test]
fn bad_values_are_errors() {
    assert_eq!(
        parse(&[("mode", "vr")]).unwrap_err(),
        ConfigError::UnknownMode("vr".to_string())
    );
    assert!(matches!(
        parse(&[("max-dpr", "3")]),
        Err(ConfigError::OutOfRange { .. })
    ));
    assert!(matches!(
        parse(&[("texture-width", "64")]),
        Err(ConfigError::OutOfRange { .. })
    ));
    assert!(matches!(
        parse(&[("particles", "lots")]),
        Err(ConfigError::NotANumber { .. })
    ));
    assert!(matches!(
        parse(&[("max-dpr", "NaN")]),
        Err(ConfigError::OutOfRange { .. })
    ));
}

#[test]
fn mode_aliases() {
    for (text, mode) in [
        ("", ModePreference::Auto),
        ("auto", ModePreference::Auto),
        (" Scene ", ModePreference::Scene),
        ("3d", ModePreference::Scene),
        ("field", ModePreference::Field),
    ] {
        assert_eq!(text.parse::<ModePreference>().unwrap(), mode);
    }
}

#[test]
fn backend_selection_respects_capabilities() {
    let full = Capabilities { webgpu: true, reduced_motion: false };
    let no_gpu = Capabilities { webgpu: false, reduced_motion: false };
    let calm = Capabilities { webgpu: true, reduced_motion: true };

    assert_eq!(select_mode(ModePreference::Auto, full), RenderMode::Scene);
    assert_eq!(select_mode(ModePreference::Auto, no_gpu), RenderMode::Field);
    assert_eq!(select_mode(ModePreference::Auto, calm), RenderMode::Field);
    assert_eq!(select_mode(ModePreference::Scene, calm), RenderMode::Scene);
    assert_eq!(select_mode(ModePreference::Scene, no_gpu), RenderMode::Field);
    assert_eq!(select_mode(ModePreference::Field, full), RenderMode::Field);
    assert_eq!(RenderMode::Scene.name(), "scene");
}
