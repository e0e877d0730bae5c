use std::fs;

use tempfile::tempdir;

use mapstyle::MapStyleError;
use mapstyle_cli::{Args, Command, SampleKind, run};

fn args(command: Command, config: Option<String>, output: Option<String>) -> Args {
    Args {
        command,
        config,
        output,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_sample_kinds() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[defaults]\nstroke_color = \"#336699\"\nstroke_width = 2.0\n",
    )
    .expect("Failed to write config");

    for kind in [
        SampleKind::Line,
        SampleKind::Polygon,
        SampleKind::Point,
        SampleKind::Text,
        SampleKind::Raster,
    ] {
        let output_path = temp_dir.path().join(format!("{kind:?}.txt"));
        let result = run(&args(
            Command::Sample { kind },
            Some(config_path.to_string_lossy().to_string()),
            Some(output_path.to_string_lossy().to_string()),
        ));
        assert!(result.is_ok(), "{kind:?} failed: {:?}", result.err());

        let written = fs::read_to_string(&output_path).expect("output written");
        assert!(written.contains("StyledLayerDescriptor"), "{kind:?}");
    }
}

#[test]
fn e2e_smoke_test_expr_and_filter() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let output_path = temp_dir.path().join("expr.txt");

    run(&args(
        Command::Expr {
            text: "lanes*2.5".to_string(),
        },
        None,
        Some(output_path.to_string_lossy().to_string()),
    ))
    .expect("expression compiles");
    assert_eq!(fs::read_to_string(&output_path).unwrap(), "lanes * 2.5");

    let output_path = temp_dir.path().join("filter.txt");
    run(&args(
        Command::Filter {
            text: "population > 10000 and kind in ('city')".to_string(),
        },
        None,
        Some(output_path.to_string_lossy().to_string()),
    ))
    .expect("filter compiles");
    assert_eq!(
        fs::read_to_string(&output_path).unwrap(),
        "population > 10000 AND kind IN ('city')"
    );
}

#[test]
fn e2e_smoke_test_reports_errors() {
    let err = run(&args(
        Command::Filter {
            text: "population >".to_string(),
        },
        None,
        None,
    ))
    .unwrap_err();
    assert!(matches!(err, MapStyleError::Cql(_)));

    let err = run(&args(
        Command::Sample {
            kind: SampleKind::Line,
        },
        Some("/nonexistent/mapstyle/config.toml".to_string()),
        None,
    ))
    .unwrap_err();
    assert!(matches!(err, MapStyleError::Io(_)));
}
