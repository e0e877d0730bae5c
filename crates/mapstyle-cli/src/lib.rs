//! CLI logic for the mapstyle tool.
//!
//! The `expr` and `filter` commands compile CQL text and print it back in
//! canonical extended form (the parsed tree is logged at trace level);
//! `sample` builds a small styled layer descriptor with the
//! configured defaults.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, SampleKind};

use std::{fs, io};

use log::info;

use mapstyle::{
    Builder, MapStyleError, StyleKit,
    expr::Expression,
    style::{LineCap, StyledLayerDescriptor},
};

/// Run the mapstyle CLI application
///
/// The result is written to `args.output` when set, otherwise to standard
/// output.
///
/// # Errors
///
/// Returns `MapStyleError` for:
/// - Configuration loading errors
/// - CQL text that fails to compile
/// - File I/O errors
pub fn run(args: &Args) -> Result<(), MapStyleError> {
    let app_config = config::load_config(args.config.as_ref())?;
    let kit = StyleKit::new(app_config)?;

    let rendered = match &args.command {
        Command::Expr { text } => kit.expression(text)?.to_string(),
        Command::Filter { text } => kit.filter(text)?.to_string(),
        Command::Sample { kind } => {
            info!(kind:?; "Building sample descriptor");
            format!("{:#?}", sample(&kit, *kind)?)
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)?;
            info!(output_file = path; "Result written");
        }
        None => {
            use io::Write;
            writeln!(io::stdout().lock(), "{rendered}")?;
        }
    }

    Ok(())
}

/// Builds a one-rule descriptor drawing with the symbolizer `kind`.
fn sample(kit: &StyleKit, kind: SampleKind) -> Result<StyledLayerDescriptor, MapStyleError> {
    let sld = kit.sld();
    sld.name("sample").title("Sample descriptor");

    let layer = sld.named_layer();
    layer.name("sample");
    let style = layer.style();
    style.name("sample").default_style(true);

    let rule = style.feature_type_style().rule();
    rule.name(format!("{kind:?}").to_lowercase());

    match kind {
        SampleKind::Line => {
            rule.line().stroke().line_cap(LineCap::Round);
        }
        SampleKind::Polygon => {
            let polygon = rule.polygon();
            polygon.fill().opacity(0.8);
            polygon.stroke().width(0.5);
        }
        SampleKind::Point => {
            rule.point().graphic().mark();
        }
        SampleKind::Text => {
            let text = rule.text();
            text.label(kit.expression("name")?);
            text.halo().radius(1.5);
        }
        SampleKind::Raster => {
            let raster = rule.raster();
            let color_map = raster.color_map();
            color_map.entry().quantity(0.0).color_hex("#000000")?;
            color_map.entry().quantity(255.0).color_hex("#FFFFFF")?;
            raster.opacity(Expression::from(1.0));
        }
    }

    Ok(sld.build().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_draws_requested_symbolizer() {
        let kit = StyleKit::default();

        for kind in [
            SampleKind::Line,
            SampleKind::Polygon,
            SampleKind::Point,
            SampleKind::Text,
            SampleKind::Raster,
        ] {
            let sld = sample(&kit, kind).unwrap();
            let style = sld.styles().next().unwrap();
            let rule = &style.feature_type_styles()[0].rules()[0];
            let symbolizer = &rule.symbolizers()[0];
            let matches = match kind {
                SampleKind::Line => symbolizer.as_line().is_some(),
                SampleKind::Polygon => symbolizer.as_polygon().is_some_and(|p| p.stroke().is_some()),
                SampleKind::Point => symbolizer.as_point().is_some(),
                SampleKind::Text => symbolizer.as_text().is_some_and(|t| t.halo().is_some()),
                SampleKind::Raster => symbolizer
                    .as_raster()
                    .and_then(|r| r.color_map())
                    .is_some_and(|map| map.entries().len() == 2),
            };
            assert!(matches, "{kind:?}");
            assert!(style.is_default());
        }
    }
}
