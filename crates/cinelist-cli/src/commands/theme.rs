use crate::output::Output;
use cinelist_models::{Rgb, ScrollTheme};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use serde_json::json;

pub fn run_theme(color: Rgb, poster_height: f64, scroll: &[f64], output: &Output) -> Result<()> {
    if !poster_height.is_finite() || poster_height < 0.0 {
        return Err(eyre!("Poster height must be a non-negative number"));
    }

    let theme = ScrollTheme::new(color, poster_height);

    if !output.is_human() {
        let steps: Vec<serde_json::Value> = scroll
            .iter()
            .map(|&top| {
                json!({
                    "scroll": top,
                    "progress": theme.progress(top),
                    "background": theme.background_at(top).css(),
                })
            })
            .collect();
        output.json(&json!({
            "initial": color.css(),
            "start_scroll": theme.start_scroll,
            "steps": steps,
        }));
        return Ok(());
    }
    if output.is_quiet() {
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["Scroll", "Progress", "Background", ""]);
    for &top in scroll {
        let background = theme.background_at(top);
        table.add_row(vec![
            Cell::new(top),
            Cell::new(format!("{:.0}%", theme.progress(top) * 100.0)),
            Cell::new(background.css()),
            Cell::new("████").fg(Color::Rgb {
                r: background.r,
                g: background.g,
                b: background.b,
            }),
        ]);
    }

    output.info(format!("Fade starts at scroll {}", theme.start_scroll));
    println!("{}", table);
    Ok(())
}
