use anyhow::{Context, Result};
use irbench_core::{Evaluation, MetricReport};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER: [&str; 7] = ["analyzer", "model", "MAP", "GM-MAP", "P@5", "P@10", "P@15"];

/// Render reports as an aligned plain-text table, one row per combination.
pub fn render_table(reports: &[MetricReport]) -> String {
    let rows: Vec<[String; 7]> = reports
        .iter()
        .map(|r| {
            [
                r.tokenizer_name.clone(),
                r.scoring_model_name.clone(),
                format!("{:.4}", r.map),
                format!("{:.4}", r.gm_map),
                format!("{:.4}", r.precision_at_5),
                format!("{:.4}", r.precision_at_10),
                format!("{:.4}", r.precision_at_15),
            ]
        })
        .collect();

    let mut widths: Vec<usize> = HEADER.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &widths, HEADER.to_vec());
    for row in &rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str).collect());
    }
    out
}

fn push_row(out: &mut String, widths: &[usize], cells: Vec<&str>) {
    let line: Vec<String> = cells.iter().zip(widths).map(|(c, w)| format!("{c:<w$}", w = *w)).collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Render a single evaluation in trec_eval's `measure all value` layout.
pub fn render_evaluation(eval: &Evaluation) -> String {
    let lines = [
        format!("num_q\tall\t{}", eval.per_query.len()),
        format!("map\tall\t{:.4}", eval.map),
        format!("gm_map\tall\t{:.4}", eval.gm_map),
        format!("P_5\tall\t{:.4}", eval.precision_at_5),
        format!("P_10\tall\t{:.4}", eval.precision_at_10),
        format!("P_15\tall\t{:.4}", eval.precision_at_15),
    ];
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

pub fn write_json(path: &Path, reports: &[MetricReport]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, reports)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
